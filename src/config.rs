use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Which record store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("Unknown store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub timezone: Option<String>,
    pub max_body_bytes: Option<usize>,
    pub workers: Option<usize>,
    pub store_backend: Option<String>,
    pub database_url: Option<String>,
    pub allowed_origin: Option<String>,
    pub summarizer_url: Option<String>,
    pub address_api_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let mut config: Config = cfg.try_deserialize()?;

        if config.timezone.is_none() {
            config.timezone = Some("America/Sao_Paulo".to_string());
        }

        config.validate()?;

        Ok(config)
    }

    /// Configuration used by tests and local runs: memory store, no collaborators.
    pub fn local() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            timezone: Some("UTC".to_string()),
            max_body_bytes: None,
            workers: None,
            store_backend: Some("memory".to_string()),
            database_url: None,
            allowed_origin: None,
            summarizer_url: None,
            address_api_url: None,
        }
    }

    pub fn get_timezone(&self) -> Result<Tz, chrono_tz::ParseError> {
        let tz_str = self.timezone.as_deref().unwrap_or("UTC");
        tz_str.parse::<Tz>()
    }

    /// Today's date in the configured timezone, falling back to UTC.
    pub fn today(&self) -> NaiveDate {
        let now = chrono::Utc::now();
        match self.get_timezone() {
            Ok(tz) => now.with_timezone(&tz).date_naive(),
            Err(_) => now.date_naive(),
        }
    }

    pub fn backend(&self) -> Result<StoreBackend, config::ConfigError> {
        self.store_backend
            .as_deref()
            .unwrap_or("postgres")
            .parse::<StoreBackend>()
            .map_err(config::ConfigError::Message)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if !self
            .host
            .chars()
            .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
        {
            return Err(config::ConfigError::Message(
                "Invalid host format".to_string(),
            ));
        }

        if self.port < 1024 {
            return Err(config::ConfigError::Message(
                "Port must be 1024 or higher for security reasons".to_string(),
            ));
        }

        if let Some(tz_str) = &self.timezone {
            if tz_str.parse::<Tz>().is_err() {
                return Err(config::ConfigError::Message(format!(
                    "Invalid timezone: {}",
                    tz_str
                )));
            }
        }

        // 1MB..50MB
        if let Some(limit) = self.max_body_bytes {
            let min = 1024 * 1024;
            let max = 50 * 1024 * 1024;
            if limit < min || limit > max {
                return Err(config::ConfigError::Message(format!(
                    "max_body_bytes must be between {} and {} bytes",
                    min, max
                )));
            }
        }

        if self.workers == Some(0) {
            return Err(config::ConfigError::Message(
                "workers must be at least 1".to_string(),
            ));
        }

        if self.backend()? == StoreBackend::Postgres && self.database_url.is_none() {
            return Err(config::ConfigError::Message(
                "DATABASE_URL must be set when STORE_BACKEND is postgres".to_string(),
            ));
        }

        for (name, value) in [
            ("summarizer_url", &self.summarizer_url),
            ("address_api_url", &self.address_api_url),
        ] {
            if let Some(raw) = value {
                url::Url::parse(raw).map_err(|e| {
                    config::ConfigError::Message(format!("Invalid {}: {}", name, e))
                })?;
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(4 * 1024 * 1024)
    }

    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    pub fn effective_address_api_url(&self) -> String {
        self.address_api_url
            .clone()
            .unwrap_or_else(|| "https://servicodados.ibge.gov.br/api/v1/localidades".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub connect_timeout_secs: Option<u64>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub sql_log: Option<bool>,
}

impl DatabaseSettings {
    pub fn default_from_url(url: String) -> Self {
        Self {
            url,
            max_connections: parse_env_var("DATABASE_MAX_CONNECTIONS"),
            min_connections: parse_env_var("DATABASE_MIN_CONNECTIONS"),
            connect_timeout_secs: parse_env_var("DATABASE_CONNECT_TIMEOUT_SECS"),
            acquire_timeout_secs: parse_env_var("DATABASE_ACQUIRE_TIMEOUT_SECS"),
            idle_timeout_secs: parse_env_var("DATABASE_IDLE_TIMEOUT_SECS"),
            sql_log: parse_env_var("DATABASE_SQL_LOG"),
        }
    }
}

fn parse_env_var<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key).ok().and_then(|value| value.parse::<T>().ok())
}
