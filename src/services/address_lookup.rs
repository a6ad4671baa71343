use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use utoipa::ToSchema;

use crate::errors::AppError;

/// Brazilian states and cities, backed by the IBGE localities API.
#[derive(Clone)]
pub struct AddressLookupService {
    client: Client,
    base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct State {
    pub id: i64,
    pub sigla: String,
    pub nome: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct City {
    pub id: i64,
    pub nome: String,
}

impl AddressLookupService {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn request<R: DeserializeOwned>(&self, path: &str) -> Result<R, AppError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.request(Method::GET, &url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error reading response body".to_string());
            log::error!("Address API error on path {}: {} - {}", path, status, error_text);
            return Err(AppError::Upstream(format!(
                "Address lookup failed with status {}",
                status
            )));
        }

        let result = response.json::<R>().await?;
        Ok(result)
    }

    /// All states ordered by name.
    pub async fn states(&self) -> Result<Vec<State>, AppError> {
        self.request("/estados?orderBy=nome").await
    }

    pub async fn cities(&self, uf: &str) -> Result<Vec<City>, AppError> {
        let path = format!("/estados/{}/municipios", uf);
        self.request(&path).await
    }
}
