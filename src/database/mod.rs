pub mod connector;
pub mod memory_store;
pub mod models;
pub mod orm_store;
pub mod repository;
pub mod schema;

use std::io;
use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::database::memory_store::MemoryRepository;
use crate::database::models::{clients, equipment, service_orders};
use crate::database::orm_store::SeaOrmStore;
use crate::database::repository::Repository;

pub use connector::{DB, connect_from_url, connect_with_settings, ping};

/// One handle per collection, shared by every worker.
#[derive(Clone)]
pub struct Repositories {
    pub clients: Arc<dyn Repository<clients::Model>>,
    pub equipment: Arc<dyn Repository<equipment::Model>>,
    pub orders: Arc<dyn Repository<service_orders::Model>>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            clients: Arc::new(MemoryRepository::<clients::Model>::new()),
            equipment: Arc::new(MemoryRepository::<equipment::Model>::new()),
            orders: Arc::new(MemoryRepository::<service_orders::Model>::new()),
        }
    }

    pub fn sea_orm(db: DB) -> Self {
        let store = SeaOrmStore::new(db);
        Self {
            clients: Arc::new(store.clone()),
            equipment: Arc::new(store.clone()),
            orders: Arc::new(store),
        }
    }
}

/// Builds the repositories for the configured backend, creating the
/// schema when it talks to a real database.
pub async fn build_repositories(config: &Config) -> io::Result<Repositories> {
    let backend = config
        .backend()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    match backend {
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; records are lost on restart");
            Ok(Repositories::in_memory())
        }
        StoreBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "DATABASE_URL is not set")
            })?;
            let db = connect_from_url(url).await?;
            schema::ensure_schema(&db)
                .await
                .map_err(|e| io::Error::other(format!("Failed to create schema: {}", e)))?;
            log::info!("Connected to Postgres");
            Ok(Repositories::sea_orm(db))
        }
    }
}
