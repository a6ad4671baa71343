use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::database::repository::{new_record_id, Record, RecordFilter, Repository};
use crate::errors::AppError;

/// In-process collection. Used for local runs and tests.
#[derive(Clone)]
pub struct MemoryRepository<T: Record> {
    records: Arc<RwLock<HashMap<String, T>>>,
}

impl<T: Record> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Record> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryRepository<T> {
    async fn get_all(&self) -> Result<Vec<T>, AppError> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn get_filtered(&self, filter: RecordFilter) -> Result<Vec<T>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|record| filter.matches(*record))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<T>, AppError> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn put(&self, mut record: T) -> Result<T, AppError> {
        if record.id().is_empty() {
            record.set_id(new_record_id());
        }
        let mut records = self.records.write().await;
        records.insert(record.id().to_string(), record.clone());
        log::debug!("stored {} document {}", T::COLLECTION, record.id());
        Ok(record)
    }

    async fn patch_status(&self, id: &str, status: T::Status) -> Result<T, AppError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(id).ok_or_else(|| {
            AppError::NotFound(format!("{} document {} not found", T::COLLECTION, id))
        })?;
        record.set_status(status);
        record.touch();
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        if records.remove(id).is_some() {
            log::info!("Deleted {} document {}", T::COLLECTION, id);
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "{} document {} not found",
                T::COLLECTION,
                id
            )))
        }
    }
}
