use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
};

use crate::database::connector::DB;
use crate::database::models::{clients, equipment, service_orders, RecordStatus};
use crate::database::repository::{new_record_id, Record, RecordFilter, Repository};
use crate::domain::workflow::ServiceOrderStatus;
use crate::errors::AppError;

/// SeaORM-backed collections, one table each.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DB,
}

impl SeaOrmStore {
    pub fn new(db: DB) -> Self {
        Self { db }
    }
}

fn not_found<T: Record>(id: &str) -> AppError {
    AppError::NotFound(format!("{} document {} not found", T::COLLECTION, id))
}

// --- Clients ---

#[async_trait]
impl Repository<clients::Model> for SeaOrmStore {
    async fn get_all(&self) -> Result<Vec<clients::Model>, AppError> {
        Ok(clients::Entity::find().all(&self.db).await?)
    }

    async fn get_filtered(&self, filter: RecordFilter) -> Result<Vec<clients::Model>, AppError> {
        match filter {
            RecordFilter::Active => Ok(clients::Entity::find()
                .filter(clients::Column::Status.ne(RecordStatus::Archived))
                .all(&self.db)
                .await?),
            // Clients carry no entry date.
            RecordFilter::EntryDateBetween { .. } => Ok(Vec::new()),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<clients::Model>, AppError> {
        Ok(clients::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?)
    }

    async fn put(&self, mut record: clients::Model) -> Result<clients::Model, AppError> {
        if record.id.is_empty() {
            record.id = new_record_id();
        }
        let exists = clients::Entity::find_by_id(record.id.clone())
            .one(&self.db)
            .await?
            .is_some();
        let active_model = record.into_active_model().reset_all();
        let saved = if exists {
            active_model.update(&self.db).await?
        } else {
            active_model.insert(&self.db).await?
        };
        Ok(saved)
    }

    async fn patch_status(&self, id: &str, status: RecordStatus) -> Result<clients::Model, AppError> {
        let client = clients::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found::<clients::Model>(id))?;

        let mut active_model = client.into_active_model();
        active_model.status = Set(status);
        active_model.updated_at = Set(Some(chrono::Utc::now()));
        Ok(active_model.update(&self.db).await?)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = clients::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_found::<clients::Model>(id));
        }
        Ok(())
    }
}

// --- Equipment ---

#[async_trait]
impl Repository<equipment::Model> for SeaOrmStore {
    async fn get_all(&self) -> Result<Vec<equipment::Model>, AppError> {
        Ok(equipment::Entity::find().all(&self.db).await?)
    }

    async fn get_filtered(&self, filter: RecordFilter) -> Result<Vec<equipment::Model>, AppError> {
        match filter {
            RecordFilter::Active => Ok(equipment::Entity::find()
                .filter(equipment::Column::Status.ne(RecordStatus::Archived))
                .all(&self.db)
                .await?),
            RecordFilter::EntryDateBetween { .. } => Ok(Vec::new()),
        }
    }

    async fn get(&self, id: &str) -> Result<Option<equipment::Model>, AppError> {
        Ok(equipment::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?)
    }

    async fn put(&self, mut record: equipment::Model) -> Result<equipment::Model, AppError> {
        if record.id.is_empty() {
            record.id = new_record_id();
        }
        let exists = equipment::Entity::find_by_id(record.id.clone())
            .one(&self.db)
            .await?
            .is_some();
        let active_model = record.into_active_model().reset_all();
        let saved = if exists {
            active_model.update(&self.db).await?
        } else {
            active_model.insert(&self.db).await?
        };
        Ok(saved)
    }

    async fn patch_status(&self, id: &str, status: RecordStatus) -> Result<equipment::Model, AppError> {
        let item = equipment::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found::<equipment::Model>(id))?;

        let mut active_model = item.into_active_model();
        active_model.status = Set(status);
        active_model.updated_at = Set(Some(chrono::Utc::now()));
        Ok(active_model.update(&self.db).await?)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = equipment::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_found::<equipment::Model>(id));
        }
        Ok(())
    }
}

// --- Service orders ---

#[async_trait]
impl Repository<service_orders::Model> for SeaOrmStore {
    async fn get_all(&self) -> Result<Vec<service_orders::Model>, AppError> {
        Ok(service_orders::Entity::find().all(&self.db).await?)
    }

    async fn get_filtered(
        &self,
        filter: RecordFilter,
    ) -> Result<Vec<service_orders::Model>, AppError> {
        let query = match filter {
            RecordFilter::Active => service_orders::Entity::find()
                .filter(service_orders::Column::Status.ne(ServiceOrderStatus::Archived)),
            RecordFilter::EntryDateBetween { from, until } => service_orders::Entity::find()
                .filter(service_orders::Column::EntryDate.gte(from))
                .filter(service_orders::Column::EntryDate.lt(until)),
        };
        Ok(query.all(&self.db).await?)
    }

    async fn get(&self, id: &str) -> Result<Option<service_orders::Model>, AppError> {
        Ok(service_orders::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?)
    }

    async fn put(
        &self,
        mut record: service_orders::Model,
    ) -> Result<service_orders::Model, AppError> {
        if record.id.is_empty() {
            record.id = new_record_id();
        }
        let exists = service_orders::Entity::find_by_id(record.id.clone())
            .one(&self.db)
            .await?
            .is_some();
        let active_model = record.into_active_model().reset_all();
        let saved = if exists {
            active_model.update(&self.db).await?
        } else {
            active_model.insert(&self.db).await?
        };
        Ok(saved)
    }

    async fn patch_status(
        &self,
        id: &str,
        status: ServiceOrderStatus,
    ) -> Result<service_orders::Model, AppError> {
        let order = service_orders::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found::<service_orders::Model>(id))?;

        let mut active_model = order.into_active_model();
        active_model.status = Set(status);
        active_model.updated_at = Set(Some(chrono::Utc::now()));
        Ok(active_model.update(&self.db).await?)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = service_orders::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(not_found::<service_orders::Model>(id));
        }
        Ok(())
    }
}
