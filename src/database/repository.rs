//! Per-collection repository interface.
//!
//! Handlers never see a concrete store: the application state holds one
//! `Arc<dyn Repository<_>>` per collection, built once at startup.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::database::models::{clients, equipment, service_orders, RecordStatus};
use crate::domain::workflow::ServiceOrderStatus;
use crate::errors::AppError;

/// A document stored in one of the collections.
pub trait Record: Clone + Send + Sync + 'static {
    type Status: Copy + PartialEq + Send + Sync + std::fmt::Debug;

    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn status(&self) -> Self::Status;
    fn set_status(&mut self, status: Self::Status);
    fn is_archived(&self) -> bool;

    /// Date used by entry-date queries; collections without one never match.
    fn entry_date(&self) -> Option<NaiveDate> {
        None
    }

    fn touch(&mut self);
}

/// The query surface the collections support.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordFilter {
    /// Status is not the archived sentinel.
    Active,
    /// `from <= entry_date < until`.
    EntryDateBetween { from: NaiveDate, until: NaiveDate },
}

impl RecordFilter {
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        match self {
            RecordFilter::Active => !record.is_archived(),
            RecordFilter::EntryDateBetween { from, until } => record
                .entry_date()
                .map(|date| date >= *from && date < *until)
                .unwrap_or(false),
        }
    }
}

#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    async fn get_all(&self) -> Result<Vec<T>, AppError>;

    async fn get_filtered(&self, filter: RecordFilter) -> Result<Vec<T>, AppError>;

    async fn get(&self, id: &str) -> Result<Option<T>, AppError>;

    /// Inserts when the id is empty (the store assigns one), otherwise
    /// overwrites the whole document. Last write wins.
    async fn put(&self, record: T) -> Result<T, AppError>;

    async fn patch_status(&self, id: &str, status: T::Status) -> Result<T, AppError>;

    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl Record for clients::Model {
    type Status = RecordStatus;
    const COLLECTION: &'static str = "clients";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn status(&self) -> RecordStatus {
        self.status
    }
    fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }
    fn is_archived(&self) -> bool {
        self.status == RecordStatus::Archived
    }
    fn touch(&mut self) {
        self.updated_at = Some(chrono::Utc::now());
    }
}

impl Record for equipment::Model {
    type Status = RecordStatus;
    const COLLECTION: &'static str = "equipment";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn status(&self) -> RecordStatus {
        self.status
    }
    fn set_status(&mut self, status: RecordStatus) {
        self.status = status;
    }
    fn is_archived(&self) -> bool {
        self.status == RecordStatus::Archived
    }
    fn touch(&mut self) {
        self.updated_at = Some(chrono::Utc::now());
    }
}

impl Record for service_orders::Model {
    type Status = ServiceOrderStatus;
    const COLLECTION: &'static str = "service_orders";

    fn id(&self) -> &str {
        &self.id
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
    fn status(&self) -> ServiceOrderStatus {
        self.status
    }
    fn set_status(&mut self, status: ServiceOrderStatus) {
        self.status = status;
    }
    fn is_archived(&self) -> bool {
        self.status.is_archived()
    }
    fn entry_date(&self) -> Option<NaiveDate> {
        Some(self.entry_date)
    }
    fn touch(&mut self) {
        self.updated_at = Some(chrono::Utc::now());
    }
}
