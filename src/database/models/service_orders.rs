use sea_orm::entity::prelude::*;
use chrono::NaiveDate;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    budget::Budget, checklist::Checklist, inspection::VisualInspection,
    workflow::ServiceOrderStatus,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct Execution {
    pub technician: Option<String>,
    pub procedures: Option<String>,
    pub completion_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct Delivery {
    pub delivery_date: Option<NaiveDate>,
    pub final_observations: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "service_orders")]
#[schema(as = ServiceOrder)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Assigned once at creation, never rewritten.
    pub readable_id: String,
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Text")]
    pub problem_description: String,
    pub status: ServiceOrderStatus,
    pub client_id: String,
    pub equipment_id: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub technician_notes: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub inspection_checklist: Option<Checklist>,
    #[sea_orm(column_type = "Json", nullable)]
    pub visual_inspection: Option<VisualInspection>,
    #[sea_orm(column_type = "Json", nullable)]
    pub budget: Option<Budget>,
    #[sea_orm(column_type = "Json", nullable)]
    pub execution: Option<Execution>,
    #[sea_orm(column_type = "Json", nullable)]
    pub delivery: Option<Delivery>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeUtc,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn budget_total(&self) -> f64 {
        self.budget.as_ref().map(Budget::total).unwrap_or(0.0)
    }

    pub fn technician(&self) -> Option<&str> {
        self.execution
            .as_ref()
            .and_then(|e| e.technician.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}
