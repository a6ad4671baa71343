use sea_orm::entity::prelude::*;
use chrono::NaiveDate;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordStatus;

/// Known equipment type keys and their display labels.
pub const EQUIPMENT_TYPES: [(&str, &str); 7] = [
    ("flex_endoscope", "Endoscópio Flexível"),
    ("rigid_endoscope", "Endoscópio Rígido"),
    ("colonoscope", "Colonoscópio"),
    ("gastroscope", "Gastroscópio"),
    ("processor", "Processadora de Imagem"),
    ("light_source", "Fonte de Luz"),
    ("other", "Outro"),
];

pub fn equipment_type_label(key: &str) -> Option<&'static str> {
    EQUIPMENT_TYPES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum TechnicalStatus {
    #[sea_orm(string_value = "in_use")]
    InUse,
    #[sea_orm(string_value = "in_maintenance")]
    InMaintenance,
    #[sea_orm(string_value = "waiting_parts")]
    WaitingParts,
    #[sea_orm(string_value = "ready_for_delivery")]
    ReadyForDelivery,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityType {
    #[sea_orm(string_value = "internal")]
    Internal,
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "rent")]
    Rent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "sold")]
    Sold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    #[sea_orm(string_value = "available")]
    Available,
    #[sea_orm(string_value = "rented")]
    Rented,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct RentalPrice {
    pub daily: Option<f64>,
    pub weekly: Option<f64>,
    pub monthly: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "equipment")]
#[schema(as = Equipment)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub brand: String,
    pub model_name: String,
    pub serial_number: String,
    pub acquisition_date: Option<NaiveDate>,
    /// Legal owner (client id).
    pub owner_id: String,
    pub equipment_type: String,
    pub technical_status: TechnicalStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub technical_observations: Option<String>,
    pub status: RecordStatus,
    pub availability_type: AvailabilityType,

    pub sale_price: Option<f64>,
    pub sale_status: Option<SaleStatus>,
    pub sale_date: Option<NaiveDate>,
    pub buyer_id: Option<String>,

    #[sea_orm(column_type = "Json", nullable)]
    pub rental_price: Option<RentalPrice>,
    pub rental_status: Option<RentalStatus>,
    pub rental_client_id: Option<String>,
    pub rental_start_date: Option<NaiveDate>,
    pub rental_expected_return_date: Option<NaiveDate>,
    pub rental_actual_return_date: Option<NaiveDate>,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeUtc,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// "Brand Model (SN serial)" as shown next to orders.
    pub fn label(&self) -> String {
        format!("{} {} (SN {})", self.brand, self.model_name, self.serial_number)
    }
}
