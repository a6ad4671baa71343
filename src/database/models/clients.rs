use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::RecordStatus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    /// Individual, identified by CPF.
    #[sea_orm(string_value = "fisica")]
    Fisica,
    /// Company, identified by CNPJ.
    #[sea_orm(string_value = "juridica")]
    Juridica,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "clients")]
#[schema(as = Client)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_type: ClientType,
    pub company_name: String,
    pub contact_name: String,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    pub phone: String,
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub observations: Option<String>,
    pub status: RecordStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeUtc,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Name shown next to orders: the company, or the contact for individuals.
    pub fn display_name(&self) -> &str {
        if self.company_name.trim().is_empty() {
            &self.contact_name
        } else {
            &self.company_name
        }
    }
}
