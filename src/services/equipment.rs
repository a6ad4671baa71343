use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::validation::{clean_opt, non_negative, require};
use crate::database::models::equipment::{
    self, equipment_type_label, AvailabilityType, RentalPrice, RentalStatus, SaleStatus,
    TechnicalStatus,
};
use crate::database::models::{service_orders, RecordStatus};
use crate::database::repository::RecordFilter;
use crate::database::Repositories;
use crate::errors::{AppError, FieldError};

fn default_technical_status() -> TechnicalStatus {
    TechnicalStatus::InUse
}

fn default_availability() -> AvailabilityType {
    AvailabilityType::Internal
}

/// Equipment form payload, also accepted inline when opening an order.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EquipmentInput {
    pub brand: String,
    pub model_name: String,
    pub serial_number: String,
    pub acquisition_date: Option<NaiveDate>,
    pub owner_id: String,
    pub equipment_type: String,
    #[serde(default = "default_technical_status")]
    pub technical_status: TechnicalStatus,
    pub technical_observations: Option<String>,
    pub status: Option<RecordStatus>,
    #[serde(default = "default_availability")]
    pub availability_type: AvailabilityType,
    pub sale_price: Option<f64>,
    pub sale_status: Option<SaleStatus>,
    pub sale_date: Option<NaiveDate>,
    pub buyer_id: Option<String>,
    pub rental_price: Option<RentalPrice>,
    pub rental_status: Option<RentalStatus>,
    pub rental_client_id: Option<String>,
    pub rental_start_date: Option<NaiveDate>,
    pub rental_expected_return_date: Option<NaiveDate>,
    pub rental_actual_return_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EquipmentTypeOption {
    pub key: &'static str,
    pub label: &'static str,
}

pub fn equipment_types() -> Vec<EquipmentTypeOption> {
    equipment::EQUIPMENT_TYPES
        .iter()
        .map(|&(key, label)| EquipmentTypeOption { key, label })
        .collect()
}

impl EquipmentInput {
    /// Field errors, prefixed with `prefix` when nested in another form.
    pub fn validate(&self, prefix: &str) -> Vec<FieldError> {
        let field = |name: &str| format!("{}{}", prefix, name);
        let mut errors = Vec::new();
        require(&mut errors, &field("owner_id"), &self.owner_id, "Selecione o cliente proprietário.");
        require(&mut errors, &field("serial_number"), &self.serial_number, "O nº de série é obrigatório.");
        require(&mut errors, &field("brand"), &self.brand, "A marca é obrigatória.");
        require(&mut errors, &field("model_name"), &self.model_name, "O modelo é obrigatório.");
        if equipment_type_label(self.equipment_type.trim()).is_none() {
            errors.push(FieldError::new(field("equipment_type"), "Selecione o tipo de equipamento."));
        }
        non_negative(&mut errors, &field("sale_price"), self.sale_price);
        if let Some(price) = &self.rental_price {
            non_negative(&mut errors, &field("rental_price.daily"), price.daily);
            non_negative(&mut errors, &field("rental_price.weekly"), price.weekly);
            non_negative(&mut errors, &field("rental_price.monthly"), price.monthly);
        }
        errors
    }

    pub fn into_model(self, id: String, status: RecordStatus) -> equipment::Model {
        equipment::Model {
            id,
            brand: self.brand.trim().to_string(),
            model_name: self.model_name.trim().to_string(),
            serial_number: self.serial_number.trim().to_string(),
            acquisition_date: self.acquisition_date,
            owner_id: self.owner_id.trim().to_string(),
            equipment_type: self.equipment_type.trim().to_string(),
            technical_status: self.technical_status,
            technical_observations: clean_opt(self.technical_observations),
            status,
            availability_type: self.availability_type,
            sale_price: self.sale_price,
            sale_status: self.sale_status,
            sale_date: self.sale_date,
            buyer_id: clean_opt(self.buyer_id),
            rental_price: self.rental_price,
            rental_status: self.rental_status,
            rental_client_id: clean_opt(self.rental_client_id),
            rental_start_date: self.rental_start_date,
            rental_expected_return_date: self.rental_expected_return_date,
            rental_actual_return_date: self.rental_actual_return_date,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }
}

pub async fn list(repos: &Repositories, include_archived: bool) -> Result<Vec<equipment::Model>, AppError> {
    let mut items = if include_archived {
        repos.equipment.get_all().await?
    } else {
        repos.equipment.get_filtered(RecordFilter::Active).await?
    };
    items.sort_by(|a, b| {
        (a.brand.to_lowercase(), a.model_name.to_lowercase())
            .cmp(&(b.brand.to_lowercase(), b.model_name.to_lowercase()))
    });
    Ok(items)
}

pub async fn get(repos: &Repositories, id: &str) -> Result<equipment::Model, AppError> {
    repos
        .equipment
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
}

pub async fn create(repos: &Repositories, input: EquipmentInput) -> Result<equipment::Model, AppError> {
    AppError::check(input.validate(""))?;
    let status = input.status.unwrap_or_default();
    let item = repos.equipment.put(input.into_model(String::new(), status)).await?;
    log::info!("Created equipment {} ({})", item.id, item.label());
    Ok(item)
}

pub async fn update(repos: &Repositories, id: &str, input: EquipmentInput) -> Result<equipment::Model, AppError> {
    let existing = get(repos, id).await?;
    AppError::check(input.validate(""))?;

    let status = input.status.unwrap_or(existing.status);
    let mut item = input.into_model(existing.id, status);
    item.created_at = existing.created_at;
    item.updated_at = Some(chrono::Utc::now());
    Ok(repos.equipment.put(item).await?)
}

pub async fn archive(repos: &Repositories, id: &str) -> Result<equipment::Model, AppError> {
    let item = repos.equipment.patch_status(id, RecordStatus::Archived).await?;
    log::info!("Archived equipment {}", id);
    Ok(item)
}

pub async fn restore(repos: &Repositories, id: &str) -> Result<equipment::Model, AppError> {
    Ok(repos.equipment.patch_status(id, RecordStatus::Active).await?)
}

pub async fn delete(repos: &Repositories, id: &str) -> Result<(), AppError> {
    repos.equipment.delete(id).await?;
    log::warn!("Permanently deleted equipment {}", id);
    Ok(())
}

/// Every order that references the equipment, newest first.
pub async fn history(repos: &Repositories, id: &str) -> Result<Vec<service_orders::Model>, AppError> {
    let item = get(repos, id).await?;
    let mut orders = repos
        .orders
        .get_all()
        .await?
        .into_iter()
        .filter(|o| o.equipment_id == item.id)
        .collect::<Vec<_>>();
    orders.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
    Ok(orders)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_input(owner_id: &str) -> EquipmentInput {
        EquipmentInput {
            brand: "Olympus".into(),
            model_name: "GIF-H180".into(),
            serial_number: "2401234".into(),
            acquisition_date: None,
            owner_id: owner_id.into(),
            equipment_type: "gastroscope".into(),
            technical_status: TechnicalStatus::InMaintenance,
            technical_observations: None,
            status: None,
            availability_type: AvailabilityType::Internal,
            sale_price: None,
            sale_status: None,
            sale_date: None,
            buyer_id: None,
            rental_price: None,
            rental_status: None,
            rental_client_id: None,
            rental_start_date: None,
            rental_expected_return_date: None,
            rental_actual_return_date: None,
        }
    }

    #[test]
    fn rejects_unknown_type_and_negative_prices() {
        let mut input = sample_input("c1");
        input.equipment_type = "microscope".into();
        input.sale_price = Some(-1.0);
        input.rental_price = Some(RentalPrice {
            daily: Some(10.0),
            weekly: Some(-5.0),
            monthly: None,
        });
        let fields: Vec<String> = input.validate("").into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["equipment_type", "sale_price", "rental_price.weekly"]);
    }

    #[test]
    fn nested_errors_carry_prefix() {
        let mut input = sample_input("");
        input.brand = " ".into();
        let fields: Vec<String> = input
            .validate("new_equipment.")
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["new_equipment.owner_id", "new_equipment.brand"]);
    }

    #[test]
    fn lists_every_type() {
        let types = equipment_types();
        assert_eq!(types.len(), 7);
        assert_eq!(types[0].key, "flex_endoscope");
    }

    #[actix_web::test]
    async fn missing_equipment_is_not_found() {
        let repos = Repositories::in_memory();
        assert!(matches!(get(&repos, "nope").await, Err(AppError::NotFound(_))));
        assert!(matches!(delete(&repos, "nope").await, Err(AppError::NotFound(_))));
    }
}
