pub mod address;
pub mod clients;
pub mod equipment;
pub mod health;
pub mod inspection;
pub mod middleware;
pub mod orders;
pub mod reports;
pub mod validation;

use actix_web::web;
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use crate::errors::AppError;

/// `?include_archived=true` on listing endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ArchiveQuery {
    #[serde(default)]
    pub include_archived: bool,
}

/// Malformed bodies answer with the same JSON error shape as handlers.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| {
            log::debug!("Rejected JSON body: {}", err);
            AppError::InvalidInput(err.to_string()).into()
        })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

/// Mounts every API scope under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health)
            .configure(clients::init_routes)
            .configure(equipment::init_routes)
            .configure(orders::init_routes)
            .configure(reports::init_routes)
            .configure(address::init_routes),
    );
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        // Clients
        clients::list_clients,
        clients::get_client,
        clients::client_overview,
        clients::create_client,
        clients::update_client,
        clients::archive_client,
        clients::restore_client,
        clients::delete_client,
        // Equipment
        equipment::list_equipment,
        equipment::list_equipment_types,
        equipment::get_equipment,
        equipment::equipment_history,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::archive_equipment,
        equipment::restore_equipment,
        equipment::delete_equipment,
        // Orders
        orders::list_orders,
        orders::list_statuses,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::archive_order,
        orders::restore_order,
        orders::delete_order,
        orders::summarize_order,
        // Inspection
        inspection::add_marker,
        inspection::remove_marker,
        inspection::set_observations,
        // Reports
        reports::dashboard,
        // Address
        address::list_states,
        address::list_cities,
    ),
    components(
        schemas(
            crate::errors::FieldError,
            crate::database::models::RecordStatus,
            crate::database::models::clients::Model,
            crate::database::models::clients::ClientType,
            crate::database::models::equipment::Model,
            crate::database::models::equipment::TechnicalStatus,
            crate::database::models::equipment::AvailabilityType,
            crate::database::models::equipment::SaleStatus,
            crate::database::models::equipment::RentalStatus,
            crate::database::models::equipment::RentalPrice,
            crate::database::models::service_orders::Model,
            crate::database::models::service_orders::Execution,
            crate::database::models::service_orders::Delivery,
            crate::domain::workflow::ServiceOrderStatus,
            crate::domain::checklist::ChecklistKey,
            crate::domain::checklist::ChecklistStatus,
            crate::domain::checklist::ChecklistItem,
            crate::domain::budget::Budget,
            crate::domain::budget::BudgetItem,
            crate::domain::budget::BudgetStatus,
            crate::domain::inspection::VisualInspection,
            crate::domain::inspection::Marker,
            crate::domain::inspection::Shape,
            crate::domain::inspection::Severity,
            crate::domain::inspection::Canvas,
            crate::domain::inspection::Point,
            crate::services::clients::ClientInput,
            crate::services::clients::ClientOverview,
            crate::services::equipment::EquipmentInput,
            crate::services::equipment::EquipmentTypeOption,
            crate::services::orders::OrderInput,
            crate::services::orders::CreateOrderInput,
            crate::services::orders::OrderView,
            crate::services::inspection::MarkerGesture,
            crate::services::inspection::ObservationsInput,
            crate::services::reports::DashboardReport,
            crate::services::summarizer::SummarizeResponse,
            crate::services::address_lookup::State,
            crate::services::address_lookup::City,
            orders::StatusOption,
            health::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Clients", description = "Client records"),
        (name = "Equipment", description = "Equipment records and service history"),
        (name = "Orders", description = "Service orders and their workflow"),
        (name = "Inspection", description = "Visual inspection markers"),
        (name = "Reports", description = "Dashboard statistics"),
        (name = "Address", description = "State and city lookup")
    )
)]
pub struct ApiDoc;
