use actix_web::{get, web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: String,
    pub summarizer_configured: bool,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
#[get("/health")]
pub async fn health(data: web::Data<AppState>) -> HttpResponse {
    let store = data
        .config
        .store_backend
        .clone()
        .unwrap_or_else(|| "postgres".to_string());
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        store,
        summarizer_configured: data.summarizer.is_configured(),
    })
}
