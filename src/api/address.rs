use actix_web::{get, web, HttpResponse};

use crate::{
    api::validation,
    app_state::AppState,
    errors::{AppError, FieldError},
    services::address_lookup::{City, State},
};

#[utoipa::path(
    get,
    path = "/api/address/states",
    tag = "Address",
    responses(
        (status = 200, description = "Brazilian states ordered by name", body = [State]),
        (status = 502, description = "Lookup service failed")
    )
)]
#[get("/states")]
pub async fn list_states(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let states = data.address_lookup.states().await?;
    Ok(HttpResponse::Ok().json(states))
}

#[utoipa::path(
    get,
    path = "/api/address/states/{uf}/cities",
    tag = "Address",
    params(("uf" = String, Path, description = "Two-letter state code")),
    responses(
        (status = 200, description = "Cities of the state", body = [City]),
        (status = 422, description = "Malformed state code"),
        (status = 502, description = "Lookup service failed")
    )
)]
#[get("/states/{uf}/cities")]
pub async fn list_cities(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let uf = path.into_inner().trim().to_ascii_uppercase();
    if !validation::is_uf(&uf) {
        return Err(AppError::Validation(vec![FieldError::new("uf", "Selecione um UF.")]));
    }
    let cities = data.address_lookup.cities(&uf).await?;
    Ok(HttpResponse::Ok().json(cities))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/address")
            .service(list_states)
            .service(list_cities),
    );
}
