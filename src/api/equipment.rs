use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    api::ArchiveQuery,
    app_state::AppState,
    database::models::{equipment, service_orders},
    errors::AppError,
    services::equipment::{self as equipment_service, EquipmentInput, EquipmentTypeOption},
};

#[utoipa::path(
    get,
    path = "/api/equipment",
    tag = "Equipment",
    params(ArchiveQuery),
    responses(
        (status = 200, description = "Equipment ordered by brand and model", body = [equipment::Model])
    )
)]
#[get("")]
pub async fn list_equipment(
    data: web::Data<AppState>,
    query: web::Query<ArchiveQuery>,
) -> Result<HttpResponse, AppError> {
    let items = equipment_service::list(&data.repos, query.include_archived).await?;
    Ok(HttpResponse::Ok().json(items))
}

#[utoipa::path(
    get,
    path = "/api/equipment/types",
    tag = "Equipment",
    responses(
        (status = 200, description = "Known equipment types", body = [EquipmentTypeOption])
    )
)]
#[get("/types")]
pub async fn list_equipment_types() -> HttpResponse {
    HttpResponse::Ok().json(equipment_service::equipment_types())
}

#[utoipa::path(
    get,
    path = "/api/equipment/{id}",
    tag = "Equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment found", body = equipment::Model),
        (status = 404, description = "Equipment not found")
    )
)]
#[get("/{id}")]
pub async fn get_equipment(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let item = equipment_service::get(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[utoipa::path(
    get,
    path = "/api/equipment/{id}/orders",
    tag = "Equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Service history, newest first", body = [service_orders::Model]),
        (status = 404, description = "Equipment not found")
    )
)]
#[get("/{id}/orders")]
pub async fn equipment_history(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let orders = equipment_service::history(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[utoipa::path(
    post,
    path = "/api/equipment",
    tag = "Equipment",
    request_body = EquipmentInput,
    responses(
        (status = 201, description = "Equipment created", body = equipment::Model),
        (status = 422, description = "Validation failed")
    )
)]
#[post("")]
pub async fn create_equipment(
    data: web::Data<AppState>,
    body: web::Json<EquipmentInput>,
) -> Result<HttpResponse, AppError> {
    let item = equipment_service::create(&data.repos, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

#[utoipa::path(
    put,
    path = "/api/equipment/{id}",
    tag = "Equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = EquipmentInput,
    responses(
        (status = 200, description = "Equipment updated", body = equipment::Model),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Validation failed")
    )
)]
#[put("/{id}")]
pub async fn update_equipment(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<EquipmentInput>,
) -> Result<HttpResponse, AppError> {
    let item = equipment_service::update(&data.repos, &path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[utoipa::path(
    post,
    path = "/api/equipment/{id}/archive",
    tag = "Equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment archived", body = equipment::Model),
        (status = 404, description = "Equipment not found")
    )
)]
#[post("/{id}/archive")]
pub async fn archive_equipment(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let item = equipment_service::archive(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[utoipa::path(
    post,
    path = "/api/equipment/{id}/restore",
    tag = "Equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment restored", body = equipment::Model),
        (status = 404, description = "Equipment not found")
    )
)]
#[post("/{id}/restore")]
pub async fn restore_equipment(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let item = equipment_service::restore(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[utoipa::path(
    delete,
    path = "/api/equipment/{id}",
    tag = "Equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment permanently deleted"),
        (status = 404, description = "Equipment not found")
    )
)]
#[delete("/{id}")]
pub async fn delete_equipment(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    equipment_service::delete(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/equipment")
            .service(list_equipment)
            .service(create_equipment)
            .service(list_equipment_types)
            .service(equipment_history)
            .service(archive_equipment)
            .service(restore_equipment)
            .service(get_equipment)
            .service(update_equipment)
            .service(delete_equipment),
    );
}
