use actix_web::{delete, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    domain::inspection::{Marker, VisualInspection},
    errors::AppError,
    services::inspection::{self as inspection_service, MarkerGesture, ObservationsInput},
};

#[utoipa::path(
    post,
    path = "/api/orders/{id}/inspection/markers",
    tag = "Inspection",
    params(("id" = String, Path, description = "Order ID")),
    request_body = MarkerGesture,
    responses(
        (status = 201, description = "Marker committed", body = Marker),
        (status = 403, description = "Order is archived"),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Gesture outside the canvas or below the minimum size")
    )
)]
#[post("/{id}/inspection/markers")]
pub async fn add_marker(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<MarkerGesture>,
) -> Result<HttpResponse, AppError> {
    let marker = inspection_service::add_marker(&data.repos, &path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(marker))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}/inspection/markers/{marker_id}",
    tag = "Inspection",
    params(
        ("id" = String, Path, description = "Order ID"),
        ("marker_id" = i64, Path, description = "Marker ID")
    ),
    responses(
        (status = 200, description = "Remaining inspection", body = VisualInspection),
        (status = 403, description = "Order is archived"),
        (status = 404, description = "Order or marker not found")
    )
)]
#[delete("/{id}/inspection/markers/{marker_id}")]
pub async fn remove_marker(
    data: web::Data<AppState>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (order_id, marker_id) = path.into_inner();
    let inspection = inspection_service::remove_marker(&data.repos, &order_id, marker_id).await?;
    Ok(HttpResponse::Ok().json(inspection))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/inspection/observations",
    tag = "Inspection",
    params(("id" = String, Path, description = "Order ID")),
    request_body = ObservationsInput,
    responses(
        (status = 200, description = "Updated inspection", body = VisualInspection),
        (status = 403, description = "Order is archived"),
        (status = 404, description = "Order not found")
    )
)]
#[put("/{id}/inspection/observations")]
pub async fn set_observations(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ObservationsInput>,
) -> Result<HttpResponse, AppError> {
    let inspection =
        inspection_service::set_observations(&data.repos, &path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(inspection))
}
