use actix_web::{delete, get, post, put, web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    api::{inspection, ArchiveQuery},
    app_state::AppState,
    database::models::service_orders,
    domain::workflow::ServiceOrderStatus,
    errors::AppError,
    services::orders::{self as order_service, CreateOrderInput, OrderInput, OrderView},
    services::summarizer::SummarizeResponse,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusOption {
    pub value: ServiceOrderStatus,
    pub label: &'static str,
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    params(ArchiveQuery),
    responses(
        (status = 200, description = "Orders, newest entry date first", body = [OrderView])
    )
)]
#[get("")]
pub async fn list_orders(
    data: web::Data<AppState>,
    query: web::Query<ArchiveQuery>,
) -> Result<HttpResponse, AppError> {
    let orders = order_service::list_views(&data.repos, query.include_archived).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[utoipa::path(
    get,
    path = "/api/orders/statuses",
    tag = "Orders",
    responses(
        (status = 200, description = "Statuses the edit form may set", body = [StatusOption])
    )
)]
#[get("/statuses")]
pub async fn list_statuses() -> HttpResponse {
    let options: Vec<StatusOption> = ServiceOrderStatus::SELECTABLE
        .iter()
        .map(|status| StatusOption {
            value: *status,
            label: status.label(),
        })
        .collect();
    HttpResponse::Ok().json(options)
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with budget total and resolved names", body = OrderView),
        (status = 404, description = "Order not found")
    )
)]
#[get("/{id}")]
pub async fn get_order(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = order_service::get_view(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderInput,
    responses(
        (status = 201, description = "Order opened with a readable id", body = service_orders::Model),
        (status = 422, description = "Validation failed")
    )
)]
#[post("")]
pub async fn create_order(
    data: web::Data<AppState>,
    body: web::Json<CreateOrderInput>,
) -> Result<HttpResponse, AppError> {
    let order = order_service::create(&data.repos, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    request_body = OrderInput,
    responses(
        (status = 200, description = "Order updated", body = service_orders::Model),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Validation failed")
    )
)]
#[put("/{id}")]
pub async fn update_order(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<OrderInput>,
) -> Result<HttpResponse, AppError> {
    let order = order_service::update(&data.repos, &path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/archive",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order archived", body = service_orders::Model),
        (status = 404, description = "Order not found")
    )
)]
#[post("/{id}/archive")]
pub async fn archive_order(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = order_service::archive(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/restore",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order reopened as Aberta", body = service_orders::Model),
        (status = 404, description = "Order not found")
    )
)]
#[post("/{id}/restore")]
pub async fn restore_order(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let order = order_service::restore(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order permanently deleted"),
        (status = 404, description = "Order not found")
    )
)]
#[delete("/{id}")]
pub async fn delete_order(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    order_service::delete(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/summary",
    tag = "Orders",
    params(("id" = String, Path, description = "Order ID")),
    responses(
        (status = 200, description = "AI summary of notes and checklist", body = SummarizeResponse),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Summarizer failed"),
        (status = 503, description = "Summarizer not configured")
    )
)]
#[post("/{id}/summary")]
pub async fn summarize_order(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let summary =
        order_service::summarize(&data.repos, &data.summarizer, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .service(list_orders)
            .service(create_order)
            .service(list_statuses)
            .service(archive_order)
            .service(restore_order)
            .service(summarize_order)
            .service(inspection::add_marker)
            .service(inspection::remove_marker)
            .service(inspection::set_observations)
            .service(get_order)
            .service(update_order)
            .service(delete_order),
    );
}
