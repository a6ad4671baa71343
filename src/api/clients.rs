use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    api::ArchiveQuery,
    app_state::AppState,
    database::models::clients,
    errors::AppError,
    services::clients::{self as client_service, ClientInput, ClientOverview},
};

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    params(ArchiveQuery),
    responses(
        (status = 200, description = "Clients ordered by name", body = [clients::Model])
    )
)]
#[get("")]
pub async fn list_clients(
    data: web::Data<AppState>,
    query: web::Query<ArchiveQuery>,
) -> Result<HttpResponse, AppError> {
    let clients = client_service::list(&data.repos, query.include_archived).await?;
    Ok(HttpResponse::Ok().json(clients))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client found", body = clients::Model),
        (status = 404, description = "Client not found")
    )
)]
#[get("/{id}")]
pub async fn get_client(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let client = client_service::get(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}/overview",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client with its equipment and orders", body = ClientOverview),
        (status = 404, description = "Client not found")
    )
)]
#[get("/{id}/overview")]
pub async fn client_overview(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let overview = client_service::overview(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(overview))
}

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = ClientInput,
    responses(
        (status = 201, description = "Client created", body = clients::Model),
        (status = 422, description = "Validation failed")
    )
)]
#[post("")]
pub async fn create_client(
    data: web::Data<AppState>,
    body: web::Json<ClientInput>,
) -> Result<HttpResponse, AppError> {
    let client = client_service::create(&data.repos, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(client))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    request_body = ClientInput,
    responses(
        (status = 200, description = "Client updated", body = clients::Model),
        (status = 404, description = "Client not found"),
        (status = 422, description = "Validation failed")
    )
)]
#[put("/{id}")]
pub async fn update_client(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ClientInput>,
) -> Result<HttpResponse, AppError> {
    let client = client_service::update(&data.repos, &path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

#[utoipa::path(
    post,
    path = "/api/clients/{id}/archive",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client archived", body = clients::Model),
        (status = 404, description = "Client not found")
    )
)]
#[post("/{id}/archive")]
pub async fn archive_client(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let client = client_service::archive(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

#[utoipa::path(
    post,
    path = "/api/clients/{id}/restore",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client restored", body = clients::Model),
        (status = 404, description = "Client not found")
    )
)]
#[post("/{id}/restore")]
pub async fn restore_client(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let client = client_service::restore(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    tag = "Clients",
    params(("id" = String, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client permanently deleted"),
        (status = 404, description = "Client not found")
    )
)]
#[delete("/{id}")]
pub async fn delete_client(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    client_service::delete(&data.repos, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .service(list_clients)
            .service(create_client)
            .service(client_overview)
            .service(archive_client)
            .service(restore_client)
            .service(get_client)
            .service(update_client)
            .service(delete_client),
    );
}
