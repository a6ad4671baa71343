use actix_web::{get, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    services::reports::{self, DashboardReport},
};

#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    tag = "Reports",
    responses(
        (status = 200, description = "Dashboard statistics over non-archived records", body = DashboardReport)
    )
)]
#[get("/dashboard")]
pub async fn dashboard(data: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let report = reports::dashboard(&data.repos, data.config.today()).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/reports").service(dashboard));
}
