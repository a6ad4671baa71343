use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};
use std::io;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use repair_desk::api::{self, middleware::RequestId, ApiDoc};
use repair_desk::app_state::AppState;
use repair_desk::config::Config;
use repair_desk::database;

fn cors_for(origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);
    match origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors.allow_any_origin(),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("Invalid configuration: {}", e)))?;

    let repos = database::build_repositories(&config).await?;
    let state = web::Data::new(AppState::new(config.clone(), repos));

    let host = config.host.clone();
    let port = config.port;
    let workers = config.effective_workers();
    let max_body = config.effective_max_body_bytes();
    let allowed_origin = config.allowed_origin.clone();

    if allowed_origin.is_none() {
        log::warn!("ALLOWED_ORIGIN is not set; accepting requests from any origin");
    }
    if !state.summarizer.is_configured() {
        log::warn!("SUMMARIZER_URL is not set; order summaries are disabled");
    }

    log::info!("Starting server at http://{}:{} with {} workers", host, port, workers);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/index.html", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Logger::default())
            .wrap(RequestId)
            .wrap(cors_for(allowed_origin.as_deref()))
            .app_data(state.clone())
            .app_data(api::json_config(max_body))
            .app_data(api::query_config())
            .app_data(api::path_config())
            .configure(api::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
