//! Actix-Web API server for the dashboard datasets.
//!
//! Every report route re-reads its CSV source on each request; there is no
//! in-process cache. Successful responses carry a `Cache-Control` header so
//! shared caches can absorb repeat traffic instead.

pub mod handlers;

use actix_web::http::StatusCode;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, ResponseError};

use crate::config::toml_config::TomlConfig;
use crate::core::engine::ReportEngine;
use crate::utils::error::ForecastError;

/// Shared application state.
pub struct AppState {
    pub engine: ReportEngine,
    pub config: TomlConfig,
}

impl ResponseError for ForecastError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(ForecastError::status_code(self))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(ResponseError::status_code(self)).json(serde_json::json!({
            "error": self.user_friendly_message()
        }))
    }
}

/// Registers the `/api` scope. Shared by the server and the route tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/school-coverage", web::get().to(handlers::school_coverage))
            .route("/hospital-coverage", web::get().to(handlers::hospital_coverage))
            .route("/park-coverage", web::get().to(handlers::park_coverage))
            .route(
                "/housing-road-analysis",
                web::get().to(handlers::housing_road_analysis),
            )
            .route("/ai-planning-impact", web::get().to(handlers::ai_planning_impact))
            .route(
                "/sustainable-resources",
                web::get().to(handlers::sustainable_resources),
            )
            .route("/infrastructure-totals", web::get().to(handlers::infrastructure))
            .route("/ingest-dataset", web::post().to(handlers::ingest_dataset)),
    );
}

/// Starts the HTTP server and runs until shutdown.
///
/// The caller provides the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Error` if the server fails to bind.
pub async fn run_server(config: TomlConfig, engine: ReportEngine) -> std::io::Result<()> {
    let bind_addr = config.server.bind.clone();
    let port = config.server.port;

    tracing::info!(
        "Starting server on {}:{} (storage {})",
        bind_addr,
        port,
        engine.storage().describe()
    );

    let state = web::Data::new(AppState { engine, config });

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(routes)
    })
    .bind((bind_addr.as_str(), port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let missing = ForecastError::DataNotFound {
            path: "data/parks.csv".to_string(),
        };
        assert_eq!(ResponseError::status_code(&missing), StatusCode::NOT_FOUND);

        let empty = ForecastError::NoRows {
            source_name: "parks.csv".to_string(),
        };
        assert_eq!(
            ResponseError::status_code(&empty),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ResponseError::status_code(&ForecastError::DegenerateInput),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
