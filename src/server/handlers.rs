//! HTTP handler functions for the dashboard API.

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::app::reports::ai_planning::PlanningImpactReport;
use crate::app::reports::coverage::{CoverageDataset, CoverageReport, ParkCoverageReport};
use crate::app::reports::housing_road::HousingRoadReport;
use crate::app::reports::infrastructure::{infrastructure_totals, TotalsSources};
use crate::app::reports::sustainability::SustainabilityReport;
use crate::core::{ConfigProvider, Report};
use crate::utils::error::ForecastError;
use crate::utils::validation;

use super::AppState;

type HandlerResult = Result<HttpResponse, ForecastError>;

#[derive(Debug, Serialize)]
pub struct ApiHealth {
    pub healthy: bool,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReceipt {
    pub key: String,
    pub bytes: usize,
    pub fetched_at: String,
    pub persisted: bool,
}

fn cached<T: Serialize>(state: &AppState, endpoint: &str, body: &T) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((
            header::CACHE_CONTROL,
            state.config.cache_policy(endpoint).header_value(),
        ))
        .json(body)
}

async fn run_report<R: Report>(state: &AppState, report: R) -> HandlerResult {
    match state.engine.run(&report).await {
        Ok(body) => Ok(cached(state, report.name(), &body)),
        Err(e) => {
            tracing::error!(
                "{} failed: {} (category: {:?}, source: {})",
                report.name(),
                e,
                e.category(),
                report.source()
            );
            Err(e)
        }
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/school-coverage`
pub async fn school_coverage(state: web::Data<AppState>) -> HandlerResult {
    let dataset = CoverageDataset::school(state.config.datasets.school.clone());
    run_report(&state, CoverageReport::new(dataset)).await
}

/// `GET /api/hospital-coverage`
pub async fn hospital_coverage(state: web::Data<AppState>) -> HandlerResult {
    let dataset = CoverageDataset::hospital(state.config.datasets.hospital.clone());
    run_report(&state, CoverageReport::new(dataset)).await
}

/// `GET /api/park-coverage`
pub async fn park_coverage(state: web::Data<AppState>) -> HandlerResult {
    let report = ParkCoverageReport::new(state.config.datasets.park.clone());
    run_report(&state, report).await
}

/// `GET /api/housing-road-analysis`
pub async fn housing_road_analysis(state: web::Data<AppState>) -> HandlerResult {
    let report = HousingRoadReport::new(state.config.datasets.housing_road.clone());
    run_report(&state, report).await
}

/// `GET /api/ai-planning-impact`
pub async fn ai_planning_impact(state: web::Data<AppState>) -> HandlerResult {
    let report = PlanningImpactReport::new(state.config.datasets.ai_planning.clone());
    run_report(&state, report).await
}

/// `GET /api/sustainable-resources`
///
/// Historical readings plus a per-metric linear forecast to the target year.
pub async fn sustainable_resources(state: web::Data<AppState>) -> HandlerResult {
    let report = SustainabilityReport::new(
        state.config.datasets.sustainability.clone(),
        state.config.target_year(),
        state.config.milestone_year(),
    );
    run_report(&state, report).await
}

/// `GET /api/infrastructure-totals`
///
/// Always answers 200; read failures produce the fallback payload.
pub async fn infrastructure(state: web::Data<AppState>) -> HttpResponse {
    let datasets = &state.config.datasets;
    let sources = TotalsSources {
        school: datasets.school.clone(),
        hospital: datasets.hospital.clone(),
        park: datasets.park.clone(),
    };
    let totals = infrastructure_totals(&state.engine, &sources).await;
    cached(&state, "infrastructure-totals", &totals)
}

/// `POST /api/ingest-dataset`
///
/// Fetches the object so callers can confirm it is reachable. Nothing is
/// parsed or stored yet.
pub async fn ingest_dataset(
    state: web::Data<AppState>,
    request: web::Json<IngestRequest>,
) -> HandlerResult {
    let IngestRequest { key } = request.into_inner();
    validation::validate_object_key("key", &key)?;

    let bytes = state.engine.storage().read_file(&key).await.map_err(|e| {
        tracing::error!("Ingest fetch of {} failed: {}", key, e);
        e
    })?;
    tracing::info!(
        "Fetched {} ({} bytes) from {}",
        key,
        bytes.len(),
        state.engine.storage().describe()
    );

    Ok(HttpResponse::Accepted().json(IngestReceipt {
        key,
        bytes: bytes.len(),
        fetched_at: chrono::Utc::now().to_rfc3339(),
        persisted: false,
    }))
}
