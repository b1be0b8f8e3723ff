use actix_web::dev::ServiceResponse;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use std::sync::Arc;
use tempfile::TempDir;
use urban_forecast::domain::model::CachePolicy;
use urban_forecast::server::{routes, AppState};
use urban_forecast::{LocalStorage, ReportEngine, TomlConfig};

const SCHOOLS: &str = "zone_id,zone_name,predicted_coverage_score,num_schools\n1,A,80,10\n2,B,60,5\n3,C,100,15";

fn state_for(dir: &TempDir, config: TomlConfig) -> web::Data<AppState> {
    let storage = LocalStorage::new(dir.path());
    web::Data::new(AppState {
        engine: ReportEngine::new(Arc::new(storage)),
        config,
    })
}

fn write(dir: &TempDir, name: &str, content: &str) {
    std::fs::write(dir.path().join(name), content).unwrap();
}

fn cache_header<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_school_coverage_end_to_end() {
    let dir = TempDir::new().unwrap();
    write(&dir, "school_coverage_predictions.csv", SCHOOLS);

    let app = test::init_service(
        App::new()
            .app_data(state_for(&dir, TomlConfig::default()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/school-coverage").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        cache_header(&resp),
        "public, s-maxage=300, stale-while-revalidate=600"
    );

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["coverage"], 80);
    assert_eq!(body["totalFacilities"], 30);
    assert_eq!(body["status"], "excellent");
    assert_eq!(body["zones"].as_array().unwrap().len(), 3);
    assert_eq!(body["zones"][0]["num_schools"], 10.0);
    assert!(body["zones"][0]["num_schools"].is_i64());
    assert!(body["zones"][0]["zone_id"].is_string());
}

#[actix_web::test]
async fn test_missing_dataset_is_not_found_for_every_coverage_route() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state_for(&dir, TomlConfig::default()))
            .configure(routes),
    )
    .await;

    for uri in [
        "/api/school-coverage",
        "/api/hospital-coverage",
        "/api/park-coverage",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(resp.headers().get(header::CACHE_CONTROL).is_none());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Data file not found");
        assert!(body.get("zones").is_none());
    }
}

#[actix_web::test]
async fn test_header_only_file_is_server_error() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "hospital_coverage_predictions.csv",
        "zone_id,zone_name,predicted_coverage_score,num_facilities\n\n",
    );
    let app = test::init_service(
        App::new()
            .app_data(state_for(&dir, TomlConfig::default()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/hospital-coverage").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No data available");
}

#[actix_web::test]
async fn test_park_coverage_summary() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "park_coverage_predictions.csv",
        "zone_id,zone_name,predicted_coverage_score,coverage_label,num_parks,total_area,status,urban_green_balance_index,progress_to_who\n\
         1,\"Central, Old City\",64.0,Good Coverage,120,3.5,good,30.0,40.0\n\
         2,South,82.0,Excellent Coverage,80,6.5,excellent,50.0,60.0\n",
    );
    let app = test::init_service(
        App::new()
            .app_data(state_for(&dir, TomlConfig::default()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/park-coverage").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["summary"]["totalZones"], 2);
    assert_eq!(body["summary"]["totalParks"], 200);
    assert_eq!(body["summary"]["avgUGBI"], 40.0);
    assert_eq!(body["summary"]["avgProgressWHO"], 50.0);
    assert_eq!(body["zones"][0]["zone_name"], "Central, Old City");
    assert_eq!(body["zones"][0]["total_area"], 3.5);
    assert_eq!(body["zones"][0]["urban_green_balance_index"].to_string(), "30");
}

#[actix_web::test]
async fn test_sustainability_forecast_route() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "sustainable_resources.csv",
        "Year,Water_Consumption_MGD,Energy_Consumption_GWh,Waste_Generated_Tonnes,Resource_Efficiency_Index,Sustainability_Score\n\
         2021,900,31000,3400000,0.61,58\n\
         2022,920,32000,3350000,0.63,60\n\
         2023,940,33000,3300000,0.65,62\n\
         2024,960,34000,3250000,0.67,64\n",
    );
    let app = test::init_service(
        App::new()
            .app_data(state_for(&dir, TomlConfig::default()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/sustainable-resources").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        cache_header(&resp),
        "public, s-maxage=60, stale-while-revalidate=300"
    );

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["historical"].as_array().unwrap().len(), 4);
    assert_eq!(body["predictions"]["years"], serde_json::json!([2025, 2026, 2027, 2028, 2029, 2030]));
    assert_eq!(body["predictions"]["score"][0], 66.0);
    assert_eq!(body["predictions"]["efficiency"][5], 0.79);
    assert_eq!(body["insights"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn test_unforecastable_sustainability_is_server_error() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "sustainable_resources.csv",
        "Year,Water_Consumption_MGD,Energy_Consumption_GWh,Waste_Generated_Tonnes,Resource_Efficiency_Index,Sustainability_Score\n\
         2024,960,34000,3250000,0.67,64\n",
    );
    let app = test::init_service(
        App::new()
            .app_data(state_for(&dir, TomlConfig::default()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/sustainable-resources").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    write(
        &dir,
        "sustainable_resources.csv",
        "Year,Water_Consumption_MGD,Energy_Consumption_GWh,Waste_Generated_Tonnes,Resource_Efficiency_Index,Sustainability_Score\n\
         2020,900,31000,3400000,0.61,58\n\
         9999999999,960,34000,3250000,0.67,64\n",
    );
    let req = test::TestRequest::get().uri("/api/sustainable-resources").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to process data");
}

#[actix_web::test]
async fn test_housing_and_planning_routes() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "housing_road_analysis.csv",
        "District,Avg_Density,Total_Housing_Units,Total_Road_Length_KM,Congestion_Level,Infrastructure_Score,Model_R2_Score,Model_MSE,Model_MAE\n\
         East,20000,300000,500.5,70.0,55.0,0.82,1200,30\n\
         West,10000,200000,700.5,50.0,75.0,0.82,1200,30\n",
    );
    write(
        &dir,
        "ai_planning_impact.csv",
        "Zone,Traffic_Efficiency_Before,Traffic_Efficiency_After,Commute_Before,Commute_After,Housing_Access_Before,Housing_Access_After,Infra_Util_Before,Infra_Util_After,Pollution_Index_Before,Pollution_Index_After\n\
         East,50,65,55,44,40,52,60,70,140,120\n",
    );
    let app = test::init_service(
        App::new()
            .app_data(state_for(&dir, TomlConfig::default()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/housing-road-analysis").to_request();
    let housing: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(housing["summary"]["totalDistricts"], 2);
    assert_eq!(housing["summary"]["avgDensity"], 15000.0);
    assert_eq!(housing["summary"]["totalRoadLength"], 1201.0);
    assert_eq!(housing["summary"]["modelMetrics"]["r2Score"], 0.82);

    let req = test::TestRequest::get().uri("/api/ai-planning-impact").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        cache_header(&resp),
        "public, s-maxage=120, stale-while-revalidate=300"
    );
    let planning: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(planning["improvements"]["trafficImprovement"], 15.0);
    assert_eq!(planning["improvements"]["commuteReduction"], 11.0);
    assert_eq!(planning["improvements"]["pollutionReduction"], 20.0);
}

#[actix_web::test]
async fn test_infrastructure_totals_and_fallback() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state_for(&dir, TomlConfig::default()))
            .configure(routes),
    )
    .await;

    // nothing on disk yet
    let req = test::TestRequest::get().uri("/api/infrastructure-totals").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["fallback"], true);

    write(&dir, "school_coverage_predictions.csv", SCHOOLS);
    write(
        &dir,
        "hospital_coverage_predictions.csv",
        "zone_id,zone_name,predicted_coverage_score,num_facilities\n1,A,70,4\n4,D,65,6\n",
    );
    write(
        &dir,
        "park_coverage_predictions.csv",
        "zone_id,zone_name,predicted_coverage_score,num_parks\n2,B,90,12\n",
    );

    let req = test::TestRequest::get().uri("/api/infrastructure-totals").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        cache_header(&resp),
        "public, s-maxage=300, stale-while-revalidate=300"
    );
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["fallback"], false);
    assert_eq!(body["totalSchools"], 30);
    assert_eq!(body["totalHospitals"], 10);
    assert_eq!(body["totalParks"], 12);
    assert_eq!(body["totalFacilities"], 52);
    assert_eq!(body["zonesCovered"], 4);
}

#[actix_web::test]
async fn test_cache_policy_override_from_config() {
    let dir = TempDir::new().unwrap();
    write(&dir, "school_coverage_predictions.csv", SCHOOLS);

    let mut config = TomlConfig::default();
    config
        .cache
        .insert("school-coverage".to_string(), CachePolicy::new(30, 90));

    let app = test::init_service(App::new().app_data(state_for(&dir, config)).configure(routes)).await;
    let req = test::TestRequest::get().uri("/api/school-coverage").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(
        cache_header(&resp),
        "public, s-maxage=30, stale-while-revalidate=90"
    );
}

#[actix_web::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state_for(&dir, TomlConfig::default()))
            .configure(routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["healthy"], true);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
