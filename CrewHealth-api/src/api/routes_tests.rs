use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crew_health_domain::testing::{
    create_mock_health_record_service, in_memory_draft_service, MockHealthService,
};

use crate::api::routes::build_router;
use crate::api::state::AppState;

fn test_app() -> Router {
    let state = AppState::new(
        Arc::new(create_mock_health_record_service()),
        in_memory_draft_service(),
    );
    build_router(state, Arc::new(MockHealthService::new()))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

fn normal_vitals() -> Value {
    json!({
        "temperature": 36.8,
        "heart_rate": 68,
        "systolic": "115",
        "diastolic": "75",
        "oxygen_saturation": 98,
        "respiratory_rate": 15
    })
}

#[tokio::test]
async fn test_health_endpoint_and_security_headers() {
    let app = test_app();

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");

    let (_, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["database"]["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = send(&test_app(), "GET", "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "CrewHealth API");
    assert!(body["paths"]["/api/v1/health-checks"].is_object());
}

#[tokio::test]
async fn test_assess_normal_reading() {
    let (status, body) = send(
        &test_app(),
        "POST",
        "/api/v1/vitals/assess",
        Some(json!({ "vitals": normal_vitals() })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["errors"], json!({}));
    assert_eq!(body["summary"]["blood_pressure_category"], "Normal");
    assert_eq!(body["summary"]["risk_tier"], "Low");
    assert_eq!(body["reading"]["temperature_unit"], "C");
}

#[tokio::test]
async fn test_assess_reports_field_errors() {
    let (status, body) = send(
        &test_app(),
        "POST",
        "/api/v1/vitals/assess",
        Some(json!({
            "unit": "F",
            "vitals": {
                "temperature": 36.8,
                "heart_rate": "abc",
                "systolic": 250,
                "diastolic": 80,
                "oxygen_saturation": 97,
                "respiratory_rate": 16
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["errors"]["heart_rate"], "Heart rate must be a number");
    assert_eq!(
        body["errors"]["blood_pressure"],
        "Blood pressure must be between 70-200 / 40-130 mmHg"
    );
    assert!(body["errors"]["temperature"].is_string());
    assert!(body["reading"]["heart_rate"].is_null());
}

#[tokio::test]
async fn test_convert_temperature() {
    let (status, body) = send(
        &test_app(),
        "POST",
        "/api/v1/vitals/convert-temperature",
        Some(json!({ "value": 37.0, "from": "C", "to": "F" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], 98.6);
    assert_eq!(body["unit"], "F");
}

#[tokio::test]
async fn test_submit_health_check_and_fetch_record() {
    let app = test_app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/health-checks",
        Some(json!({
            "crew_id": "crew-7",
            "vitals": normal_vitals(),
            "symptoms": ["headache"],
            "notes": "  After night watch  ",
            "recorded_at": "2024-03-15T08:30:00Z"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["record_type"], "health_check");
    assert_eq!(created["notes"], "After night watch");
    assert_eq!(created["payload"]["summary"]["risk_tier"], "Low");
    assert_eq!(created["payload"]["symptoms"], json!(["headache"]));

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/v1/records/{}", id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["crew_id"], "crew-7");
}

#[tokio::test]
async fn test_submit_invalid_health_check_returns_422() {
    let app = test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/health-checks",
        Some(json!({
            "crew_id": "crew-7",
            "vitals": { "temperature": 36.8, "systolic": 120 }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "invalid_vitals");
    assert_eq!(body["details"]["heart_rate"], "Heart rate is required");
    assert!(body["details"]["blood_pressure"].is_string());

    let (_, list) = send(&app, "GET", "/api/v1/records?crew_id=crew-7", None).await;
    assert_eq!(list["total_count"], 0);
}

#[tokio::test]
async fn test_submission_clears_saved_draft() {
    let app = test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/api/v1/drafts/crew-3",
        Some(json!({ "unit": "C", "form": { "temperature": "37.1" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/health-checks",
        Some(json!({ "crew_id": "crew-3", "vitals": normal_vitals() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, "GET", "/api/v1/drafts/crew-3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_record_lifecycle() {
    let app = test_app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/records",
        Some(json!({
            "crew_id": "crew-1",
            "record_type": "vaccination",
            "recorded_at": "2024-01-10T09:00:00Z",
            "payload": { "vaccine": "Yellow fever" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/v1/records/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(&app, "PUT", &uri, Some(json!({ "notes": "Booster due 2034" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["notes"], "Booster due 2034");
    assert_eq!(updated["payload"]["vaccine"], "Yellow fever");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_record_request_errors() {
    let app = test_app();

    let (status, _) = send(&app, "GET", "/api/v1/records/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/records",
        Some(json!({
            "crew_id": "crew-1",
            "record_type": "horoscope",
            "recorded_at": "2024-01-10T09:00:00Z"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(&app, "GET", "/api/v1/records?sort=sideways", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/v1/records?start_date=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/v1/records?record_type=horoscope", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_records_paginates_with_links() {
    let app = test_app();

    for day in 1..=3 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/records",
            Some(json!({
                "crew_id": "crew-2",
                "record_type": "symptom_report",
                "recorded_at": format!("2024-02-0{}T12:00:00Z", day),
                "payload": { "symptoms": ["cough"] }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = send(&app, "GET", "/api/v1/records?crew_id=crew-2&limit=2&sort=asc", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 3);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert!(page["data"][0]["recorded_at"].as_str().unwrap().starts_with("2024-02-01"));
    assert_eq!(
        page["next"],
        "/api/v1/records?crew_id=crew-2&limit=2&offset=2&sort=asc"
    );
    assert!(page["previous"].is_null());
}

#[tokio::test]
async fn test_draft_round_trip() {
    let app = test_app();

    let (status, _) = send(&app, "GET", "/api/v1/drafts/crew-5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, saved) = send(
        &app,
        "PUT",
        "/api/v1/drafts/crew-5",
        Some(json!({
            "unit": "F",
            "form": { "temperature": "98.4", "symptoms": ["fatigue"], "notes": "Rough seas" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["crew_id"], "crew-5");

    let (status, loaded) = send(&app, "GET", "/api/v1/drafts/crew-5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["unit"], "F");
    assert_eq!(loaded["form"]["temperature"], "98.4");
    assert_eq!(loaded["form"]["symptoms"], json!(["fatigue"]));

    let (status, _) = send(&app, "DELETE", "/api/v1/drafts/crew-5", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "DELETE", "/api/v1/drafts/crew-5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
