//! Tests for the Metrics handlers.

use super::*;
use crate::domain::test_support::FixtureClock;
use crate::domain::{Actor, AuditStamp};
use crate::inbound::http::test_utils::{MockServices, bearer, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};

fn reading(id: i32, name: &str, value: f64, history: i32) -> Metrics {
    Metrics {
        id: MetricsId::from_stored(id),
        name: name.to_owned(),
        value,
        disease_history_id: DiseaseHistoryId::from_stored(history),
        audit: AuditStamp::created(&Actor::seed(), &FixtureClock::at_hour(8)),
    }
}

#[actix_web::test]
async fn get_metrics_wraps_list() {
    let mut services = MockServices::patient();
    services
        .metrics
        .expect_get_metrics()
        .times(1)
        .return_once(|| Ok(vec![reading(1, "Pulse", 72.0, 4), reading(2, "SpO2", 97.5, 4)]));
    let app = actix_test::init_service(test_app(services, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/Metrics/GetMetrics")
        .insert_header(bearer())
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(
        body,
        json!({ "metrics": [
            { "id": 1, "name": "Pulse", "value": 72.0, "diseaseHistoryId": 4 },
            { "id": 2, "name": "SpO2", "value": 97.5, "diseaseHistoryId": 4 }
        ]})
    );
}

#[actix_web::test]
async fn get_metrics_by_id_returns_view() {
    let mut services = MockServices::patient();
    services
        .metrics
        .expect_get_metrics_by_id()
        .with(eq(MetricsId::from_stored(3)))
        .times(1)
        .return_once(|_| Ok(reading(3, "Pulse", 80.0, 1)));
    let app = actix_test::init_service(test_app(services, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/Metrics/GetMetricsById/3")
        .insert_header(bearer())
        .to_request();
    let body: MetricView = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.id, 3);
    assert_eq!(body.disease_history_id, 1);
}

#[actix_web::test]
async fn missing_reading_is_not_found() {
    let mut services = MockServices::patient();
    services
        .metrics
        .expect_get_metrics_by_id()
        .return_once(|_| Err(Error::not_found("metrics 9 not found")));
    let app = actix_test::init_service(test_app(services, configure)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/Metrics/GetMetricsById/9")
        .insert_header(bearer())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("/api/Metrics/GetMetricsById/0")]
#[case("/api/Metrics/GetMetricsById/abc")]
#[case("/api/Metrics/GetMetricsFromDiseaseHistory/-1")]
#[actix_web::test]
async fn malformed_ids_are_rejected(#[case] uri: &str) {
    let app = actix_test::init_service(test_app(MockServices::patient(), configure)).await;

    let request = actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_id");
}

#[actix_web::test]
async fn add_metrics_passes_validated_draft_and_actor() {
    let mut services = MockServices::staff();
    services
        .metrics
        .expect_add_metrics()
        .withf(|draft, actor| {
            draft.name() == "Pulse"
                && draft.disease_history_id().get() == 2
                && actor.as_str() == "employee1@test.com"
        })
        .times(1)
        .return_once(|_, _| Ok(reading(11, "Pulse", 64.0, 2)));
    let app = actix_test::init_service(test_app(services, configure)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/Metrics/AddMetrics")
        .insert_header(bearer())
        .set_json(json!({ "name": " Pulse ", "value": 64.0, "diseaseHistoryId": 2 }))
        .to_request();
    let body: MetricView = actix_test::call_and_read_body_json(&app, request).await;

    assert_eq!(body.id, 11);
}

#[rstest]
#[case(json!({ "value": 1.0, "diseaseHistoryId": 2 }), "name", "missing_field")]
#[case(json!({ "name": "Pulse", "diseaseHistoryId": 2 }), "value", "missing_field")]
#[case(json!({ "name": "Pulse", "value": 1.0 }), "diseaseHistoryId", "missing_field")]
#[case(json!({ "name": "  ", "value": 1.0, "diseaseHistoryId": 2 }), "name", "empty_value")]
#[case(json!({ "name": "Pulse", "value": 1.0, "diseaseHistoryId": 0 }), "diseaseHistoryId", "invalid_id")]
#[case(json!({ "name": "Pulse", "value": "high", "diseaseHistoryId": 2 }), "body", "invalid_body")]
#[actix_web::test]
async fn add_metrics_rejects_invalid_models(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    // No add_metrics expectation: reaching the service would panic the mock.
    let app = actix_test::init_service(test_app(MockServices::staff(), configure)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/Metrics/AddMetrics")
        .insert_header(bearer())
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"], json!({ "field": field, "code": code }));
}

#[actix_web::test]
async fn edit_metrics_requires_id() {
    let app = actix_test::init_service(test_app(MockServices::staff(), configure)).await;

    let request = actix_test::TestRequest::put()
        .uri("/api/Metrics/EditMetrics")
        .insert_header(bearer())
        .set_json(json!({ "name": "Pulse", "value": 70.0, "diseaseHistoryId": 2 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "id");
}

#[actix_web::test]
async fn edit_metrics_updates_by_body_id() {
    let mut services = MockServices::staff();
    services
        .metrics
        .expect_edit_metrics()
        .withf(|id, draft, _| id.get() == 5 && (draft.value() - 70.0).abs() < f64::EPSILON)
        .times(1)
        .return_once(|_, _, _| Ok(reading(5, "Pulse", 70.0, 2)));
    let app = actix_test::init_service(test_app(services, configure)).await;

    let request = actix_test::TestRequest::put()
        .uri("/api/Metrics/EditMetrics")
        .insert_header(bearer())
        .set_json(json!({ "id": 5, "name": "Pulse", "value": 70.0, "diseaseHistoryId": 2 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn patients_cannot_add_metrics() {
    let app = actix_test::init_service(test_app(MockServices::patient(), configure)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/Metrics/AddMetrics")
        .insert_header(bearer())
        .set_json(json!({ "name": "Pulse", "value": 64.0, "diseaseHistoryId": 2 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case(None)]
#[case(Some("Bearer wrong-token"))]
#[actix_web::test]
async fn requests_without_valid_token_are_unauthorised(#[case] header: Option<&str>) {
    let app = actix_test::init_service(test_app(MockServices::patient(), configure)).await;

    let mut request = actix_test::TestRequest::get().uri("/api/Metrics/GetMetrics");
    if let Some(value) = header {
        request = request.insert_header((actix_web::http::header::AUTHORIZATION, value));
    }
    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
