use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::evaluation::memory::InMemorySupplierStore;
use crate::evaluation::router::{evaluate_handler, evaluation_router, EvaluationRequest};
use crate::evaluation::service::SupplierEvaluationService;

fn router_for(store: &InMemorySupplierStore) -> axum::Router {
    evaluation_router(Arc::new(build_service(store)))
}

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn evaluate_route_returns_record() {
    let router = router_for(&seeded_store());

    let response = router
        .oneshot(post_json(
            "/api/v1/suppliers/sup-1/evaluations",
            json!({ "period": PERIOD }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["supplier_code"], "ACME");
    assert_eq!(body["period"], PERIOD);
    assert_eq!(body["rating"], "A");
    assert_eq!(body["status"], "computed");
    assert_eq!(body["breakdown"]["delivery"]["late_orders"], 1);
}

#[tokio::test]
async fn evaluate_route_applies_custom_weights() {
    let router = router_for(&seeded_store());

    let response = router
        .oneshot(post_json(
            "/api/v1/suppliers/sup-1/evaluations",
            json!({
                "period": PERIOD,
                "weights": { "delivery": 0, "quality": 0, "price": 0, "response": 100 }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["rating"], "A+");
    assert_eq!(body["weights"]["response"], 100.0);
}

#[tokio::test]
async fn evaluate_handler_maps_errors_to_status_codes() {
    let store = seeded_store();
    let service = Arc::new(build_service(&store));

    let missing = evaluate_handler(
        State(service.clone()),
        Path("sup-404".to_string()),
        axum::Json(EvaluationRequest {
            period: PERIOD.to_string(),
            weights: None,
        }),
    )
    .await;
    assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

    let malformed = evaluate_handler(
        State(service),
        Path("sup-1".to_string()),
        axum::Json(EvaluationRequest {
            period: "2025-13".to_string(),
            weights: None,
        }),
    )
    .await;
    assert_eq!(malformed.into_response().status(), StatusCode::BAD_REQUEST);

    let offline = Arc::new(SupplierEvaluationService::new(
        Arc::new(store),
        Arc::new(UnavailableRepository),
    ));
    let unavailable = evaluate_handler(
        State(offline),
        Path("sup-1".to_string()),
        axum::Json(EvaluationRequest {
            period: PERIOD.to_string(),
            weights: None,
        }),
    )
    .await;
    assert_eq!(unavailable.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn batch_and_ranking_routes_report_results() {
    let store = seeded_store();

    let response = router_for(&store)
        .oneshot(post_json(
            "/api/v1/evaluations/batch",
            json!({ "period": PERIOD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["evaluated"], 2);
    assert_eq!(body["failed"], json!([]));

    let response = router_for(&store)
        .oneshot(
            Request::get("/api/v1/evaluations/ranking?period=2025-03&limit=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let rows = body.as_array().expect("ranking array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["supplier_code"], "ACME");
    assert_eq!(rows[0]["rating"], "A");
}

#[tokio::test]
async fn history_route_lists_supplier_evaluations() {
    let store = seeded_store();
    let service = build_service(&store);
    for period in ["2025-02", "2025-03"] {
        service
            .evaluate(&crate::evaluation::domain::SupplierId("sup-1".to_string()), period, None)
            .expect("evaluation succeeds");
    }

    let response = router_for(&store)
        .oneshot(
            Request::get("/api/v1/suppliers/sup-1/evaluations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let periods: Vec<_> = body
        .as_array()
        .expect("history array")
        .iter()
        .map(|row| row["period"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(periods, vec!["2025-03", "2025-02"]);
}

#[tokio::test]
async fn ranking_route_rejects_bad_period() {
    let response = router_for(&seeded_store())
        .oneshot(
            Request::get("/api/v1/evaluations/ranking?period=03-2025")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn evaluate_route_rejects_negative_weights() {
    let store = seeded_store();

    let response = router_for(&store)
        .oneshot(post_json(
            "/api/v1/suppliers/sup-1/evaluations",
            json!({
                "period": PERIOD,
                "weights": { "delivery": 60, "quality": 60, "price": 0, "response": -20 }
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(store.evaluation_count(), 0);
}
