use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::config::IntakeConfig;
use crate::workflows::loans::domain::LoanType;
use crate::workflows::loans::repository::LoanRepository;
use crate::workflows::loans::router::{
    failed_handler, loan_router, processed_handler, submit_handler, LoanSubmissionRequest,
};
use crate::workflows::loans::service::LoanDesk;

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

#[tokio::test]
async fn submit_route_accepts_and_reports_decision() {
    let (desk, _, _) = build_desk();
    let router = loan_router(Arc::new(desk));

    let response = router
        .oneshot(post_json(
            "/api/v1/loans",
            json!({ "loan_type": "HOME", "customer_name": "Asha", "amount": 5_000_000.0 }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["loan_id"], 1001);
    assert_eq!(payload["status"], "REJECTED");
    assert_eq!(payload["outcome"], "processed");
}

#[tokio::test]
async fn submit_route_treats_null_name_as_missing() {
    let (desk, _, _) = build_desk();
    let router = loan_router(Arc::new(desk));

    let response = router
        .oneshot(post_json(
            "/api/v1/loans",
            json!({ "loan_type": "personal", "customer_name": null, "amount": 100.0 }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["outcome"], "failed");
    assert_eq!(payload["kind"], "validation");
    assert_eq!(payload["status"], "PENDING");
    assert_eq!(payload["reason"], "Customer name is required for PersonalLoan.");
}

#[tokio::test]
async fn submit_handler_rejects_unknown_loan_type() {
    let (desk, repository, _) = build_desk();
    let desk = Arc::new(desk);

    let response = submit_handler(
        State(desk.clone()),
        axum::Json(LoanSubmissionRequest {
            loan_type: "auto".to_string(),
            customer_name: Some("Asha".to_string()),
            amount: 10.0,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("unknown loan type"));
    assert_eq!(desk.last_issued_id(), 1000, "no id is drawn");
    assert!(repository.failed_entries().expect("failed").is_empty());
}

#[tokio::test]
async fn submit_handler_rejects_non_finite_amount() {
    let (desk, _, _) = build_desk();

    let response = submit_handler(
        State(Arc::new(desk)),
        axum::Json(LoanSubmissionRequest {
            loan_type: "home".to_string(),
            customer_name: Some("Asha".to_string()),
            amount: f64::INFINITY,
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn views_return_internal_error_when_repository_unavailable() {
    let desk = Arc::new(LoanDesk::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        IntakeConfig::default(),
    ));

    let processed = processed_handler(State(desk.clone())).await.into_response();
    assert_eq!(processed.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let failed = failed_handler(State(desk)).await.into_response();
    assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn processed_and_failed_routes_list_records() {
    let (desk, _, _) = build_desk();
    let desk = Arc::new(desk);
    desk.submit(LoanType::Personal, "Raj", 500_000.0)
        .expect("submit");
    desk.submit(LoanType::Home, "", 10_000.0)
        .expect("submit");
    let router = loan_router(desk);

    let processed = router
        .clone()
        .oneshot(get("/api/v1/loans/processed"))
        .await
        .expect("router dispatch");
    assert_eq!(processed.status(), StatusCode::OK);
    let payload = read_json_body(processed).await;
    assert_eq!(payload["groups"][0]["loan_type"], "PERSONAL");
    assert_eq!(payload["groups"][0]["loans"][0]["customer_name"], "Raj");
    assert_eq!(payload["groups"][0]["loans"][0]["status"], "APPROVED");

    let failed = router
        .oneshot(get("/api/v1/loans/failed"))
        .await
        .expect("router dispatch");
    assert_eq!(failed.status(), StatusCode::OK);
    let payload = read_json_body(failed).await;
    assert_eq!(payload["loans"][0]["id"], 1002);
    assert_eq!(payload["loans"][0]["kind"], "validation");
}

#[tokio::test]
async fn audit_route_lists_registry() {
    let (desk, _, _) = build_desk();
    let router = loan_router(Arc::new(desk));

    let response = router
        .oneshot(get("/api/v1/audit/operations"))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["operations"],
        json!([
            { "type_name": "HomeLoan", "operation": "evaluate_risk" },
            { "type_name": "PersonalLoan", "operation": "evaluate_risk" }
        ])
    );
}
