use crate::infra::{AppState, Desk};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json};
use serde_json::json;
use smart_loan::workflows::loans::loan_router;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn with_service_routes(desk: Arc<Desk>) -> axum::Router {
    loan_router(desk)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::build_desk;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use smart_loan::config::IntakeConfig;
    use tower::ServiceExt;

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn service_routes_include_loan_endpoints() {
        let router = with_service_routes(Arc::new(build_desk(IntakeConfig::default())));

        let response = router
            .oneshot(
                Request::post("/api/v1/loans")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"loan_type":"HOME","customer_name":"Asha","amount":4999999}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&body).expect("json");
        assert_eq!(payload["status"], "APPROVED");
        assert_eq!(payload["loan_id"], 1001);
    }
}
