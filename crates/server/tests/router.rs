use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use sea_orm::{DatabaseBackend, MockDatabase};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::build_router;
use server::state::AppState;
use service::ledger::{PaymentLedger, SeaOrmLedgerStore};

/// Router over a mock connection; good for routes that never reach the DB.
fn test_app() -> axum::Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let ledger = Arc::new(PaymentLedger::new(Arc::new(SeaOrmLedgerStore::new(db.clone()))));
    build_router(AppState { db, ledger }, CorsLayer::very_permissive())
}

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let app = test_app();
    let res = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = test_app();
    let res = app
        .oneshot(Request::builder().uri("/api/unknown").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payment_with_unknown_method_is_rejected_before_storage() {
    let app = test_app();
    let payload = serde_json::json!({
        "client_service_id": 1,
        "amount": "10.00",
        "payment_method": "bitcoin"
    });
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/payments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Validation Error");
}
