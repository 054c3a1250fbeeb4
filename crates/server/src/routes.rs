use axum::{
    routing::{get, patch},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod client_services;
pub mod clients;
pub mod payments;
pub mod services;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/api/clients", get(clients::list_clients).post(clients::create_client))
        .route(
            "/api/clients/:id",
            get(clients::get_client).put(clients::update_client).delete(clients::delete_client),
        )
        .route("/api/clients/:id/status", patch(clients::set_client_status))
        .route("/api/services", get(services::list_services).post(services::create_service))
        .route(
            "/api/services/:id",
            get(services::get_service)
                .put(services::update_service)
                .delete(services::delete_service),
        )
        .route(
            "/api/client-services",
            get(client_services::list_client_services).post(client_services::create_client_service),
        )
        .route("/api/client-services/search", get(client_services::search_client_services))
        .route("/api/client-services/client/:clientId", get(client_services::list_by_client))
        .route(
            "/api/client-services/:id",
            get(client_services::get_client_service).delete(client_services::delete_client_service),
        )
        .route("/api/client-services/:id/due-date", patch(client_services::update_due_date))
        .route("/api/client-services/:id/status", patch(client_services::update_status))
        .route("/api/payments", get(payments::list_payments).post(payments::create_payment))
        .route("/api/payments/details/all", get(payments::list_detailed_payments))
        .route("/api/payments/filter/date", get(payments::list_payments_by_date))
        .route("/api/payments/status/:status", get(payments::list_payments_by_status))
        .route("/api/payments/client/:clientId", get(payments::list_client_payments))
        .route("/api/payments/client/:clientId/total", get(payments::client_total_payments))
        .route("/api/payments/service/:clientServiceId", get(payments::list_service_payments))
        .route("/api/payments/:id", get(payments::get_payment))
        .route("/api/payments/:id/status", patch(payments::update_payment_status));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
