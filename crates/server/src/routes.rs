use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;
use service::payments::PaymentService;
use service::storage::PaymentRepository;

pub mod payments;

pub const PAYMENTS_PATH: &str = "/payments";

/// Shared handler state; the repository behind the service is picked at startup.
#[derive(Clone)]
pub struct AppState {
    pub payments: Arc<PaymentService<dyn PaymentRepository>>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let payment_routes = Router::new()
        .route(PAYMENTS_PATH, get(payments::list_payments).post(payments::create_payment))
        .route(
            &format!("{}/:id", PAYMENTS_PATH),
            get(payments::get_payment)
                .patch(payments::update_payment)
                .delete(payments::delete_payment),
        );

    Router::new()
        .route("/health", get(health))
        .merge(payment_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
