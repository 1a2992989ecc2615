//! HTTP gateway (Axum) over the classification and comparison pipeline.
//!
//! This module is primarily used by the `policyalign` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{analyze_handler, classify_handler, compare_handler, domains_handler};
pub use state::AppState;

/// Response header carrying a short machine-readable status.
pub const STATUS_HEADER: &str = "x-policyalign-status";

pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/v1/domains", get(domains_handler))
        .route("/v1/classify", post(classify_handler))
        .route("/v1/analyze", post(analyze_handler))
        .route("/v1/compare", post(compare_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static("healthy"));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}
