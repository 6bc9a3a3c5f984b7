//! # REST Routes
//!
//! Router assembly for the REST API.

use crate::api::rest::handlers::{
    AppState, accept_quote, create_rfq, dashboard_stats, get_rfq, health, list_quotes, list_rfqs,
    submit_quote,
};
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the API router over `state`.
///
/// All routes are nested under `/api/v1`.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::<Arc<AppState>>::new()
        .route("/health", get(health))
        .route("/rfqs", post(create_rfq).get(list_rfqs))
        .route("/rfqs/{id}", get(get_rfq))
        .route("/rfqs/{id}/quotes", get(list_quotes))
        .route("/quotes", post(submit_quote))
        .route("/quotes/{id}/accept", post(accept_quote))
        .route("/dashboard/stats", get(dashboard_stats));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
