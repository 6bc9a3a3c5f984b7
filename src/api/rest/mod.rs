//! # REST API
//!
//! JSON endpoints over the negotiation lifecycle, served with axum.
//!
//! Every endpoint except health expects an `Authorization: Bearer <token>`
//! header issued by the configured identity provider.
//!
//! # Endpoints
//!
//! ## RFQs
//! - `POST /api/v1/rfqs` - Create an RFQ (buyer)
//! - `GET /api/v1/rfqs` - List visible RFQs, newest first
//! - `GET /api/v1/rfqs/{id}` - Get RFQ by ID
//! - `GET /api/v1/rfqs/{id}/quotes` - List visible quotes of an RFQ
//!
//! ## Quotes
//! - `POST /api/v1/quotes` - Submit a quote (supplier)
//! - `POST /api/v1/quotes/{id}/accept` - Accept a quote (buyer)
//!
//! ## Dashboard
//! - `GET /api/v1/dashboard/stats` - Role-scoped counters
//!
//! ## Health
//! - `GET /api/v1/health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use b2b_rfq::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState { coordinator, identity });
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, ApiResult, AppState, Authenticated, ErrorResponse, HealthResponse, QuoteResponse,
    RfqResponse, SubmitQuoteResponse,
};
pub use routes::create_router;
