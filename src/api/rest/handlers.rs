//! # REST Handlers
//!
//! Request handlers, DTOs and error mapping for the REST API.
//!
//! Every handler except `health` authenticates the caller through the
//! [`Authenticated`] extractor and hands the resulting [`Principal`] to the
//! [`NegotiationCoordinator`].

use crate::application::commands::{CreateRfq, SubmitQuote};
use crate::application::error::ApplicationError;
use crate::application::services::{DashboardStats, NegotiationCoordinator};
use crate::domain::entities::{Principal, Quote, Rfq};
use crate::domain::value_objects::{Price, ProductId, QuoteId, RfqId, RfqStatus, Timestamp, UserId};
use crate::infrastructure::identity::{Credential, IdentityProvider};
use axum::Json;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Shared state of the REST API.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Negotiation command surface.
    pub coordinator: NegotiationCoordinator,
    /// Bearer token verification.
    pub identity: Arc<dyn IdentityProvider>,
}

// ============================================================================
// Authentication
// ============================================================================

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl FromRequestParts<Arc<AppState>> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApplicationError::authentication("missing bearer token"))?;

        let principal = state
            .identity
            .authenticate(&Credential::bearer(bearer.token()))
            .await
            .map_err(ApplicationError::from)?;
        debug!(principal = %principal, "request authenticated");
        Ok(Self(principal))
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable description.
    pub message: String,
    /// RFQ status that refused the operation, for state errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RfqStatus>,
}

/// An [`ApplicationError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            ApplicationError::Validation(_) => StatusCode::BAD_REQUEST,
            ApplicationError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApplicationError::Authorization(_) => StatusCode::FORBIDDEN,
            ApplicationError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApplicationError::State { .. } | ApplicationError::Conflict(_) => StatusCode::CONFLICT,
            ApplicationError::Repository(_) | ApplicationError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn kind(&self) -> &'static str {
        match &self.0 {
            ApplicationError::Validation(_) => "validation_error",
            ApplicationError::Authentication(_) => "authentication_error",
            ApplicationError::Authorization(_) => "authorization_error",
            ApplicationError::NotFound { .. } => "not_found",
            ApplicationError::State { .. } => "state_error",
            ApplicationError::Conflict(_) => "conflict",
            ApplicationError::Repository(_) | ApplicationError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            error!(error = %self.0, "request failed");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };
        let body = ErrorResponse {
            error: self.kind().to_string(),
            message,
            status: self.0.status(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type of the handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// DTOs
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Time of the check.
    pub checked_at: Timestamp,
}

/// RFQ as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqResponse {
    /// RFQ id.
    pub id: RfqId,
    /// Owning buyer.
    pub buyer_id: UserId,
    /// Requested product.
    pub product_id: ProductId,
    /// Requested quantity.
    pub quantity: u64,
    /// Note to suppliers.
    pub message: Option<String>,
    /// Current status.
    pub status: RfqStatus,
    /// Quote that closed the RFQ, if any.
    pub accepted_quote_id: Option<QuoteId>,
    /// Creation time.
    pub created_at: Timestamp,
    /// End of the validity window.
    pub expires_at: Timestamp,
}

impl From<&Rfq> for RfqResponse {
    fn from(rfq: &Rfq) -> Self {
        Self {
            id: rfq.id(),
            buyer_id: rfq.buyer_id(),
            product_id: rfq.product_id(),
            quantity: rfq.quantity(),
            message: rfq.message().map(str::to_string),
            status: rfq.status(),
            accepted_quote_id: rfq.accepted_quote_id(),
            created_at: rfq.created_at(),
            expires_at: rfq.expires_at(),
        }
    }
}

/// Quote as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Quote id.
    pub id: QuoteId,
    /// Quoted RFQ.
    pub rfq_id: RfqId,
    /// Quoting supplier.
    pub supplier_id: UserId,
    /// Unit price.
    pub price_per_unit: Price,
    /// Unit price times the RFQ quantity.
    pub total_price: Price,
    /// Promised delivery time.
    pub delivery_time: String,
    /// Note to the buyer.
    pub message: Option<String>,
    /// Submission time.
    pub created_at: Timestamp,
}

impl From<&Quote> for QuoteResponse {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id(),
            rfq_id: quote.rfq_id(),
            supplier_id: quote.supplier_id(),
            price_per_unit: quote.price_per_unit(),
            total_price: quote.total_price(),
            delivery_time: quote.delivery_time().to_string(),
            message: quote.message().map(str::to_string),
            created_at: quote.created_at(),
        }
    }
}

/// Response to a quote submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitQuoteResponse {
    /// The stored quote.
    pub quote: QuoteResponse,
    /// The RFQ after the quote was recorded.
    pub rfq: RfqResponse,
}

// ============================================================================
// Handlers
// ============================================================================

/// `GET /api/v1/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checked_at: Timestamp::now(),
    })
}

/// `POST /api/v1/rfqs`
pub async fn create_rfq(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Json(cmd): Json<CreateRfq>,
) -> ApiResult<(StatusCode, Json<RfqResponse>)> {
    let rfq = state.coordinator.create_rfq(&principal, cmd).await?;
    Ok((StatusCode::CREATED, Json(RfqResponse::from(&rfq))))
}

/// `GET /api/v1/rfqs`
pub async fn list_rfqs(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
) -> ApiResult<Json<Vec<RfqResponse>>> {
    let rfqs = state.coordinator.list_rfqs(&principal).await?;
    Ok(Json(rfqs.iter().map(RfqResponse::from).collect()))
}

/// `GET /api/v1/rfqs/{id}`
pub async fn get_rfq(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<RfqId>,
) -> ApiResult<Json<RfqResponse>> {
    let rfq = state.coordinator.get_rfq(&principal, id).await?;
    Ok(Json(RfqResponse::from(&rfq)))
}

/// `GET /api/v1/rfqs/{id}/quotes`
pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<RfqId>,
) -> ApiResult<Json<Vec<QuoteResponse>>> {
    let quotes = state.coordinator.list_quotes(&principal, id).await?;
    Ok(Json(quotes.iter().map(QuoteResponse::from).collect()))
}

/// `POST /api/v1/quotes`
pub async fn submit_quote(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Json(cmd): Json<SubmitQuote>,
) -> ApiResult<(StatusCode, Json<SubmitQuoteResponse>)> {
    let submission = state.coordinator.submit_quote(&principal, cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitQuoteResponse {
            quote: QuoteResponse::from(&submission.quote),
            rfq: RfqResponse::from(&submission.rfq),
        }),
    ))
}

/// `POST /api/v1/quotes/{id}/accept`
pub async fn accept_quote(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
    Path(id): Path<QuoteId>,
) -> ApiResult<Json<RfqResponse>> {
    let rfq = state.coordinator.accept_quote(&principal, id).await?;
    Ok(Json(RfqResponse::from(&rfq)))
}

/// `GET /api/v1/dashboard/stats`
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    Authenticated(principal): Authenticated,
) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.coordinator.get_stats(&principal).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::services::authorization::{Action, AuthorizationError};
    use crate::domain::value_objects::Role;
    use crate::infrastructure::persistence::RepositoryError;

    fn status_of(err: ApplicationError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn error_status_mapping() {
        assert_eq!(
            status_of(ApplicationError::validation("bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApplicationError::authentication("expired")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(
                AuthorizationError {
                    role: Role::Buyer,
                    action: Action::SubmitQuote,
                }
                .into()
            ),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ApplicationError::not_found("RFQ", "x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApplicationError::state(RfqStatus::Closed, "closed")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApplicationError::conflict("dup")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(RepositoryError::connection("down").into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn state_error_body_carries_status() {
        let response =
            ApiError(ApplicationError::state(RfqStatus::Expired, "window passed")).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "state_error");
        assert_eq!(body.status, Some(RfqStatus::Expired));
    }

    #[tokio::test]
    async fn internal_errors_are_not_leaked() {
        let response = ApiError(ApplicationError::internal("secret detail")).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert!(!body.message.contains("secret"));
    }
}
