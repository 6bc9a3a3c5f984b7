//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Every command surfaces one of these variants. Lower-layer errors are
//! folded in through `From` conversions so services can use `?` freely.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Validation(String)          - Bad input (quantity, price, product)
//! ├── Authentication(String)      - Credential rejected
//! ├── Authorization(..)           - Role may not perform the action
//! ├── NotFound { .. }             - Missing or hidden resource
//! ├── State { status, .. }        - Operation invalid for the RFQ status
//! ├── Conflict(String)            - Duplicate quote or lost race
//! ├── Repository(RepositoryError) - Storage failure
//! └── Internal(String)            - Anything else
//! ```
//!
//! # Examples
//!
//! ```
//! use b2b_rfq::application::error::ApplicationError;
//! use b2b_rfq::domain::value_objects::RfqStatus;
//!
//! let err = ApplicationError::not_found("RFQ", "rfq-123");
//! assert!(err.is_not_found());
//!
//! let err = ApplicationError::state(RfqStatus::Expired, "rfq is not open for quotes");
//! assert_eq!(err.status(), Some(RfqStatus::Expired));
//! ```

use crate::domain::errors::DomainError;
use crate::domain::services::authorization::AuthorizationError;
use crate::domain::value_objects::RfqStatus;
use crate::infrastructure::catalog::CatalogError;
use crate::infrastructure::identity::IdentityError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller could not be authenticated.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The caller's role may not perform the action.
    #[error("not authorized: {0}")]
    Authorization(#[from] AuthorizationError),

    /// Resource not found, or not visible to the caller.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: String,
        /// Resource identifier.
        id: String,
    },

    /// The RFQ status does not allow the operation.
    #[error("rfq is {status}: {message}")]
    State {
        /// Status observed when the operation was refused.
        status: RfqStatus,
        /// Why the operation was refused.
        message: String,
    },

    /// The operation conflicts with a concurrent or earlier write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failure.
    #[error("repository error: {0}")]
    Repository(#[source] RepositoryError),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Creates a state error.
    #[must_use]
    pub fn state(status: RfqStatus, message: impl Into<String>) -> Self {
        Self::State {
            status,
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the RFQ status carried by a state error.
    #[must_use]
    pub fn status(&self) -> Option<RfqStatus> {
        match self {
            Self::State { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Nothing in the core retries automatically; this only classifies.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::Connection(_)))
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an authorization error.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Authorization(_))
    }

    /// Returns true if this is a conflict error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidStateTransition { from, to } => {
                Self::state(from, format!("cannot move to {to}"))
            }
            DomainError::InvalidState { status, reason } => Self::state(status, reason),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity_type, id } => Self::not_found(entity_type, id),
            RepositoryError::Duplicate { .. } | RepositoryError::VersionConflict { .. } => {
                Self::Conflict(err.to_string())
            }
            other => Self::Repository(other),
        }
    }
}

impl From<CatalogError> for ApplicationError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { entity_type, id } => Self::not_found(entity_type, id),
            CatalogError::Unavailable(message) => Self::Internal(message),
        }
    }
}

impl From<IdentityError> for ApplicationError {
    fn from(err: IdentityError) -> Self {
        if err.is_rejection() {
            Self::Authentication(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::services::authorization::{Action, require};
    use crate::domain::value_objects::Role;

    mod domain_conversion {
        use super::*;

        #[test]
        fn transition_error_becomes_state() {
            let err: ApplicationError = DomainError::InvalidStateTransition {
                from: RfqStatus::Closed,
                to: RfqStatus::Quoted,
            }
            .into();
            assert_eq!(err.status(), Some(RfqStatus::Closed));
        }

        #[test]
        fn invalid_state_keeps_reason() {
            let err: ApplicationError = DomainError::InvalidState {
                status: RfqStatus::Expired,
                reason: "rfq is not open for quotes".to_string(),
            }
            .into();
            assert_eq!(err.status(), Some(RfqStatus::Expired));
            assert!(err.to_string().contains("not open"));
        }

        #[test]
        fn rule_violation_becomes_validation() {
            let err: ApplicationError = DomainError::InvalidPrice("zero".to_string()).into();
            assert!(err.is_validation());
        }
    }

    mod repository_conversion {
        use super::*;

        #[test]
        fn duplicate_and_version_conflict_become_conflict() {
            let dup: ApplicationError = RepositoryError::duplicate("Quote", "q-1").into();
            let stale: ApplicationError =
                RepositoryError::version_conflict("Rfq", "r-1", 1, 2).into();
            assert!(dup.is_conflict());
            assert!(stale.is_conflict());
        }

        #[test]
        fn not_found_is_preserved() {
            let err: ApplicationError = RepositoryError::not_found("Rfq", "r-1").into();
            assert!(err.is_not_found());
        }

        #[test]
        fn only_connection_failures_are_retryable() {
            let conn: ApplicationError = RepositoryError::connection("refused").into();
            let internal: ApplicationError = RepositoryError::internal("poisoned").into();
            assert!(conn.is_retryable());
            assert!(!internal.is_retryable());
            assert!(!ApplicationError::conflict("dup").is_retryable());
        }
    }

    #[test]
    fn identity_rejection_becomes_authentication() {
        let err: ApplicationError = IdentityError::Expired.into();
        assert!(matches!(err, ApplicationError::Authentication(_)));

        let err: ApplicationError = IdentityError::unavailable("down").into();
        assert!(matches!(err, ApplicationError::Internal(_)));
    }

    #[test]
    fn authorization_error_converts() {
        let denied = require(Role::Supplier, Action::CreateRfq).unwrap_err();
        let err: ApplicationError = denied.into();
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("create_rfq"));
    }
}
