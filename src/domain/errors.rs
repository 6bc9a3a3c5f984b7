//! # Domain Errors
//!
//! Errors raised by entities and value objects when a business rule is
//! violated.

use crate::domain::value_objects::RfqStatus;
use thiserror::Error;

/// Business rule violation raised by the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Quantity is zero or otherwise unusable.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Price is zero, negative, or overflowed.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// Generic input validation failure.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// The RFQ state machine does not allow this transition.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current status.
        from: RfqStatus,
        /// Requested status.
        to: RfqStatus,
    },

    /// The operation is not valid for the RFQ's current status.
    #[error("rfq is {status}: {reason}")]
    InvalidState {
        /// Current status.
        status: RfqStatus,
        /// Why the operation was refused.
        reason: String,
    },
}

impl DomainError {
    /// Returns the RFQ status carried by state-related errors.
    #[must_use]
    pub fn status(&self) -> Option<RfqStatus> {
        match self {
            Self::InvalidStateTransition { from, .. } => Some(*from),
            Self::InvalidState { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_reports_current_status() {
        let err = DomainError::InvalidStateTransition {
            from: RfqStatus::Closed,
            to: RfqStatus::Open,
        };
        assert_eq!(err.status(), Some(RfqStatus::Closed));
        assert!(err.to_string().contains("closed"));
        assert!(err.to_string().contains("open"));
    }

    #[test]
    fn validation_error_has_no_status() {
        let err = DomainError::ValidationError("delivery time is required".to_string());
        assert_eq!(err.status(), None);
    }
}
