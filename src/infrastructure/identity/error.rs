//! # Identity Errors
//!
//! Error types for credential verification and user lookup.
//!
//! # Examples
//!
//! ```
//! use b2b_rfq::infrastructure::identity::error::IdentityError;
//!
//! let error = IdentityError::invalid_credential("bad signature");
//! assert!(!error.is_retryable());
//!
//! let error = IdentityError::unavailable("directory offline");
//! assert!(error.is_retryable());
//! ```

use crate::domain::value_objects::UserId;
use thiserror::Error;

/// Error type for identity operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The credential is malformed, forged, or carries bad claims.
    #[error("invalid credential: {message}")]
    InvalidCredential {
        /// Error message.
        message: String,
    },

    /// The credential was valid but has expired.
    #[error("credential expired")]
    Expired,

    /// The credential names a user the directory does not know.
    #[error("unknown user: {user_id}")]
    UnknownUser {
        /// The user named by the credential.
        user_id: UserId,
    },

    /// The user exists but is deactivated.
    #[error("user {user_id} is inactive")]
    InactiveUser {
        /// The deactivated user.
        user_id: UserId,
    },

    /// The directory could not be reached.
    #[error("identity backend unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// A token could not be issued.
    #[error("token issuance failed: {message}")]
    Issuance {
        /// Error message.
        message: String,
    },
}

impl IdentityError {
    /// Creates an invalid credential error.
    #[must_use]
    pub fn invalid_credential(message: impl Into<String>) -> Self {
        Self::InvalidCredential {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates an issuance error.
    #[must_use]
    pub fn issuance(message: impl Into<String>) -> Self {
        Self::Issuance {
            message: message.into(),
        }
    }

    /// Returns true if retrying the call could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Returns true if the caller failed to prove who they are.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Unavailable { .. } | Self::Issuance { .. })
    }
}

/// Result type for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
