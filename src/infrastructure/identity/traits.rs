//! # Identity Ports
//!
//! [`IdentityProvider`] turns a bearer credential into a [`Principal`];
//! [`UserDirectory`] is the user store it resolves against.

use crate::domain::entities::{Principal, User};
use crate::domain::value_objects::UserId;
use crate::infrastructure::identity::error::IdentityResult;
use async_trait::async_trait;
use std::fmt;

/// An opaque bearer credential presented by a caller.
///
/// The token is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a bearer token.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[inline]
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Verifies credentials.
#[async_trait]
pub trait IdentityProvider: Send + Sync + fmt::Debug {
    /// Validates `credential` and returns the caller it identifies.
    ///
    /// # Errors
    ///
    /// Returns an `IdentityError` rejection if the credential is invalid,
    /// expired, or names an unknown or inactive user.
    async fn authenticate(&self, credential: &Credential) -> IdentityResult<Principal>;
}

/// Read access to registered users.
#[async_trait]
pub trait UserDirectory: Send + Sync + fmt::Debug {
    /// Gets a user by ID.
    async fn get(&self, id: &UserId) -> IdentityResult<Option<User>>;

    /// Counts registered users.
    async fn count(&self) -> IdentityResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let credential = Credential::bearer("secret-token");
        assert_eq!(credential.token(), "secret-token");
        assert!(!format!("{credential:?}").contains("secret"));
    }
}
