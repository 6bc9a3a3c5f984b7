//! # JWT Identity Provider
//!
//! HS256 bearer tokens resolved against a [`UserDirectory`].
//!
//! Tokens carry `{sub, role, iat, exp}`. The directory stays the source of
//! truth: a token for a deactivated user, or one whose role no longer
//! matches the directory, is rejected.

use crate::domain::entities::{Principal, User};
use crate::domain::value_objects::{Role, Timestamp, UserId};
use crate::infrastructure::identity::error::{IdentityError, IdentityResult};
use crate::infrastructure::identity::traits::{Credential, IdentityProvider, UserDirectory};
use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
    directory: Arc<dyn UserDirectory>,
}

impl JwtIdentityProvider {
    /// Creates a provider signing with `secret`.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
            ttl_secs: i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX),
            directory,
        }
    }

    /// Issues a token for `user`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Issuance` if signing fails.
    pub fn issue(&self, user: &User) -> IdentityResult<String> {
        self.issue_at(user, Timestamp::now())
    }

    /// Issues a token for `user` as if signed at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Issuance` if signing fails.
    pub fn issue_at(&self, user: &User, issued_at: Timestamp) -> IdentityResult<String> {
        let iat = issued_at.timestamp_secs();
        let claims = Claims {
            sub: user.id().to_string(),
            role: user.role(),
            iat,
            exp: iat.saturating_add(self.ttl_secs),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| IdentityError::issuance(error.to_string()))
    }

    fn decode(&self, token: &str) -> IdentityResult<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => IdentityError::Expired,
                _ => IdentityError::invalid_credential(error.to_string()),
            })
    }
}

impl fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtIdentityProvider")
            .field("ttl_secs", &self.ttl_secs)
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn authenticate(&self, credential: &Credential) -> IdentityResult<Principal> {
        let claims = self.decode(credential.token())?;
        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| IdentityError::invalid_credential("subject is not a user id"))?;

        let user = self
            .directory
            .get(&user_id)
            .await?
            .ok_or(IdentityError::UnknownUser { user_id })?;

        if !user.is_active() {
            return Err(IdentityError::InactiveUser { user_id });
        }
        if user.role() != claims.role {
            return Err(IdentityError::invalid_credential(
                "role claim does not match directory",
            ));
        }

        debug!(user_id = %user_id, role = %user.role(), "authenticated");
        Ok(user.principal())
    }
}
