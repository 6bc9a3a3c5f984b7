//! # Identity
//!
//! Credential verification and the user directory.
//!
//! - [`IdentityProvider`]: port used by the API edge to authenticate callers
//! - [`JwtIdentityProvider`]: HS256 bearer tokens
//! - [`UserDirectory`] / [`InMemoryUserDirectory`]: registered users

pub mod error;
pub mod jwt;
pub mod traits;
pub mod user_directory;

pub use error::{IdentityError, IdentityResult};
pub use jwt::{DEFAULT_TOKEN_TTL, JwtIdentityProvider};
pub use traits::{Credential, IdentityProvider, UserDirectory};
pub use user_directory::InMemoryUserDirectory;
