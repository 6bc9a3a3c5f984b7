//! # User Role
//!
//! The three marketplace roles that gate which commands a user may issue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Marketplace role bound to an authenticated identity.
///
/// # Examples
///
/// ```
/// use b2b_rfq::domain::value_objects::Role;
///
/// let role: Role = "supplier".parse().unwrap();
/// assert_eq!(role, Role::Supplier);
/// assert_eq!(role.to_string(), "supplier");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Role {
    /// Platform operator with read access to everything.
    Admin = 0,
    /// Sells products and answers RFQs with quotes.
    Supplier = 1,
    /// Raises RFQs and accepts quotes.
    Buyer = 2,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Supplier, Self::Buyer];

    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supplier => "supplier",
            Self::Buyer => "buyer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid role: {0}")]
pub struct InvalidRoleError(pub String);

impl FromStr for Role {
    type Err = InvalidRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "supplier" => Ok(Self::Supplier),
            "buyer" => Ok(Self::Buyer),
            _ => Err(InvalidRoleError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("BUYER".parse::<Role>().unwrap(), Role::Buyer);
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(
            "auditor".parse::<Role>(),
            Err(InvalidRoleError("auditor".to_string()))
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }
}
