//! # Users and Principals
//!
//! [`User`] is the directory record owned by the identity provider.
//! [`Principal`] is the verified caller passed explicitly into every
//! command; the core keeps no ambient session.

use crate::domain::value_objects::{Role, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered marketplace user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    email: String,
    role: Role,
    company_name: String,
    contact_person: String,
    active: bool,
}

impl User {
    /// Creates an active user with a fresh identifier.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        role: Role,
        company_name: impl Into<String>,
        contact_person: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new_v4(),
            email: email.into(),
            role,
            company_name: company_name.into(),
            contact_person: contact_person.into(),
            active: true,
        }
    }

    /// Returns a copy of this user marked inactive.
    #[must_use]
    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Returns the user ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login email.
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the role.
    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the company name.
    #[inline]
    #[must_use]
    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    /// Returns the contact person.
    #[inline]
    #[must_use]
    pub fn contact_person(&self) -> &str {
        &self.contact_person
    }

    /// Returns true if the account may authenticate.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Builds the principal presented to commands.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            role: self.role,
            company_name: self.company_name.clone(),
            contact_person: self.contact_person.clone(),
        }
    }
}

/// An authenticated caller.
///
/// # Examples
///
/// ```
/// use b2b_rfq::domain::entities::Principal;
/// use b2b_rfq::domain::value_objects::{Role, UserId};
///
/// let buyer = Principal::new(UserId::new_v4(), Role::Buyer, "Acme", "Jane Doe");
/// assert!(buyer.is(Role::Buyer));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The user's identifier.
    pub user_id: UserId,
    /// The user's role.
    pub role: Role,
    /// Company the user acts for.
    pub company_name: String,
    /// Contact person of the company.
    pub contact_person: String,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub fn new(
        user_id: UserId,
        role: Role,
        company_name: impl Into<String>,
        contact_person: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            role,
            company_name: company_name.into(),
            contact_person: contact_person.into(),
        }
    }

    /// Returns true if the principal holds `role`.
    #[inline]
    #[must_use]
    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} @ {})", self.role, self.user_id, self.company_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn principal_mirrors_user() {
        let user = User::new("buyer@example.com", Role::Buyer, "Acme", "Jane Doe");
        let principal = user.principal();
        assert_eq!(principal.user_id, user.id());
        assert_eq!(principal.role, Role::Buyer);
        assert_eq!(principal.company_name, "Acme");
    }

    #[test]
    fn deactivated_user_is_inactive() {
        let user = User::new("s@example.com", Role::Supplier, "ChemCorp", "John").deactivated();
        assert!(!user.is_active());
    }
}
