//! # Authorization Matrix
//!
//! Capability lookup keyed by (role, action).
//!
//! Every command asks [`require`] for its [`Access`] scope before reading
//! any state. The scope tells the caller how to narrow the data it returns:
//!
//! | Action | admin | supplier | buyer |
//! |---|---|---|---|
//! | create RFQ | denied | denied | own |
//! | list / view RFQs | all | open or participating | own |
//! | submit quote | denied | all open RFQs | denied |
//! | list quotes | all | own quote | own RFQ |
//! | accept quote | denied | denied | own RFQ |
//! | view stats | all | own | own |
//!
//! # Examples
//!
//! ```
//! use b2b_rfq::domain::services::authorization::{Access, Action, require};
//! use b2b_rfq::domain::value_objects::Role;
//!
//! assert_eq!(require(Role::Buyer, Action::CreateRfq).unwrap(), Access::OwnRecords);
//! assert!(require(Role::Supplier, Action::CreateRfq).is_err());
//! ```

use crate::domain::value_objects::Role;
use std::fmt;
use thiserror::Error;

/// A command that is subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Raise a new RFQ.
    CreateRfq,
    /// List RFQs visible to the caller.
    ListRfqs,
    /// Read a single RFQ.
    ViewRfq,
    /// Answer an RFQ with a quote.
    SubmitQuote,
    /// List the quotes of an RFQ.
    ListQuotes,
    /// Accept a quote, closing its RFQ.
    AcceptQuote,
    /// Read dashboard counters.
    ViewStats,
}

impl Action {
    /// Every action, in table order.
    pub const ALL: [Self; 7] = [
        Self::CreateRfq,
        Self::ListRfqs,
        Self::ViewRfq,
        Self::SubmitQuote,
        Self::ListQuotes,
        Self::AcceptQuote,
        Self::ViewStats,
    ];

    /// Returns the snake_case name used in logs and errors.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateRfq => "create_rfq",
            Self::ListRfqs => "list_rfqs",
            Self::ViewRfq => "view_rfq",
            Self::SubmitQuote => "submit_quote",
            Self::ListQuotes => "list_quotes",
            Self::AcceptQuote => "accept_quote",
            Self::ViewStats => "view_stats",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scope granted for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// The role may not perform the action.
    Denied,
    /// No record-level restriction.
    Unrestricted,
    /// Only records the caller owns (its RFQs, its quotes, its counters).
    OwnRecords,
    /// RFQs still open for quotes plus those the caller has quoted.
    OpenOrParticipating,
}

impl Access {
    /// Returns true unless the access is [`Access::Denied`].
    #[inline]
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// The role is not allowed to perform the action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("role {role} may not {action}")]
pub struct AuthorizationError {
    /// Caller's role.
    pub role: Role,
    /// Refused action.
    pub action: Action,
}

use Access::{Denied, OpenOrParticipating, OwnRecords, Unrestricted};

// Rows follow `Role` discriminants, columns follow `Action::ALL`.
const CAPABILITIES: [[Access; 7]; 3] = [
    // admin
    [
        Denied,
        Unrestricted,
        Unrestricted,
        Denied,
        Unrestricted,
        Denied,
        Unrestricted,
    ],
    // supplier
    [
        Denied,
        OpenOrParticipating,
        OpenOrParticipating,
        Unrestricted,
        OwnRecords,
        Denied,
        OwnRecords,
    ],
    // buyer
    [
        OwnRecords, OwnRecords, OwnRecords, Denied, OwnRecords, OwnRecords, OwnRecords,
    ],
];

/// Looks up the access a role has for an action.
#[must_use]
pub const fn access(role: Role, action: Action) -> Access {
    CAPABILITIES[role as usize][action.index()]
}

/// Returns the granted scope, or an error when the role is denied.
///
/// # Errors
///
/// Returns [`AuthorizationError`] if the table denies the action.
pub fn require(role: Role, action: Action) -> Result<Access, AuthorizationError> {
    match access(role, action) {
        Denied => Err(AuthorizationError { role, action }),
        granted => Ok(granted),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn only_buyers_create_and_accept() {
        for role in Role::ALL {
            let allowed = role == Role::Buyer;
            assert_eq!(access(role, Action::CreateRfq).is_granted(), allowed);
            assert_eq!(access(role, Action::AcceptQuote).is_granted(), allowed);
        }
    }

    #[test]
    fn only_suppliers_submit_quotes() {
        for role in Role::ALL {
            assert_eq!(
                access(role, Action::SubmitQuote).is_granted(),
                role == Role::Supplier
            );
        }
    }

    #[test]
    fn listing_scopes_per_role() {
        assert_eq!(access(Role::Admin, Action::ListRfqs), Unrestricted);
        assert_eq!(
            access(Role::Supplier, Action::ListRfqs),
            OpenOrParticipating
        );
        assert_eq!(access(Role::Buyer, Action::ListRfqs), OwnRecords);
        assert_eq!(access(Role::Supplier, Action::ListQuotes), OwnRecords);
    }

    #[test]
    fn every_role_sees_stats() {
        for role in Role::ALL {
            assert!(require(role, Action::ViewStats).is_ok());
        }
    }

    #[test]
    fn denial_names_role_and_action() {
        let err = require(Role::Buyer, Action::SubmitQuote).unwrap_err();
        assert_eq!(err.role, Role::Buyer);
        assert_eq!(err.to_string(), "role buyer may not submit_quote");
    }

    #[test]
    fn action_names_are_unique() {
        let mut names: Vec<_> = Action::ALL.iter().map(Action::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Action::ALL.len());
    }
}
