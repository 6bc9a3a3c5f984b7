//! # RFQ Status
//!
//! RFQ lifecycle state machine.
//!
//! # State Machine
//!
//! ```text
//! Open ──(first quote)──→ Quoted
//!   │                       │
//!   ├──(quote accepted)─────┴──→ Closed   (terminal)
//!   └──(window passed)──────┴──→ Expired  (terminal)
//! ```
//!
//! # Examples
//!
//! ```
//! use b2b_rfq::domain::value_objects::RfqStatus;
//!
//! assert!(RfqStatus::Open.can_transition_to(RfqStatus::Quoted));
//! assert!(!RfqStatus::Closed.can_transition_to(RfqStatus::Expired));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// RFQ lifecycle status.
///
/// # Terminal States
///
/// - [`Closed`](RfqStatus::Closed): a quote was accepted by the buyer
/// - [`Expired`](RfqStatus::Expired): the validity window passed first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum RfqStatus {
    /// Accepting quotes, none received yet.
    #[default]
    Open = 0,

    /// At least one quote received; still accepting quotes.
    Quoted = 1,

    /// A quote was accepted (terminal).
    Closed = 2,

    /// The validity window passed before acceptance (terminal).
    Expired = 3,
}

impl RfqStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Open, Self::Quoted, Self::Closed, Self::Expired];

    /// Returns true if this is a terminal status.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Expired)
    }

    /// Returns true if suppliers may still submit quotes in this status.
    ///
    /// The expiration timestamp must be checked separately.
    #[inline]
    #[must_use]
    pub const fn accepts_quotes(&self) -> bool {
        matches!(self, Self::Open | Self::Quoted)
    }

    /// Returns true if the state machine allows moving to `target`.
    ///
    /// - Open → Quoted, Closed, Expired
    /// - Quoted → Closed, Expired
    /// - Terminal states → (none)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Quoted)
                | (Self::Open, Self::Closed)
                | (Self::Open, Self::Expired)
                | (Self::Quoted, Self::Closed)
                | (Self::Quoted, Self::Expired)
        )
    }

    /// Returns the valid next statuses.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|target| self.can_transition_to(*target))
            .collect()
    }

    /// Returns the wire name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Quoted => "quoted",
            Self::Closed => "closed",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for RfqStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rfq status: {0}")]
pub struct InvalidRfqStatusError(pub String);

impl FromStr for RfqStatus {
    type Err = InvalidRfqStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "quoted" => Ok(Self::Quoted),
            "closed" => Ok(Self::Closed),
            "expired" => Ok(Self::Expired),
            _ => Err(InvalidRfqStatusError(s.to_string())),
        }
    }
}
