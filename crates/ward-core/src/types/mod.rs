//! # Core Type Definitions
//!
//! This module contains the core types for the Ward case lifecycle:
//! - Identifiers (`CaseId`, `Identity`)
//! - The ordered lifecycle status (`CaseStatus`)
//! - Error types (`WardError`)
//!
//! ## Ordering Guarantees
//!
//! `CaseStatus` derives `Ord` in declaration order, which is the lifecycle
//! order. Comparisons between statuses therefore mean "earlier" / "later"
//! in the lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

/// Shown instead of a transition control when the actor is not the decision owner.
pub const NOT_OWNER_MESSAGE: &str = "Only the decision owner can advance the state.";

/// Shown instead of a transition control once a case is resolved.
pub const TERMINAL_MESSAGE: &str =
    "This disruption is resolved. No further state transitions available.";

/// Fallback when a failed transition carries no server `detail`.
pub const GENERIC_TRANSITION_FAILURE: &str = "Failed to advance state";

/// Fallback when reloading a case fails without a server `detail`.
pub const GENERIC_RELOAD_FAILURE: &str = "Failed to load case";

/// Fallback when an ownership assignment fails without a server `detail`.
pub const GENERIC_ASSIGN_FAILURE: &str = "Failed to assign owner";

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Server-side identifier of a case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(pub String);

impl CaseId {
    /// Create a case identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity of an actor, as the backend knows it (an email address).
///
/// Equality is exact string equality. The backend compares the raw
/// `decision_owner_email` against the authenticated user's email, and the
/// client guard must agree with it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    /// Create an identity from an email-like string.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    /// Get the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CASE STATUS
// =============================================================================

/// Lifecycle status of a disruption case.
///
/// Declaration order is lifecycle order. The wire form is the upper-snake
/// name (`"DECISION_REQUIRED"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    /// Initial status set by the case-creation flow.
    #[default]
    Reported,
    Clarified,
    DecisionRequired,
    Decided,
    InProgress,
    /// Terminal.
    Resolved,
}

impl CaseStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [CaseStatus; 6] = [
        CaseStatus::Reported,
        CaseStatus::Clarified,
        CaseStatus::DecisionRequired,
        CaseStatus::Decided,
        CaseStatus::InProgress,
        CaseStatus::Resolved,
    ];

    /// The wire name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reported => "REPORTED",
            Self::Clarified => "CLARIFIED",
            Self::DecisionRequired => "DECISION_REQUIRED",
            Self::Decided => "DECIDED",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
        }
    }

    /// Human-readable label (`"DECISION REQUIRED"`).
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Position in the lifecycle, starting at 0 for `REPORTED`.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = WardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| WardError::UnknownStatus(s.to_string()))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while driving a case through its lifecycle.
///
/// Every variant is terminal for the user action that produced it: nothing
/// is partially applied and nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WardError {
    /// The acting identity is not the case's decision owner.
    #[error("Only the decision owner can advance the state.")]
    NotDecisionOwner,

    /// The case is in a terminal status.
    #[error("This disruption is resolved. No further state transitions available.")]
    TerminalState(CaseStatus),

    /// A transition request for this case is already outstanding.
    #[error("A state transition is already in progress")]
    TransitionInFlight,

    /// The requested target is not the single legal successor.
    #[error("Invalid transition from {from} to {to}")]
    IllegalTransition { from: CaseStatus, to: CaseStatus },

    /// The case moved on since the transition was prepared.
    #[error("Case status changed from {expected} to {actual} before submission")]
    StaleTransition {
        expected: CaseStatus,
        actual: CaseStatus,
    },

    /// A status string that is not part of the lifecycle.
    #[error("Unknown case status: {0}")]
    UnknownStatus(String),

    /// The backend refused the request. `message` is shown to the user as-is.
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },
}

// =============================================================================
// TESTS
// =============================================================================
