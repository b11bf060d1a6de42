//! # Lifecycle Transition Table
//!
//! The fixed, linear transition table for disruption cases:
//!
//! ```text
//! REPORTED → CLARIFIED → DECISION_REQUIRED → DECIDED → IN_PROGRESS → RESOLVED
//! ```
//!
//! Every non-terminal status has exactly one successor. There are no
//! backward edges and no skips. The backend validates against the same
//! table; its verdict wins whenever the two disagree.

use crate::{CaseStatus, WardError};
use serde::{Deserialize, Serialize};

impl CaseStatus {
    /// The single legal successor, or `None` for the terminal status.
    #[must_use]
    pub const fn next(self) -> Option<CaseStatus> {
        match self {
            Self::Reported => Some(Self::Clarified),
            Self::Clarified => Some(Self::DecisionRequired),
            Self::DecisionRequired => Some(Self::Decided),
            Self::Decided => Some(Self::InProgress),
            Self::InProgress => Some(Self::Resolved),
            Self::Resolved => None,
        }
    }

    /// Whether no further transition can be offered.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

/// Check that `to` is the legal successor of `from`.
pub fn validate_transition(from: CaseStatus, to: CaseStatus) -> Result<(), WardError> {
    match from.next() {
        Some(next) if next == to => Ok(()),
        _ => Err(WardError::IllegalTransition { from, to }),
    }
}

/// The whole table as `(from, to)` pairs, in lifecycle order.
#[must_use]
pub fn transition_table() -> Vec<(CaseStatus, Option<CaseStatus>)> {
    CaseStatus::ALL
        .into_iter()
        .map(|status| (status, status.next()))
        .collect()
}

// =============================================================================
// WIRE REQUEST
// =============================================================================

/// Body of `POST /cases/{id}/transition`.
///
/// `reason` is omitted from the JSON entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub next_state: CaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// =============================================================================
// TESTS
// =============================================================================
