//! # Case Lifecycle Controller
//!
//! Sans-IO controller for advancing a single case.
//!
//! The controller never talks to the network. A driver asks it for the
//! request to send, performs the I/O, and hands back whatever the server
//! answered:
//!
//! ```text
//! prepare(reason) ──► PendingTransition ──(user confirms)──► submit() ──► TransitionRequest
//!                                                                           │
//!                      on_reloaded(snapshot) ◄── GET /cases/{id} ◄── 2xx ───┤
//!                      on_rejected(rejection) ◄───────────────────── non-2xx┘
//! ```
//!
//! ## Consistency
//!
//! - The snapshot is replaced wholesale by the reload after a successful
//!   transition; status is never patched locally.
//! - On rejection the snapshot is left exactly as it was.
//! - At most one transition is outstanding at a time.

use crate::guard::{TransitionOffer, evaluate_offer};
use crate::lifecycle::{TransitionRequest, validate_transition};
use crate::types::{GENERIC_RELOAD_FAILURE, GENERIC_TRANSITION_FAILURE};
use crate::{CaseId, CaseSnapshot, CaseStatus, Identity, WardError};

// =============================================================================
// PENDING TRANSITION
// =============================================================================

/// A transition awaiting explicit user confirmation.
///
/// Dropping it is the cancel path: nothing was sent and nothing changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    pub case_id: CaseId,
    pub from: CaseStatus,
    pub to: CaseStatus,
    pub reason: Option<String>,
}

impl PendingTransition {
    /// Confirmation prompt text, e.g. `Move from REPORTED to CLARIFIED?`.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("Move from {} to {}?", self.from.label(), self.to.label())
    }
}

// =============================================================================
// SERVER ANSWERS
// =============================================================================

/// A failed request as reported by the driver.
///
/// `detail` is the server-provided message when the response carried one.
/// Transport failures have neither status nor detail.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rejection {
    pub status: Option<u16>,
    pub detail: Option<String>,
}

impl Rejection {
    #[must_use]
    pub fn new(status: Option<u16>, detail: Option<String>) -> Self {
        Self { status, detail }
    }

    /// The server's message verbatim, or `fallback` when there is none.
    /// An empty detail counts as none.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail
            .as_deref()
            .filter(|detail| !detail.is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    fn into_error(self, fallback: &str) -> WardError {
        WardError::Rejected {
            status: self.status,
            message: self.user_message(fallback),
        }
    }
}

/// Result of a completed transition, after the reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub from: CaseStatus,
    pub expected: CaseStatus,
    /// Status in the reloaded snapshot. The server is believed even when it
    /// differs from `expected`.
    pub observed: CaseStatus,
}

impl TransitionOutcome {
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.expected == self.observed
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Owns one case snapshot on behalf of one actor.
#[derive(Debug, Clone)]
pub struct LifecycleController {
    actor: Identity,
    snapshot: CaseSnapshot,
    in_flight: Option<PendingTransition>,
}

impl LifecycleController {
    /// Create a controller for `actor` over a freshly loaded snapshot.
    #[must_use]
    pub fn new(actor: Identity, snapshot: CaseSnapshot) -> Self {
        Self {
            actor,
            snapshot,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn actor(&self) -> &Identity {
        &self.actor
    }

    #[must_use]
    pub fn snapshot(&self) -> &CaseSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn case_id(&self) -> &CaseId {
        &self.snapshot.case.id
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// What the transition control should show right now.
    #[must_use]
    pub fn offer(&self) -> TransitionOffer {
        evaluate_offer(&self.snapshot.case, &self.actor, self.is_in_flight())
    }

    /// Build the transition to confirm.
    ///
    /// A reason that is empty or whitespace-only is dropped, so no `reason`
    /// key is sent. Whitespace alone is not treated as a reason.
    pub fn prepare(&self, reason: Option<String>) -> Result<PendingTransition, WardError> {
        let (from, to) = self.offer().into_result()?;
        Ok(PendingTransition {
            case_id: self.case_id().clone(),
            from,
            to,
            reason: reason.filter(|r| !r.trim().is_empty()),
        })
    }

    /// Accept a confirmed transition and produce the request body.
    ///
    /// The controller is in flight until `on_reloaded`, `on_rejected` or
    /// `on_reload_failed` is called.
    pub fn submit(&mut self, pending: &PendingTransition) -> Result<TransitionRequest, WardError> {
        self.offer().into_result()?;

        let actual = self.snapshot.status();
        if pending.case_id != *self.case_id() || pending.from != actual {
            return Err(WardError::StaleTransition {
                expected: pending.from,
                actual,
            });
        }
        validate_transition(pending.from, pending.to)?;

        self.in_flight = Some(pending.clone());
        Ok(TransitionRequest {
            next_state: pending.to,
            reason: pending.reason.clone(),
        })
    }

    /// Absorb the case reloaded after a successful transition.
    ///
    /// Returns `None` when no transition was outstanding (a plain refresh).
    pub fn on_reloaded(&mut self, snapshot: CaseSnapshot) -> Option<TransitionOutcome> {
        let pending = self.in_flight.take();
        self.snapshot = snapshot;
        pending.map(|p| TransitionOutcome {
            from: p.from,
            expected: p.to,
            observed: self.snapshot.status(),
        })
    }

    /// Absorb a rejected transition. The snapshot is left untouched.
    pub fn on_rejected(&mut self, rejection: Rejection) -> WardError {
        self.in_flight = None;
        rejection.into_error(GENERIC_TRANSITION_FAILURE)
    }

    /// The transition was accepted but the reload failed.
    ///
    /// The local snapshot is now behind the server; it is kept as-is rather
    /// than guessed forward.
    pub fn on_reload_failed(&mut self, rejection: Rejection) -> WardError {
        self.in_flight = None;
        rejection.into_error(GENERIC_RELOAD_FAILURE)
    }

    /// Replace the snapshot outside of a transition (initial load, owner change).
    pub fn refresh(&mut self, snapshot: CaseSnapshot) -> Result<(), WardError> {
        if self.is_in_flight() {
            return Err(WardError::TransitionInFlight);
        }
        self.snapshot = snapshot;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
