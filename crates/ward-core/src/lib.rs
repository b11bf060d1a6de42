//! # ward-core
//!
//! The case lifecycle state machine for Ward - THE LOGIC.
//!
//! A disruption case moves forward through a fixed, linear set of statuses.
//! Only the case's decision owner may move it, one step at a time, and only
//! after explicitly confirming the step. This crate owns:
//!
//! - the transition table (`lifecycle`)
//! - the decision-owner guard (`guard`)
//! - the sans-IO controller that turns a confirmed step into a request body
//!   and absorbs the server's answer (`controller`)
//! - the typed case payload (`case`)
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no logging: drivers live in the app crate
//! - The server is authoritative: snapshots are replaced, never patched

// =============================================================================
// MODULES
// =============================================================================

pub mod case;
pub mod controller;
pub mod guard;
pub mod lifecycle;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CaseId, CaseStatus, GENERIC_ASSIGN_FAILURE, GENERIC_RELOAD_FAILURE,
    GENERIC_TRANSITION_FAILURE, Identity, NOT_OWNER_MESSAGE, TERMINAL_MESSAGE, WardError,
};

// =============================================================================
// RE-EXPORTS: Lifecycle
// =============================================================================

pub use case::{CaseRecord, CaseSnapshot, STATE_TRANSITION_ACTION, TimelineEvent};
pub use controller::{LifecycleController, PendingTransition, Rejection, TransitionOutcome};
pub use guard::{TransitionOffer, evaluate_offer};
pub use lifecycle::{TransitionRequest, transition_table, validate_transition};
