//! # Transition Guard
//!
//! Decides whether a transition control may be offered to an actor.
//!
//! This is a convenience guard: it keeps the control hidden from people
//! who cannot use it. The backend performs the authoritative check and a
//! server rejection always wins over a passing guard.

use crate::types::{NOT_OWNER_MESSAGE, TERMINAL_MESSAGE};
use crate::{CaseRecord, CaseStatus, Identity, WardError};

/// The guard's verdict for one actor looking at one case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOffer {
    /// The control is shown and targets `to`.
    Available { from: CaseStatus, to: CaseStatus },
    /// The actor is not the decision owner.
    NotDecisionOwner,
    /// The case is resolved.
    Terminal,
    /// A request is outstanding; the control is disabled.
    InFlight,
}

impl TransitionOffer {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// Target status when the control is available.
    #[must_use]
    pub const fn target(&self) -> Option<CaseStatus> {
        match self {
            Self::Available { to, .. } => Some(*to),
            _ => None,
        }
    }

    /// Informational text shown in place of the control, if any.
    #[must_use]
    pub const fn message(&self) -> Option<&'static str> {
        match self {
            Self::NotDecisionOwner => Some(NOT_OWNER_MESSAGE),
            Self::Terminal => Some(TERMINAL_MESSAGE),
            Self::Available { .. } | Self::InFlight => None,
        }
    }

    /// Convert a refusal into the matching error.
    pub fn into_result(self) -> Result<(CaseStatus, CaseStatus), WardError> {
        match self {
            Self::Available { from, to } => Ok((from, to)),
            Self::NotDecisionOwner => Err(WardError::NotDecisionOwner),
            Self::Terminal => Err(WardError::TerminalState(CaseStatus::Resolved)),
            Self::InFlight => Err(WardError::TransitionInFlight),
        }
    }
}

/// Evaluate the guard for `actor` on `case`.
///
/// Ownership is checked first, so a non-owner sees the ownership message
/// even on a resolved case.
#[must_use]
pub fn evaluate_offer(case: &CaseRecord, actor: &Identity, in_flight: bool) -> TransitionOffer {
    if !case.is_owned_by(actor) {
        return TransitionOffer::NotDecisionOwner;
    }
    let Some(to) = case.status.next() else {
        return TransitionOffer::Terminal;
    };
    if in_flight {
        return TransitionOffer::InFlight;
    }
    TransitionOffer::Available {
        from: case.status,
        to,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CaseId;

    fn owned_case(status: CaseStatus, owner: &str) -> CaseRecord {
        CaseRecord::new(CaseId::new("c-1"))
            .with_status(status)
            .with_owner(Identity::new(owner))
    }

    #[test]
    fn owner_gets_next_state() {
        let case = owned_case(CaseStatus::Reported, "a@x.com");
        let offer = evaluate_offer(&case, &Identity::new("a@x.com"), false);

        assert_eq!(
            offer,
            TransitionOffer::Available {
                from: CaseStatus::Reported,
                to: CaseStatus::Clarified
            }
        );
        assert_eq!(offer.target(), Some(CaseStatus::Clarified));
        assert!(offer.message().is_none());
    }

    #[test]
    fn non_owner_sees_guard_message() {
        let case = owned_case(CaseStatus::Reported, "a@x.com");
        let offer = evaluate_offer(&case, &Identity::new("b@x.com"), false);

        assert_eq!(offer, TransitionOffer::NotDecisionOwner);
        assert!(!offer.is_available());
        assert_eq!(offer.message(), Some(NOT_OWNER_MESSAGE));
    }

    #[test]
    fn unassigned_case_offers_nothing() {
        let case = CaseRecord::new(CaseId::new("c-1"));
        let offer = evaluate_offer(&case, &Identity::new("a@x.com"), false);
        assert_eq!(offer, TransitionOffer::NotDecisionOwner);
    }

    #[test]
    fn resolved_case_is_terminal_for_owner() {
        let case = owned_case(CaseStatus::Resolved, "a@x.com");
        let offer = evaluate_offer(&case, &Identity::new("a@x.com"), false);

        assert_eq!(offer, TransitionOffer::Terminal);
        assert_eq!(offer.message(), Some(TERMINAL_MESSAGE));
    }

    #[test]
    fn resolved_case_shows_guard_first_for_non_owner() {
        let case = owned_case(CaseStatus::Resolved, "a@x.com");
        let offer = evaluate_offer(&case, &Identity::new("b@x.com"), false);
        assert_eq!(offer, TransitionOffer::NotDecisionOwner);
    }

    #[test]
    fn in_flight_disables_control() {
        let case = owned_case(CaseStatus::Decided, "a@x.com");
        let offer = evaluate_offer(&case, &Identity::new("a@x.com"), true);

        assert_eq!(offer, TransitionOffer::InFlight);
        assert_eq!(offer.into_result(), Err(WardError::TransitionInFlight));
    }

    #[test]
    fn into_result_maps_refusals() {
        assert_eq!(
            TransitionOffer::NotDecisionOwner.into_result(),
            Err(WardError::NotDecisionOwner)
        );
        assert_eq!(
            TransitionOffer::Terminal.into_result(),
            Err(WardError::TerminalState(CaseStatus::Resolved))
        );
    }
}
