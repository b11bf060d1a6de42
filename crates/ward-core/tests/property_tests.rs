//! # Property-Based Tests
//!
//! Invariants of the transition table and the guard, checked with proptest.

use proptest::prelude::*;
use ward_core::{
    CaseId, CaseRecord, CaseStatus, Identity, TransitionOffer, evaluate_offer, validate_transition,
};

fn any_status() -> impl Strategy<Value = CaseStatus> {
    prop::sample::select(CaseStatus::ALL.to_vec())
}

fn any_email() -> impl Strategy<Value = String> {
    "[a-c]{1,3}@x\\.com"
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Every successor lies strictly one step later in the lifecycle.
    #[test]
    fn next_is_exactly_one_step_forward(status in any_status()) {
        if let Some(next) = status.next() {
            prop_assert!(next > status);
            prop_assert_eq!(next.ordinal(), status.ordinal() + 1);
        } else {
            prop_assert_eq!(status, CaseStatus::Resolved);
        }
    }

    /// Exactly one target is accepted from every non-terminal status.
    #[test]
    fn exactly_one_legal_target(from in any_status()) {
        let legal: Vec<CaseStatus> = CaseStatus::ALL
            .into_iter()
            .filter(|to| validate_transition(from, *to).is_ok())
            .collect();

        let expected = usize::from(!from.is_terminal());
        prop_assert_eq!(legal.len(), expected);
    }

    /// Backward moves and self-loops are always refused.
    #[test]
    fn no_backward_or_self_transition(from in any_status(), to in any_status()) {
        if to <= from {
            prop_assert!(validate_transition(from, to).is_err());
        }
    }

    /// A non-owner is never offered a transition, whatever the status.
    #[test]
    fn non_owner_never_offered(
        status in any_status(),
        owner in any_email(),
        actor in any_email(),
        in_flight in any::<bool>(),
    ) {
        prop_assume!(owner != actor);
        let case = CaseRecord::new(CaseId::new("c"))
            .with_status(status)
            .with_owner(Identity::new(owner));

        let offer = evaluate_offer(&case, &Identity::new(actor), in_flight);
        prop_assert_eq!(offer, TransitionOffer::NotDecisionOwner);
    }

    /// When a control is offered, its target is the table's successor.
    #[test]
    fn offered_target_matches_table(status in any_status(), owner in any_email()) {
        let case = CaseRecord::new(CaseId::new("c"))
            .with_status(status)
            .with_owner(Identity::new(owner.clone()));

        let offer = evaluate_offer(&case, &Identity::new(owner), false);
        prop_assert_eq!(offer.target(), status.next());
    }
}

#[test]
fn walking_the_table_reaches_resolved_in_five_steps() {
    let mut status = CaseStatus::Reported;
    let mut steps = 0;
    while let Some(next) = status.next() {
        status = next;
        steps += 1;
    }
    assert_eq!(status, CaseStatus::Resolved);
    assert_eq!(steps, 5);
}
