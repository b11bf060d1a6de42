//! # Lifecycle Scenarios
//!
//! End-to-end walks through the sans-IO controller, with the server's
//! answers played back by hand.

use serde_json::json;
use ward_core::{
    CaseSnapshot, CaseStatus, Identity, LifecycleController, NOT_OWNER_MESSAGE, Rejection,
    TERMINAL_MESSAGE, TransitionOffer,
};

fn snapshot(status: &str, owner: &str) -> CaseSnapshot {
    serde_json::from_value(json!({
        "case": {
            "_id": "case-42",
            "status": status,
            "decision_owner_email": owner,
            "updated_at": "2026-05-01T08:00:00+00:00"
        },
        "timeline": []
    }))
    .expect("snapshot")
}

mod owner_advances {
    use super::*;

    #[test]
    fn reported_to_clarified() {
        let mut ctl = LifecycleController::new(
            Identity::new("a@x.com"),
            snapshot("REPORTED", "a@x.com"),
        );

        assert_eq!(ctl.offer().target(), Some(CaseStatus::Clarified));

        let pending = ctl.prepare(None).expect("prepare");
        let request = ctl.submit(&pending).expect("submit");
        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            json!({"next_state": "CLARIFIED"})
        );

        let outcome = ctl
            .on_reloaded(snapshot("CLARIFIED", "a@x.com"))
            .expect("outcome");
        assert!(outcome.is_confirmed());
        assert_eq!(ctl.snapshot().status(), CaseStatus::Clarified);
    }

    #[test]
    fn full_walk_to_resolved() {
        let mut ctl = LifecycleController::new(
            Identity::new("a@x.com"),
            snapshot("REPORTED", "a@x.com"),
        );

        while let TransitionOffer::Available { to, .. } = ctl.offer() {
            let pending = ctl.prepare(Some(format!("moving to {to}"))).expect("prepare");
            ctl.submit(&pending).expect("submit");
            ctl.on_reloaded(snapshot(to.as_str(), "a@x.com"));
        }

        assert_eq!(ctl.snapshot().status(), CaseStatus::Resolved);
        assert_eq!(ctl.offer(), TransitionOffer::Terminal);
    }
}

mod refusals {
    use super::*;

    #[test]
    fn resolved_case_shows_terminal_message() {
        let ctl = LifecycleController::new(
            Identity::new("a@x.com"),
            snapshot("RESOLVED", "a@x.com"),
        );

        let offer = ctl.offer();
        assert!(!offer.is_available());
        assert_eq!(offer.message(), Some(TERMINAL_MESSAGE));
    }

    #[test]
    fn other_actor_sees_guard_message() {
        let ctl = LifecycleController::new(
            Identity::new("b@x.com"),
            snapshot("REPORTED", "a@x.com"),
        );

        let offer = ctl.offer();
        assert!(!offer.is_available());
        assert_eq!(offer.message(), Some(NOT_OWNER_MESSAGE));
        assert!(ctl.prepare(None).is_err());
    }
}

mod server_rejection {
    use super::*;

    #[test]
    fn conflict_detail_is_surfaced_and_status_kept() {
        let mut ctl = LifecycleController::new(
            Identity::new("a@x.com"),
            snapshot("REPORTED", "a@x.com"),
        );
        let pending = ctl.prepare(None).expect("prepare");
        ctl.submit(&pending).expect("submit");

        let err = ctl.on_rejected(Rejection::new(
            Some(409),
            Some("Case was modified concurrently".to_string()),
        ));

        assert_eq!(err.to_string(), "Case was modified concurrently");
        assert_eq!(ctl.snapshot().status(), CaseStatus::Reported);
    }
}
