//! # Controller Driver
//!
//! Runs lifecycle operations end to end against a [`CaseBackend`]:
//!
//! 1. ask the controller for the pending transition (guard + table)
//! 2. get explicit confirmation; a refusal stops here with no request sent
//! 3. `POST /cases/{id}/transition`
//! 4. on success, `GET /cases/{id}` and hand the snapshot to the controller
//!
//! Failures are handed to the controller too, which leaves the snapshot as
//! it was and produces the message to show. Nothing is retried.

use crate::client::CaseBackend;
use ward_core::{
    GENERIC_ASSIGN_FAILURE, Identity, LifecycleController, PendingTransition, TransitionOutcome,
    WardError,
};

/// Explicit user confirmation of a pending transition.
pub trait Confirm {
    /// Return `true` to submit, `false` to cancel.
    fn confirm(&mut self, pending: &PendingTransition) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&PendingTransition) -> bool,
{
    fn confirm(&mut self, pending: &PendingTransition) -> bool {
        self(pending)
    }
}

/// How an `advance` call ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The transition was accepted and the case reloaded.
    Advanced(TransitionOutcome),
    /// The user declined the confirmation.
    Cancelled,
}

/// Advance the controller's case one step.
pub async fn advance<B: CaseBackend>(
    backend: &B,
    controller: &mut LifecycleController,
    reason: Option<String>,
    confirm: &mut impl Confirm,
) -> Result<AdvanceOutcome, WardError> {
    let pending = controller.prepare(reason)?;

    if !confirm.confirm(&pending) {
        tracing::info!(case_id = %pending.case_id, from = %pending.from, to = %pending.to, "transition cancelled");
        return Ok(AdvanceOutcome::Cancelled);
    }

    let request = controller.submit(&pending)?;
    tracing::info!(
        case_id = %pending.case_id,
        from = %pending.from,
        to = %pending.to,
        has_reason = request.reason.is_some(),
        "submitting transition"
    );

    if let Err(e) = backend.request_transition(&pending.case_id, &request).await {
        tracing::warn!(case_id = %pending.case_id, error = %e, "transition rejected");
        return Err(controller.on_rejected(e.to_rejection()));
    }

    let snapshot = match backend.fetch_case(&pending.case_id).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(case_id = %pending.case_id, error = %e, "reload after transition failed");
            return Err(controller.on_reload_failed(e.to_rejection()));
        }
    };

    let outcome = controller
        .on_reloaded(snapshot)
        .unwrap_or(TransitionOutcome {
            from: pending.from,
            expected: pending.to,
            observed: controller.snapshot().status(),
        });

    if outcome.is_confirmed() {
        tracing::info!(case_id = %pending.case_id, status = %outcome.observed, "transition applied");
    } else {
        tracing::warn!(
            case_id = %pending.case_id,
            expected = %outcome.expected,
            observed = %outcome.observed,
            "server reports a different status than requested"
        );
    }
    Ok(AdvanceOutcome::Advanced(outcome))
}

/// Reload the controller's case from the server.
pub async fn reload<B: CaseBackend>(
    backend: &B,
    controller: &mut LifecycleController,
) -> Result<(), WardError> {
    let id = controller.case_id().clone();
    let snapshot = backend
        .fetch_case(&id)
        .await
        .map_err(|e| controller.on_reload_failed(e.to_rejection()))?;
    controller.refresh(snapshot)
}

/// Make `owner` the decision owner, then reload.
///
/// Anyone may assign ownership; the backend decides whether `owner` is a
/// known user.
pub async fn assign_owner<B: CaseBackend>(
    backend: &B,
    controller: &mut LifecycleController,
    owner: &Identity,
) -> Result<(), WardError> {
    if controller.is_in_flight() {
        return Err(WardError::TransitionInFlight);
    }
    let id = controller.case_id().clone();

    backend.assign_owner(&id, owner).await.map_err(|e| {
        tracing::warn!(case_id = %id, error = %e, "owner assignment rejected");
        let rejection = e.to_rejection();
        WardError::Rejected {
            status: rejection.status,
            message: rejection.user_message(GENERIC_ASSIGN_FAILURE),
        }
    })?;
    tracing::info!(case_id = %id, owner = %owner, "decision owner assigned");

    reload(backend, controller).await
}
