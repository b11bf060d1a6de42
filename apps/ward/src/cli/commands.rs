//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::OutputMode;
use crate::client::{CaseBackend, WardClient};
use crate::config::WardConfig;
use crate::driver::{self, AdvanceOutcome, Confirm};
use crate::error::AppError;
use crate::session::Session;
use std::io::{BufRead, Write};
use ward_core::{
    CaseId, CaseRecord, CaseSnapshot, CaseStatus, Identity, LifecycleController, PendingTransition,
    TransitionOffer, transition_table,
};

// =============================================================================
// CONFIRMATION
// =============================================================================

/// Asks on the terminal. Prompts go to stderr so `--json-mode` output stays clean.
struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&mut self, pending: &PendingTransition) -> bool {
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "Confirm state transition for case {}", pending.case_id);
        let _ = writeln!(stderr, "  {}", pending.prompt());
        if let Some(reason) = &pending.reason {
            let _ = writeln!(stderr, "  Reason: {reason}");
        }
        let _ = write!(stderr, "Proceed? [y/N] ");
        let _ = stderr.flush();

        // Blocking read on a runtime worker; let tokio move other tasks off it.
        tokio::task::block_in_place(|| read_answer(&mut std::io::stdin().lock()))
    }
}

/// Read one answer line. EOF or a read error counts as "no".
fn read_answer(input: &mut impl BufRead) -> bool {
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_affirmative(&answer),
    }
}

/// Accepts without asking (`--yes`).
struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _pending: &PendingTransition) -> bool {
        true
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// =============================================================================
// RENDERING HELPERS
// =============================================================================

fn offer_json(offer: TransitionOffer) -> serde_json::Value {
    serde_json::json!({
        "available": offer.is_available(),
        "in_flight": offer == TransitionOffer::InFlight,
        "target": offer.target().map(CaseStatus::as_str),
        "message": offer.message(),
    })
}

fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn print_offer(offer: TransitionOffer) {
    match offer {
        TransitionOffer::Available { to, .. } => {
            println!("Next step:      Advance to {}", to.label());
        }
        TransitionOffer::InFlight => println!("Next step:      (transition in progress)"),
        TransitionOffer::NotDecisionOwner | TransitionOffer::Terminal => {
            println!("Next step:      {}", offer.message().unwrap_or_default());
        }
    }
}

fn print_snapshot(
    snapshot: &CaseSnapshot,
    actor: &Identity,
    offer: TransitionOffer,
    verbose: bool,
) {
    let case = &snapshot.case;
    let title = format!("Case {}", case.id);
    println!("{title}");
    println!("{}", "=".repeat(title.len()));
    if let Some(description) = &case.description {
        println!("{description}");
        println!();
    }
    println!("Status:         {}", case.status.label());
    println!(
        "Decision owner: {}",
        case.decision_owner_email
            .as_ref()
            .map_or("unassigned", Identity::as_str)
    );
    if let Some(updated_at) = &case.updated_at {
        println!("Updated:        {updated_at}");
    }
    println!("Acting as:      {actor}");
    println!();
    print_offer(offer);

    if !verbose {
        return;
    }

    let derived = [
        ("Evidence score", &case.evidence_score),
        ("Responsibility", &case.responsibility),
        ("Financial impact", &case.financial_impact),
    ];
    for (label, value) in derived {
        if let Some(value) = value {
            println!("{label}: {value}");
        }
    }

    if !snapshot.timeline.is_empty() {
        println!();
        println!("Timeline ({} events)", snapshot.timeline.len());
        for event in &snapshot.timeline {
            println!(
                "  {} {} {}: {}",
                event.timestamp.as_deref().unwrap_or("-"),
                event.actor,
                event.action,
                event.content
            );
        }
    }
}

// =============================================================================
// SHOW COMMAND
// =============================================================================

/// Show a case and the transition on offer to the acting identity.
pub async fn cmd_show(
    client: &WardClient,
    config: &WardConfig,
    output: OutputMode,
    case_id: &str,
) -> Result<(), AppError> {
    let session = Session::resolve(config, client).await?;
    let controller = session.open_case(client, &CaseId::new(case_id)).await?;
    let snapshot = controller.snapshot();

    if output.json {
        let mut value = serde_json::to_value(snapshot)
            .map_err(|e| AppError::Io(format!("Cannot encode case: {e}")))?;
        if let Some(map) = value.as_object_mut() {
            map.insert("actor".into(), serde_json::json!(session.identity()));
            map.insert("offer".into(), offer_json(controller.offer()));
        }
        print_json(&value);
        return Ok(());
    }

    print_snapshot(
        snapshot,
        session.identity(),
        controller.offer(),
        output.verbose,
    );
    Ok(())
}

// =============================================================================
// ADVANCE COMMAND
// =============================================================================

/// Advance a case one step after explicit confirmation.
pub async fn cmd_advance(
    client: &WardClient,
    config: &WardConfig,
    output: OutputMode,
    case_id: &str,
    reason: Option<String>,
    assume_yes: bool,
) -> Result<(), AppError> {
    let session = Session::resolve(config, client).await?;
    let mut controller = session.open_case(client, &CaseId::new(case_id)).await?;

    let result = if assume_yes {
        driver::advance(client, &mut controller, reason, &mut AssumeYes).await?
    } else {
        driver::advance(client, &mut controller, reason, &mut PromptConfirm).await?
    };

    report_advance(&controller, result, output);
    Ok(())
}

fn report_advance(controller: &LifecycleController, result: AdvanceOutcome, output: OutputMode) {
    match result {
        AdvanceOutcome::Advanced(outcome) => {
            if output.json {
                print_json(&serde_json::json!({
                    "case_id": controller.case_id(),
                    "from": outcome.from,
                    "requested": outcome.expected,
                    "status": outcome.observed,
                    "updated_at": controller.snapshot().case.updated_at,
                }));
                return;
            }
            if !output.quiet {
                println!("State advanced to {}", outcome.observed.label());
            }
            if !outcome.is_confirmed() {
                println!(
                    "Note: requested {}, server reports {}",
                    outcome.expected.label(),
                    outcome.observed.label()
                );
            }
        }
        AdvanceOutcome::Cancelled => {
            if output.json {
                print_json(&serde_json::json!({
                    "case_id": controller.case_id(),
                    "cancelled": true,
                    "status": controller.snapshot().status(),
                }));
            } else if !output.quiet {
                println!("Transition cancelled.");
            }
        }
    }
}

// =============================================================================
// ASSIGN COMMAND
// =============================================================================

/// Assign the decision owner of a case.
pub async fn cmd_assign(
    client: &WardClient,
    config: &WardConfig,
    output: OutputMode,
    case_id: &str,
    owner_email: &str,
) -> Result<(), AppError> {
    let owner_email = owner_email.trim();
    if owner_email.is_empty() {
        return Err(AppError::Config("Owner email must not be empty".into()));
    }

    let session = Session::resolve(config, client).await?;
    let mut controller = session.open_case(client, &CaseId::new(case_id)).await?;
    let owner = Identity::new(owner_email);

    driver::assign_owner(client, &mut controller, &owner).await?;
    if controller.snapshot().case.decision_owner_email.as_ref() != Some(&owner) {
        tracing::warn!(case_id = %case_id, requested = %owner, "server reports a different decision owner");
    }

    let case = &controller.snapshot().case;
    if output.json {
        print_json(&serde_json::json!({
            "case_id": case.id,
            "decision_owner_email": case.decision_owner_email,
            "offer": offer_json(controller.offer()),
        }));
    } else if !output.quiet {
        println!("{}", owner_line(case));
        print_offer(controller.offer());
    }
    Ok(())
}

/// Owner as reloaded from the server, not as requested.
fn owner_line(case: &CaseRecord) -> String {
    format!(
        "Decision owner of {} is now {}",
        case.id,
        case.decision_owner_email
            .as_ref()
            .map_or("unassigned", Identity::as_str)
    )
}

// =============================================================================
// WHOAMI COMMAND
// =============================================================================

/// Show the acting identity and where it came from.
pub async fn cmd_whoami<B: CaseBackend>(
    backend: &B,
    config: &WardConfig,
    output: OutputMode,
) -> Result<(), AppError> {
    let session = Session::resolve(config, backend).await?;
    let source = format!("{:?}", session.source()).to_lowercase();

    if output.json {
        print_json(&serde_json::json!({
            "identity": session.identity(),
            "source": source,
        }));
    } else {
        println!("{} (from {})", session.identity(), source);
    }
    Ok(())
}

// =============================================================================
// TRANSITIONS COMMAND
// =============================================================================

/// Print the lifecycle transition table. Needs no backend.
pub fn cmd_transitions(output: OutputMode) -> Result<(), AppError> {
    let table = transition_table();

    if output.json {
        let rows: Vec<_> = table
            .iter()
            .map(|(from, to)| serde_json::json!({ "from": from, "to": to }))
            .collect();
        print_json(&serde_json::Value::Array(rows));
        return Ok(());
    }

    println!("Case Lifecycle");
    println!("==============");
    for (from, to) in table {
        match to {
            Some(to) => println!("{:<18} -> {}", from.as_str(), to.as_str()),
            None => println!("{:<18} (terminal)", from.as_str()),
        }
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_answers() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yep"));
    }

    #[test]
    fn answers_are_read_from_one_line() {
        assert!(read_answer(&mut std::io::Cursor::new("yes\nno\n")));
        assert!(!read_answer(&mut std::io::Cursor::new("n\n")));
        assert!(!read_answer(&mut std::io::Cursor::new("")));
    }

    #[test]
    fn owner_line_uses_reloaded_owner() {
        let case = CaseRecord::new(CaseId::new("c-1")).with_owner(Identity::new("lead@x.com"));
        assert_eq!(owner_line(&case), "Decision owner of c-1 is now lead@x.com");

        let unassigned = CaseRecord::new(CaseId::new("c-2"));
        assert_eq!(owner_line(&unassigned), "Decision owner of c-2 is now unassigned");
    }

    #[test]
    fn offer_json_for_available_and_refused() {
        let available = offer_json(TransitionOffer::Available {
            from: CaseStatus::Reported,
            to: CaseStatus::Clarified,
        });
        assert_eq!(available["available"], true);
        assert_eq!(available["target"], "CLARIFIED");
        assert!(available["message"].is_null());

        let refused = offer_json(TransitionOffer::Terminal);
        assert_eq!(refused["available"], false);
        assert!(refused["target"].is_null());
        assert_eq!(refused["message"], ward_core::TERMINAL_MESSAGE);
    }
}
