//! # Case Records
//!
//! Typed view of the case payload served by the backend.
//!
//! Required fields are declared as plain fields, everything the backend may
//! omit is an `Option`. Derived results produced by backend collaborators
//! (evidence scoring, responsibility attribution, financial impact) are kept
//! as opaque JSON: this crate references them but never computes them.

use crate::{CaseId, CaseStatus, Identity};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Timeline action recorded by the backend for every state transition.
pub const STATE_TRANSITION_ACTION: &str = "STATE_TRANSITION";

// =============================================================================
// CASE RECORD
// =============================================================================

/// A tracked disruption case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Server identifier (`_id` on the wire, `id` also accepted).
    #[serde(rename = "_id", alias = "id")]
    pub id: CaseId,
    /// Lifecycle status. The backend treats a missing status as `REPORTED`.
    #[serde(default)]
    pub status: CaseStatus,
    /// The only identity allowed to advance this case. Unset on creation.
    #[serde(default)]
    pub decision_owner_email: Option<Identity>,
    #[serde(default)]
    pub decision_owner_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub operator_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Bumped by the backend on every transition.
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_score: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsibility: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_impact: Option<Value>,
}

impl CaseRecord {
    /// Create a freshly reported case with no decision owner.
    #[must_use]
    pub fn new(id: CaseId) -> Self {
        Self {
            id,
            status: CaseStatus::Reported,
            decision_owner_email: None,
            decision_owner_id: None,
            description: None,
            operator_email: None,
            created_at: None,
            updated_at: None,
            evidence_score: None,
            responsibility: None,
            financial_impact: None,
        }
    }

    /// Builder-style status setter.
    #[must_use]
    pub fn with_status(mut self, status: CaseStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder-style decision owner setter.
    #[must_use]
    pub fn with_owner(mut self, owner: Identity) -> Self {
        self.decision_owner_email = Some(owner);
        self
    }

    /// Whether `actor` is this case's decision owner.
    ///
    /// An unset owner matches nobody.
    #[must_use]
    pub fn is_owned_by(&self, actor: &Identity) -> bool {
        self.decision_owner_email.as_ref() == Some(actor)
    }
}

// =============================================================================
// TIMELINE
// =============================================================================

/// One entry of a case's append-only timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    #[serde(default)]
    pub actor: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source_type: Option<String>,
    #[serde(default)]
    pub reliability: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl TimelineEvent {
    #[must_use]
    pub fn is_transition(&self) -> bool {
        self.action == STATE_TRANSITION_ACTION
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// A case together with its timeline, exactly as last loaded from the server.
///
/// Deserializes from either the `{ "case": …, "timeline": […] }` envelope
/// returned by `GET /cases/{id}` or a bare case object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseSnapshot {
    pub case: CaseRecord,
    pub timeline: Vec<TimelineEvent>,
}

impl CaseSnapshot {
    /// Snapshot of a case with an empty timeline.
    #[must_use]
    pub fn new(case: CaseRecord) -> Self {
        Self {
            case,
            timeline: Vec::new(),
        }
    }

    #[must_use]
    pub fn status(&self) -> CaseStatus {
        self.case.status
    }

    /// The most recent transition event, if the timeline contains one.
    ///
    /// The backend serves the timeline newest first, so this is the first match.
    #[must_use]
    pub fn last_transition(&self) -> Option<&TimelineEvent> {
        self.timeline.iter().find(|event| event.is_transition())
    }
}

impl<'de> Deserialize<'de> for CaseSnapshot {
    /// An object with a `case` key is an envelope; anything else is a bare
    /// case. Errors name the offending field instead of the payload shape.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = Value::deserialize(deserializer)?;

        let Some(case) = value.get_mut("case").map(Value::take) else {
            return CaseRecord::deserialize(value)
                .map(Self::new)
                .map_err(D::Error::custom);
        };
        let case = CaseRecord::deserialize(case).map_err(D::Error::custom)?;
        let timeline = match value.get_mut("timeline").map(Value::take) {
            None | Some(Value::Null) => Vec::new(),
            Some(events) => Vec::<TimelineEvent>::deserialize(events).map_err(D::Error::custom)?,
        };
        Ok(Self { case, timeline })
    }
}

// =============================================================================
// TESTS
// =============================================================================
