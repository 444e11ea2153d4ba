//! Persisted record types shared by the stores and the resolution engine.
//!
//! Field names and status literals are the storage contract: the supervisor
//! dashboard and the conversational front-end both consume these shapes as-is.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a [`HelpRequest`].
///
/// Serialized as exactly `"Pending"` / `"Resolved"` (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Resolved,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending"),
            RequestStatus::Resolved => write!(f, "Resolved"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RequestStatus::Pending),
            "Resolved" => Ok(RequestStatus::Resolved),
            other => Err(format!(
                "unknown status \"{other}\" (expected \"Pending\" or \"Resolved\")"
            )),
        }
    }
}

/// A learned question→answer pair in the knowledge base.
///
/// Entries are append-only: once created they are never updated, and a new
/// entry is added even for duplicate-adjacent questions (dedup at write-back
/// time is exact-text only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub updated_at: DateTime<Utc>,
}

impl KnowledgeEntry {
    /// Create a new entry with a fresh id and the current timestamp.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question: question.into(),
            answer: answer.into(),
            updated_at: Utc::now(),
        }
    }
}

/// A question escalated to a human supervisor.
///
/// Invariant: `status`, `supervisor_answer`, and `resolved_at` move together —
/// all three are set by [`HelpRequest::resolve`] and never individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: String,
    pub customer_id: String,
    pub question: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub supervisor_answer: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl HelpRequest {
    /// Create a new pending request with a fresh id and the current timestamp.
    pub fn new(customer_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.into(),
            question: question.into(),
            status: RequestStatus::Pending,
            created_at: Utc::now(),
            supervisor_answer: None,
            resolved_at: None,
        }
    }

    /// Transition into the terminal Resolved state with the supervisor's answer.
    pub fn resolve(&mut self, answer: impl Into<String>) {
        self.status = RequestStatus::Resolved;
        self.supervisor_answer = Some(answer.into());
        self.resolved_at = Some(Utc::now());
    }

    /// Whether this request has reached its terminal state.
    pub fn is_resolved(&self) -> bool {
        self.status == RequestStatus::Resolved
    }
}
