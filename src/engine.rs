//! Engine facade: the question-resolution workflow.
//!
//! The `Engine` owns the matcher and both stores and provides the public
//! interface consumed by the conversational front-end and the supervisor
//! dashboard: answer a question from the knowledge base, escalate it to a
//! human when no answer is known, and fold the supervisor's answer back into
//! the knowledge base on resolution.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{EngineError, FrontdeskResult};
use crate::matcher::{self, FuzzyMatcher};
use crate::model::{HelpRequest, KnowledgeEntry, RequestStatus};
use crate::store::StoreHandle;
use crate::store::escalation::EscalationStore;
use crate::store::knowledge::KnowledgeStore;

/// Configuration for the frontdesk engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Data directory for persistence. `None` for memory-only mode.
    pub data_dir: Option<PathBuf>,
    /// Minimum similarity ratio for a fuzzy knowledge-base hit.
    pub similarity_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            similarity_threshold: matcher::SIMILARITY_THRESHOLD,
        }
    }
}

/// Outcome of a single question resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Resolution {
    /// The knowledge base held a matching entry.
    Answered { answer: String, entry_id: String },
    /// No match: a pending help request was created for a supervisor.
    Escalated { request_id: String },
    /// The front-end invoked the engine without verified user speech.
    /// Logged and dropped, never surfaced to the caller.
    Rejected { reason: String },
    /// The question was blank after trimming; ask the caller to repeat.
    ClarificationNeeded,
}

/// The frontdesk resolution engine.
///
/// Owns the fuzzy matcher and both stores. Constructed once at composition
/// time and shared with every caller turn; each invocation is stateless
/// apart from reads and writes to the stores.
pub struct Engine {
    config: EngineConfig,
    matcher: FuzzyMatcher,
    knowledge: KnowledgeStore,
    escalations: EscalationStore,
}

impl Engine {
    /// Create a new engine with the given configuration.
    pub fn new(config: EngineConfig) -> FrontdeskResult<Self> {
        if !(0.0..=1.0).contains(&config.similarity_threshold) {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "similarity_threshold must be within [0, 1], got {}",
                    config.similarity_threshold
                ),
            }
            .into());
        }

        let handle = match config.data_dir {
            Some(ref dir) => {
                std::fs::create_dir_all(dir).map_err(|_| EngineError::DataDir {
                    path: dir.display().to_string(),
                })?;
                StoreHandle::open(dir)?
            }
            None => StoreHandle::in_memory()?,
        };

        tracing::info!(
            data_dir = ?config.data_dir,
            threshold = config.similarity_threshold,
            "initializing frontdesk engine"
        );

        let matcher = FuzzyMatcher::new(config.similarity_threshold);
        let knowledge = KnowledgeStore::new(&handle);
        let escalations = EscalationStore::new(&handle);

        Ok(Self {
            config,
            matcher,
            knowledge,
            escalations,
        })
    }

    /// Resolve one caller question: answer from the knowledge base, or
    /// escalate to a supervisor.
    ///
    /// `confirmed` must be true for the question to be processed at all.
    /// The front-end may invoke the engine speculatively from its own
    /// greeting or prompt text; such calls are dropped without side effects.
    pub fn resolve_question(
        &self,
        customer_id: &str,
        question: &str,
        confirmed: bool,
    ) -> FrontdeskResult<Resolution> {
        if !confirmed {
            tracing::warn!(customer_id, "ignoring unconfirmed question (front-end misfire)");
            return Ok(Resolution::Rejected {
                reason: "no verified user speech".to_string(),
            });
        }

        let question = question.trim();
        if question.is_empty() {
            tracing::debug!(customer_id, "blank question, asking caller to repeat");
            return Ok(Resolution::ClarificationNeeded);
        }

        // First match wins; iteration order is store key order.
        for entry in self.knowledge.list_all()? {
            if self.matcher.is_match(question, &entry.question) {
                tracing::info!(
                    customer_id,
                    entry_id = %entry.id,
                    "answered from knowledge base"
                );
                return Ok(Resolution::Answered {
                    answer: entry.answer,
                    entry_id: entry.id,
                });
            }
        }

        let request = self.escalations.create(customer_id, question)?;
        tracing::info!(
            customer_id,
            request_id = %request.id,
            "no knowledge match, escalated to supervisor"
        );
        Ok(Resolution::Escalated {
            request_id: request.id,
        })
    }

    /// Create a pending escalation directly (supervisor interface boundary).
    pub fn create_escalation(
        &self,
        customer_id: &str,
        question: &str,
    ) -> FrontdeskResult<HelpRequest> {
        Ok(self.escalations.create(customer_id, question)?)
    }

    /// List help requests in the given state.
    pub fn list_escalations(&self, status: RequestStatus) -> FrontdeskResult<Vec<HelpRequest>> {
        Ok(self.escalations.list_by_status(status)?)
    }

    /// Resolve an escalation with the supervisor's answer, then write the
    /// answer back to the knowledge base.
    ///
    /// Write-back happens only on the transition into Resolved, and only when
    /// no exact-text entry for the original question exists yet. Questions
    /// that are semantically equivalent but textually different accumulate as
    /// separate entries.
    pub fn resolve_escalation(&self, id: &str, answer: &str) -> FrontdeskResult<HelpRequest> {
        let resolved = self.escalations.resolve(id, answer)?;

        if self.knowledge.find_answer_for(&resolved.question)?.is_none() {
            let entry = self.knowledge.add(&resolved.question, answer)?;
            tracing::info!(
                request_id = %resolved.id,
                entry_id = %entry.id,
                "learned knowledge entry from supervisor answer"
            );
        } else {
            tracing::debug!(
                request_id = %resolved.id,
                "exact-text knowledge entry already present, skipping write-back"
            );
        }

        Ok(resolved)
    }

    /// Add a knowledge entry directly (supervisor dashboard boundary).
    pub fn add_knowledge(&self, question: &str, answer: &str) -> FrontdeskResult<KnowledgeEntry> {
        Ok(self.knowledge.add(question, answer)?)
    }

    /// Full snapshot of the knowledge base.
    pub fn list_knowledge(&self) -> FrontdeskResult<Vec<KnowledgeEntry>> {
        Ok(self.knowledge.list_all()?)
    }

    /// Delete a knowledge entry by id. Idempotent.
    pub fn delete_knowledge(&self, id: &str) -> FrontdeskResult<bool> {
        Ok(self.knowledge.delete(id)?)
    }

    /// Store counts for diagnostics.
    pub fn stats(&self) -> FrontdeskResult<EngineStats> {
        let (pending, resolved) = self.escalations.counts()?;
        Ok(EngineStats {
            knowledge_entries: self.knowledge.count()?,
            pending_requests: pending,
            resolved_requests: resolved,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Point-in-time store counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub knowledge_entries: usize,
    pub pending_requests: usize,
    pub resolved_requests: usize,
}
