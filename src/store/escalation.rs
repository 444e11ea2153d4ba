//! Help request persistence with the Pending→Resolved state transition.

use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::StoreError;
use crate::model::{HelpRequest, RequestStatus};
use crate::store::{StoreHandle, StoreResult};

/// Help requests: id → bincode-encoded [`HelpRequest`].
pub(crate) const HELP_REQUESTS_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("help_requests");

/// Store of questions escalated to a human supervisor.
///
/// A request is created Pending and transitions exactly once to Resolved,
/// atomically with its `supervisor_answer` and `resolved_at` fields. There is
/// no timeout: pending requests wait indefinitely for a human.
#[derive(Debug, Clone)]
pub struct EscalationStore {
    db: Arc<Database>,
}

impl EscalationStore {
    pub fn new(handle: &StoreHandle) -> Self {
        Self {
            db: handle.database(),
        }
    }

    /// Create and persist a new pending request.
    pub fn create(&self, customer_id: &str, question: &str) -> StoreResult<HelpRequest> {
        let request = HelpRequest::new(customer_id, question);
        self.put(&request)?;
        tracing::debug!(request_id = %request.id, customer_id, "created help request");
        Ok(request)
    }

    /// All requests currently in the given state.
    pub fn list_by_status(&self, status: RequestStatus) -> StoreResult<Vec<HelpRequest>> {
        Ok(self
            .scan()?
            .into_iter()
            .filter(|req| req.status == status)
            .collect())
    }

    /// Look up a single request by id.
    pub fn get(&self, id: &str) -> StoreResult<Option<HelpRequest>> {
        let txn = self.db.begin_read().map_err(|e| StoreError::Redb {
            message: format!("begin_read failed: {e}"),
        })?;
        let table = txn
            .open_table(HELP_REQUESTS_TABLE)
            .map_err(|e| StoreError::Redb {
                message: format!("open_table failed: {e}"),
            })?;
        let guard = table.get(id).map_err(|e| StoreError::Redb {
            message: format!("get failed: {e}"),
        })?;
        match guard {
            Some(value) => Ok(Some(decode(value.value())?)),
            None => Ok(None),
        }
    }

    /// Transition a pending request into Resolved with the supervisor's
    /// answer, in a single write transaction.
    ///
    /// Fails with [`StoreError::RequestNotFound`] for an unknown id and
    /// [`StoreError::AlreadyResolved`] for a request past its terminal
    /// transition; in both cases nothing is written.
    pub fn resolve(&self, id: &str, answer: &str) -> StoreResult<HelpRequest> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        let updated = {
            let mut table = txn
                .open_table(HELP_REQUESTS_TABLE)
                .map_err(|e| StoreError::Redb {
                    message: format!("open_table failed: {e}"),
                })?;

            let mut request = {
                let guard = table.get(id).map_err(|e| StoreError::Redb {
                    message: format!("get failed: {e}"),
                })?;
                match guard {
                    Some(value) => decode(value.value())?,
                    None => {
                        return Err(StoreError::RequestNotFound { id: id.to_string() });
                    }
                }
            };

            if request.is_resolved() {
                return Err(StoreError::AlreadyResolved { id: id.to_string() });
            }

            request.resolve(answer);
            let encoded = encode(&request)?;
            table
                .insert(id, encoded.as_slice())
                .map_err(|e| StoreError::Redb {
                    message: format!("insert failed: {e}"),
                })?;
            request
        };
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;

        tracing::debug!(request_id = %updated.id, "resolved help request");
        Ok(updated)
    }

    /// Counts of requests per state, for diagnostics.
    pub fn counts(&self) -> StoreResult<(usize, usize)> {
        let mut pending = 0;
        let mut resolved = 0;
        for req in self.scan()? {
            match req.status {
                RequestStatus::Pending => pending += 1,
                RequestStatus::Resolved => resolved += 1,
            }
        }
        Ok((pending, resolved))
    }

    fn put(&self, request: &HelpRequest) -> StoreResult<()> {
        let encoded = encode(request)?;
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        {
            let mut table = txn
                .open_table(HELP_REQUESTS_TABLE)
                .map_err(|e| StoreError::Redb {
                    message: format!("open_table failed: {e}"),
                })?;
            table
                .insert(request.id.as_str(), encoded.as_slice())
                .map_err(|e| StoreError::Redb {
                    message: format!("insert failed: {e}"),
                })?;
        }
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;
        Ok(())
    }

    fn scan(&self) -> StoreResult<Vec<HelpRequest>> {
        let txn = self.db.begin_read().map_err(|e| StoreError::Redb {
            message: format!("begin_read failed: {e}"),
        })?;
        let table = txn
            .open_table(HELP_REQUESTS_TABLE)
            .map_err(|e| StoreError::Redb {
                message: format!("open_table failed: {e}"),
            })?;

        let mut requests = Vec::new();
        let iter = table.iter().map_err(|e| StoreError::Redb {
            message: format!("iter failed: {e}"),
        })?;
        for item in iter {
            let (_, value) = item.map_err(|e| StoreError::Redb {
                message: format!("scan failed: {e}"),
            })?;
            requests.push(decode(value.value())?);
        }
        Ok(requests)
    }
}

fn encode(request: &HelpRequest) -> StoreResult<Vec<u8>> {
    bincode::serialize(request).map_err(|e| StoreError::Serialization {
        message: format!("failed to serialize help request: {e}"),
    })
}

fn decode(bytes: &[u8]) -> StoreResult<HelpRequest> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Serialization {
        message: format!("failed to deserialize help request: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> EscalationStore {
        EscalationStore::new(&StoreHandle::in_memory().unwrap())
    }

    #[test]
    fn create_starts_pending() {
        let esc = store();
        let req = esc.create("caller-7", "Do you take walk-ins?").unwrap();
        assert_eq!(req.status, RequestStatus::Pending);
        assert_eq!(req.customer_id, "caller-7");
        assert!(req.supervisor_answer.is_none());
        assert!(req.resolved_at.is_none());

        let pending = esc.list_by_status(RequestStatus::Pending).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, req.id);
        assert!(esc.list_by_status(RequestStatus::Resolved).unwrap().is_empty());
    }

    #[test]
    fn resolve_sets_terminal_fields_atomically() {
        let esc = store();
        let req = esc.create("caller-7", "Do you take walk-ins?").unwrap();

        let resolved = esc.resolve(&req.id, "Walk-ins welcome before 6 PM.").unwrap();
        assert_eq!(resolved.status, RequestStatus::Resolved);
        assert_eq!(
            resolved.supervisor_answer.as_deref(),
            Some("Walk-ins welcome before 6 PM.")
        );
        assert!(resolved.resolved_at.is_some());

        // The stored record reflects the transition.
        let fetched = esc.get(&req.id).unwrap().unwrap();
        assert_eq!(fetched, resolved);
        assert!(esc.list_by_status(RequestStatus::Pending).unwrap().is_empty());
    }

    #[test]
    fn resolve_unknown_id_is_not_found() {
        let esc = store();
        let err = esc.resolve("missing", "answer").unwrap_err();
        assert!(matches!(err, StoreError::RequestNotFound { .. }));
    }

    #[test]
    fn resolve_is_single_shot() {
        let esc = store();
        let req = esc.create("caller-7", "Do you take walk-ins?").unwrap();
        esc.resolve(&req.id, "Yes.").unwrap();

        let err = esc.resolve(&req.id, "Changed my mind.").unwrap_err();
        assert!(matches!(err, StoreError::AlreadyResolved { .. }));

        // First answer stands.
        let fetched = esc.get(&req.id).unwrap().unwrap();
        assert_eq!(fetched.supervisor_answer.as_deref(), Some("Yes."));
    }

    #[test]
    fn counts_track_both_states() {
        let esc = store();
        let a = esc.create("c1", "q1").unwrap();
        esc.create("c2", "q2").unwrap();
        esc.resolve(&a.id, "a1").unwrap();
        assert_eq!(esc.counts().unwrap(), (1, 1));
    }
}
