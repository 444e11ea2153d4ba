//! Knowledge base persistence: question→answer entries keyed by id.

use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};

use crate::error::StoreError;
use crate::model::KnowledgeEntry;
use crate::store::{StoreHandle, StoreResult};

/// Knowledge entries: id → bincode-encoded [`KnowledgeEntry`].
pub(crate) const KNOWLEDGE_TABLE: TableDefinition<&str, &[u8]> =
    TableDefinition::new("knowledge_base");

/// Append-only store of learned question→answer pairs.
///
/// Entries are never updated in place; write-back dedup is exact-text only
/// (see [`KnowledgeStore::find_answer_for`]), so near-duplicate questions
/// accumulate as separate entries.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    db: Arc<Database>,
}

impl KnowledgeStore {
    pub fn new(handle: &StoreHandle) -> Self {
        Self {
            db: handle.database(),
        }
    }

    /// Persist a new entry with a fresh id and timestamp, returning it.
    pub fn add(&self, question: &str, answer: &str) -> StoreResult<KnowledgeEntry> {
        let entry = KnowledgeEntry::new(question, answer);
        let encoded = bincode::serialize(&entry).map_err(|e| StoreError::Serialization {
            message: format!("failed to serialize knowledge entry: {e}"),
        })?;

        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        {
            let mut table = txn
                .open_table(KNOWLEDGE_TABLE)
                .map_err(|e| StoreError::Redb {
                    message: format!("open_table failed: {e}"),
                })?;
            table
                .insert(entry.id.as_str(), encoded.as_slice())
                .map_err(|e| StoreError::Redb {
                    message: format!("insert failed: {e}"),
                })?;
        }
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;

        tracing::debug!(entry_id = %entry.id, "stored knowledge entry");
        Ok(entry)
    }

    /// Full snapshot of all entries. Iteration order is key order (UUIDs),
    /// not insertion order.
    pub fn list_all(&self) -> StoreResult<Vec<KnowledgeEntry>> {
        let txn = self.db.begin_read().map_err(|e| StoreError::Redb {
            message: format!("begin_read failed: {e}"),
        })?;
        let table = txn
            .open_table(KNOWLEDGE_TABLE)
            .map_err(|e| StoreError::Redb {
                message: format!("open_table failed: {e}"),
            })?;

        let mut entries = Vec::new();
        let iter = table.iter().map_err(|e| StoreError::Redb {
            message: format!("iter failed: {e}"),
        })?;
        for item in iter {
            let (_, value) = item.map_err(|e| StoreError::Redb {
                message: format!("scan failed: {e}"),
            })?;
            let entry: KnowledgeEntry =
                bincode::deserialize(value.value()).map_err(|e| StoreError::Serialization {
                    message: format!("failed to deserialize knowledge entry: {e}"),
                })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Exact-text lookup used by the write-back path to avoid duplicate
    /// entries for verbatim-identical questions. Deliberately NOT fuzzy.
    pub fn find_answer_for(&self, question: &str) -> StoreResult<Option<String>> {
        Ok(self
            .list_all()?
            .into_iter()
            .find(|entry| entry.question == question)
            .map(|entry| entry.answer))
    }

    /// Delete an entry by id. Idempotent: a missing id is not an error.
    /// Returns whether the entry existed.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        let existed = {
            let mut table = txn
                .open_table(KNOWLEDGE_TABLE)
                .map_err(|e| StoreError::Redb {
                    message: format!("open_table failed: {e}"),
                })?;
            table
                .remove(id)
                .map_err(|e| StoreError::Redb {
                    message: format!("remove failed: {e}"),
                })?
                .is_some()
        };
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;
        Ok(existed)
    }

    /// Number of stored entries.
    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.list_all()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> KnowledgeStore {
        KnowledgeStore::new(&StoreHandle::in_memory().unwrap())
    }

    #[test]
    fn add_then_list_roundtrip() {
        let kb = store();
        let entry = kb.add("What are your hours?", "10 AM to 8 PM.").unwrap();
        assert_eq!(entry.question, "What are your hours?");
        assert_eq!(entry.answer, "10 AM to 8 PM.");

        let all = kb.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], entry);
    }

    #[test]
    fn find_answer_for_is_exact_only() {
        let kb = store();
        kb.add("What are your hours?", "10 AM to 8 PM.").unwrap();

        assert_eq!(
            kb.find_answer_for("What are your hours?").unwrap(),
            Some("10 AM to 8 PM.".to_string())
        );
        // Case and punctuation differ: no match on the exact path.
        assert_eq!(kb.find_answer_for("what are your hours").unwrap(), None);
    }

    #[test]
    fn duplicate_questions_append_separate_entries() {
        let kb = store();
        let a = kb.add("Do you do nails?", "Yes.").unwrap();
        let b = kb.add("Do you do nails?", "Yes, we do.").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(kb.count().unwrap(), 2);
    }

    #[test]
    fn delete_is_idempotent() {
        let kb = store();
        let entry = kb.add("q", "a").unwrap();
        assert!(kb.delete(&entry.id).unwrap());
        assert!(!kb.delete(&entry.id).unwrap());
        assert!(!kb.delete("no-such-id").unwrap());
        assert_eq!(kb.count().unwrap(), 0);
    }
}
