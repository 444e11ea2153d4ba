//! Persistence layer backed by redb.
//!
//! Two tables in one database file serve the workflow:
//!
//! - [`knowledge::KnowledgeStore`] — learned question→answer entries
//! - [`escalation::EscalationStore`] — help requests awaiting a supervisor
//!
//! All writes go through transactions; reads use MVCC snapshots. Records are
//! bincode-encoded. A [`StoreHandle`] owns the database and is cheap to
//! clone into the individual stores.

pub mod escalation;
pub mod knowledge;

use std::path::Path;
use std::sync::Arc;

use redb::Database;
use redb::backends::InMemoryBackend;

use crate::error::StoreError;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Shared handle to the backing database.
///
/// File-backed via [`StoreHandle::open`] for production, or memory-backed via
/// [`StoreHandle::in_memory`] for ephemeral use and tests.
#[derive(Clone)]
pub struct StoreHandle {
    db: Arc<Database>,
}

impl StoreHandle {
    /// Open or create the database file in the given directory.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(data_dir).map_err(|e| StoreError::Io { source: e })?;
        let db_path = data_dir.join("frontdesk.redb");
        let db = Database::create(&db_path).map_err(|e| StoreError::Redb {
            message: format!("failed to open redb at {}: {e}", db_path.display()),
        })?;
        let handle = Self { db: Arc::new(db) };
        handle.provision_tables()?;
        Ok(handle)
    }

    /// Create a memory-only database with no persistence.
    pub fn in_memory() -> StoreResult<Self> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(|e| StoreError::Redb {
                message: format!("failed to create in-memory database: {e}"),
            })?;
        let handle = Self { db: Arc::new(db) };
        handle.provision_tables()?;
        Ok(handle)
    }

    /// Create both tables up front so reads never race table creation.
    fn provision_tables(&self) -> StoreResult<()> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Redb {
            message: format!("begin_write failed: {e}"),
        })?;
        txn.open_table(knowledge::KNOWLEDGE_TABLE)
            .map_err(|e| StoreError::Redb {
                message: format!("open_table failed: {e}"),
            })?;
        txn.open_table(escalation::HELP_REQUESTS_TABLE)
            .map_err(|e| StoreError::Redb {
                message: format!("open_table failed: {e}"),
            })?;
        txn.commit().map_err(|e| StoreError::Redb {
            message: format!("commit failed: {e}"),
        })?;
        Ok(())
    }

    pub(crate) fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_data_dir_and_tables() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("frontdesk");
        let handle = StoreHandle::open(&nested).unwrap();
        assert!(nested.join("frontdesk.redb").is_file());

        // Fresh tables are readable immediately.
        let kb = knowledge::KnowledgeStore::new(&handle);
        assert!(kb.list_all().unwrap().is_empty());
        let esc = escalation::EscalationStore::new(&handle);
        assert!(
            esc.list_by_status(crate::model::RequestStatus::Pending)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn in_memory_handle_is_usable() {
        let handle = StoreHandle::in_memory().unwrap();
        let kb = knowledge::KnowledgeStore::new(&handle);
        assert!(kb.list_all().unwrap().is_empty());
    }
}
