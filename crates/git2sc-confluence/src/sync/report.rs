//! Sync outcome.

use crate::error::SyncError;

/// Page touched by a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncedPage {
    /// Page ID.
    pub id: String,
    /// Page title.
    pub title: String,
}

/// Failure recorded while syncing.
#[derive(Debug)]
pub struct SyncFailure {
    /// Local path or page the failure relates to.
    pub target: String,
    /// What went wrong.
    pub error: SyncError,
}

/// Summary of a directory sync.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Pages created.
    pub created: Vec<SyncedPage>,
    /// Existing pages whose content was replaced.
    pub updated: Vec<SyncedPage>,
    /// Pages deleted by pruning.
    pub deleted: Vec<SyncedPage>,
    /// Failures that did not stop the sync.
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Whether every operation succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
