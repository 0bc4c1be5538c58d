//! Mirror a local documentation directory into a Confluence space.
//!
//! Sync is one-directional and local wins:
//!
//! 1. The space's pages are listed, replacing the page cache
//! 2. Every directory becomes a page titled after the directory, with its
//!    `README` file (if any) as content
//! 3. Every convertible file becomes a page titled after its file stem,
//!    below the page of the directory containing it
//! 4. Pages whose title already exists in the space are updated instead of
//!    created
//! 5. With pruning enabled, pages below synced directories that no longer
//!    have a local source are deleted

mod report;
mod walker;

use std::path::Path;

use git2sc_config::{ErrorPolicy, SyncConfig};

pub use report::{SyncFailure, SyncReport, SyncedPage};

use crate::client::{ConfluenceClient, Transport};
use crate::error::SyncError;

/// Options for [`ConfluenceClient::sync_directory`].
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Directory names pruned from traversal (matched at any depth).
    pub excluded_dirs: Vec<String>,
    /// Page under which the tree is mirrored. Defaults to the space homepage.
    pub parent_id: Option<String>,
    /// What to do when a single page fails.
    pub on_error: ErrorPolicy,
    /// Delete remote pages without a local source.
    pub prune: bool,
}

impl From<&SyncConfig> for SyncOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            excluded_dirs: config.excluded_dirs.clone(),
            parent_id: config.parent_id.clone(),
            on_error: config.on_error,
            prune: config.prune,
        }
    }
}

impl<T: Transport> ConfluenceClient<T> {
    /// Mirror `root` into `space_key`.
    ///
    /// # Errors
    ///
    /// Fails if the space cannot be listed or its homepage resolved. Other
    /// failures are collected in the returned report, unless
    /// [`ErrorPolicy::Abort`] is set, in which case the first one is returned.
    pub fn sync_directory(
        &mut self,
        space_key: &str,
        root: &Path,
        options: &SyncOptions,
    ) -> Result<SyncReport, SyncError> {
        walker::DirectorySync::new(self, space_key, options).run(root)
    }
}
