//! Directory walking and page upserts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use git2sc_config::ErrorPolicy;
use tracing::{debug, error, info};

use super::{SyncFailure, SyncOptions, SyncReport, SyncedPage};
use crate::client::{ConfluenceClient, Transport};
use crate::convert::ConverterRegistry;
use crate::error::SyncError;

/// File stem whose file becomes the content of its directory page.
const README_STEM: &str = "readme";

/// Entries of one directory, sorted by name.
struct DirEntries {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

/// State of one sync run.
pub(super) struct DirectorySync<'a, T: Transport> {
    client: &'a mut ConfluenceClient<T>,
    space_key: &'a str,
    options: &'a SyncOptions,
    report: SyncReport,
    /// Pages whose children mirror a local directory.
    parents: Vec<String>,
    /// Pages created or updated in this run.
    touched: HashSet<String>,
    /// Titles of local sources seen in this run, failed and excluded ones included.
    claimed: HashSet<String>,
}

impl<'a, T: Transport> DirectorySync<'a, T> {
    pub(super) fn new(
        client: &'a mut ConfluenceClient<T>,
        space_key: &'a str,
        options: &'a SyncOptions,
    ) -> Self {
        Self {
            client,
            space_key,
            options,
            report: SyncReport::default(),
            parents: Vec::new(),
            touched: HashSet::new(),
            claimed: HashSet::new(),
        }
    }

    pub(super) fn run(mut self, root: &Path) -> Result<SyncReport, SyncError> {
        self.client.fetch_space_pages(self.space_key)?;

        let root_parent = match &self.options.parent_id {
            Some(id) => id.clone(),
            None => self.client.fetch_space_homepage(self.space_key)?,
        };

        info!(
            "Syncing {} into space {} below page {}",
            root.display(),
            self.space_key,
            root_parent
        );

        self.sync_dir(root, &root_parent, false)?;

        if self.options.prune {
            self.prune()?;
        }

        Ok(self.report)
    }

    /// Mirror the contents of `dir` below `parent_id`.
    ///
    /// `has_dir_page` is set when `dir` has its own page, whose body was
    /// taken from the directory's README.
    fn sync_dir(&mut self, dir: &Path, parent_id: &str, has_dir_page: bool) -> Result<(), SyncError> {
        let entries = match read_entries(dir) {
            Ok(entries) => entries,
            Err(e) => return self.fail(dir.display().to_string(), e),
        };
        self.parents.push(parent_id.to_owned());

        for file in &entries.files {
            let converters = self.client.converters();
            if !converters.supports(file) {
                debug!("Skipping {} (no converter)", file.display());
                continue;
            }
            if has_dir_page && is_readme(file, converters) {
                continue;
            }

            let title = file_stem(file);
            self.claimed.insert(title.clone());
            if let Err(e) = self.sync_file(file, &title, parent_id) {
                self.fail(file.display().to_string(), e)?;
            }
        }

        for subdir in &entries.dirs {
            let name = file_name(subdir);
            self.claimed.insert(name.clone());
            if self.options.excluded_dirs.contains(&name) {
                debug!("Skipping excluded directory {}", subdir.display());
                continue;
            }

            match self.sync_dir_page(subdir, &name, parent_id) {
                Ok(page_id) => self.sync_dir(subdir, &page_id, true)?,
                Err(e) => self.fail(subdir.display().to_string(), e)?,
            }
        }

        Ok(())
    }

    fn sync_file(&mut self, path: &Path, title: &str, parent_id: &str) -> Result<String, SyncError> {
        let html = self.client.convert_to_html(path)?;
        self.upsert(title, &html, parent_id)
    }

    fn sync_dir_page(&mut self, dir: &Path, title: &str, parent_id: &str) -> Result<String, SyncError> {
        let readme = read_entries(dir)?
            .files
            .into_iter()
            .find(|f| is_readme(f, self.client.converters()));

        let html = match readme {
            Some(path) => self.client.convert_to_html(&path)?,
            None => String::new(),
        };
        self.upsert(title, &html, parent_id)
    }

    /// Update the page titled `title` and move it below `parent_id`, or
    /// create it there.
    ///
    /// A title already written in this run is a collision between two local
    /// sources and is not overwritten.
    fn upsert(&mut self, title: &str, html: &str, parent_id: &str) -> Result<String, SyncError> {
        let existing = self
            .client
            .pages()
            .values()
            .find(|page| page.title == title)
            .map(|page| page.id.clone());

        let page_id = if let Some(id) = existing {
            if self.touched.contains(&id) {
                return Err(SyncError::TitleCollision {
                    title: title.to_owned(),
                    page_id: id,
                });
            }
            self.client.update_page_below(&id, html, parent_id)?;
            self.report.updated.push(SyncedPage {
                id: id.clone(),
                title: title.to_owned(),
            });
            id
        } else {
            let id = self
                .client
                .create_page(self.space_key, title, html, Some(parent_id))?;
            self.report.created.push(SyncedPage {
                id: id.clone(),
                title: title.to_owned(),
            });
            id
        };

        self.touched.insert(page_id.clone());
        Ok(page_id)
    }

    /// Delete pages directly below a synced parent that no local source
    /// claims, deepest first.
    fn prune(&mut self) -> Result<(), SyncError> {
        let mut stale: Vec<_> = self
            .client
            .pages()
            .values()
            .filter(|page| {
                !self.touched.contains(&page.id)
                    && !self.parents.contains(&page.id)
                    && !self.claimed.contains(&page.title)
            })
            .filter(|page| {
                page.parent_id()
                    .is_some_and(|id| self.parents.iter().any(|p| p == id))
            })
            .map(|page| {
                (
                    page.ancestors.len(),
                    SyncedPage {
                        id: page.id.clone(),
                        title: page.title.clone(),
                    },
                )
            })
            .collect();
        stale.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

        for (_, page) in stale {
            match self.client.delete_page(&page.id) {
                Ok(()) => self.report.deleted.push(page),
                Err(e) => self.fail(format!("page {} ({})", page.id, page.title), e)?,
            }
        }

        Ok(())
    }

    /// Record a failure, or return it when the policy is to abort.
    fn fail(&mut self, target: String, error: impl Into<SyncError>) -> Result<(), SyncError> {
        let error = error.into();
        match self.options.on_error {
            ErrorPolicy::Abort => Err(error),
            ErrorPolicy::Continue => {
                error!("{}: {}", target, error);
                self.report.failures.push(SyncFailure { target, error });
                Ok(())
            }
        }
    }
}

/// List a directory, skipping hidden entries.
fn read_entries(dir: &Path) -> Result<DirEntries, SyncError> {
    let read_dir = fs::read_dir(dir).map_err(|source| SyncError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    let mut dirs = Vec::new();
    for entry in read_dir.filter_map(Result::ok) {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            dirs.push(entry.path());
        } else {
            files.push(entry.path());
        }
    }

    files.sort();
    dirs.sort();
    Ok(DirEntries { files, dirs })
}

fn is_readme(path: &Path, converters: &ConverterRegistry) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case(README_STEM))
        && converters.supports(path)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
