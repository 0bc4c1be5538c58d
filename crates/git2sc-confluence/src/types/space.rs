//! Confluence space types.

use serde::Deserialize;

use super::page::{Links, Page};

/// Confluence space.
#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    /// Space key.
    pub key: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Links to fields that were not expanded.
    #[serde(rename = "_expandable", default)]
    pub expandable: SpaceExpandable,
}

/// Unexpanded space fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceExpandable {
    /// API path of the homepage (e.g. `/rest/api/content/372334010`).
    #[serde(default)]
    pub homepage: Option<String>,
}

impl Space {
    /// Homepage page ID, taken from the last segment of the homepage link.
    #[must_use]
    pub fn homepage_id(&self) -> Option<&str> {
        self.expandable
            .homepage
            .as_deref()
            .and_then(|link| link.trim_end_matches('/').rsplit('/').next())
            .filter(|id| !id.is_empty())
    }
}

/// One page of a content listing.
#[derive(Debug, Deserialize)]
pub struct PageList {
    /// Pages in this batch.
    #[serde(default)]
    pub results: Vec<Page>,
    /// Pagination links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

impl PageList {
    /// Whether Confluence reported another batch.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.links.as_ref().is_some_and(|l| l.next.is_some())
    }
}
