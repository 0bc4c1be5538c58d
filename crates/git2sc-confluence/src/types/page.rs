//! Confluence page types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ancestor fields that only carry transport metadata.
const TRANSPORT_FIELDS: [&str; 3] = ["_links", "_expandable", "extensions"];

/// Confluence page.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Content type (always "page").
    #[serde(rename = "type", default = "default_content_type")]
    pub content_type: String,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Version information (absent unless expanded).
    #[serde(default)]
    pub version: Option<Version>,
    /// Parent chain, root first; the last entry is the immediate parent.
    #[serde(default)]
    pub ancestors: Vec<Ancestor>,
    /// Page body content.
    #[serde(default)]
    pub body: Option<Body>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<Links>,
}

impl Page {
    /// ID of the immediate parent page.
    #[must_use]
    pub fn parent_id(&self) -> Option<&str> {
        self.ancestors.last().and_then(Ancestor::id)
    }

    /// Storage-format body, or `""` when not expanded.
    #[must_use]
    pub fn body_html(&self) -> &str {
        self.body
            .as_ref()
            .and_then(|b| b.storage.as_ref())
            .map_or("", |s| s.value.as_str())
    }
}

fn default_content_type() -> String {
    "page".to_owned()
}

/// Page version.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
}

/// Page body content.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Body {
    /// Storage format content.
    #[serde(default)]
    pub storage: Option<Storage>,
}

impl Body {
    /// Body holding `html` in storage representation.
    #[must_use]
    pub fn storage(html: impl Into<String>) -> Self {
        Self {
            storage: Some(Storage {
                value: html.into(),
                representation: "storage".to_owned(),
            }),
        }
    }
}

/// Storage format representation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    /// HTML content in Confluence storage format.
    pub value: String,
    /// Content representation (always "storage").
    pub representation: String,
}

/// Hypermedia links.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Links {
    /// Web UI link.
    #[serde(default)]
    pub webui: Option<String>,
    /// API self link.
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,
    /// Next page of a paginated listing.
    #[serde(default)]
    pub next: Option<String>,
}

/// Reference to a parent page as returned by Confluence.
///
/// Fields are kept verbatim so the reference can be echoed back on update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Ancestor(Map<String, Value>);

impl Ancestor {
    /// Ancestor pointing at `id`.
    #[must_use]
    pub fn with_id(id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_owned(), Value::String(id.to_owned()));
        Self(fields)
    }

    /// Page ID of the ancestor, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Copy without link references, expansion markers and extension payload.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let mut fields = self.0.clone();
        for key in TRANSPORT_FIELDS {
            fields.remove(key);
        }
        Self(fields)
    }

    /// Raw ancestor fields.
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sanitized_strips_transport_fields() {
        let ancestor: Ancestor = serde_json::from_value(json!({
            "id": "372274410",
            "type": "page",
            "title": "Parent",
            "_links": {"self": "https://wiki/rest/api/content/372274410"},
            "_expandable": {"container": "/rest/api/space/TST"},
            "extensions": {"position": "none"},
        }))
        .unwrap();

        let sanitized = ancestor.sanitized();

        assert_eq!(
            serde_json::to_value(&sanitized).unwrap(),
            json!({"id": "372274410", "type": "page", "title": "Parent"})
        );
        // Source is untouched
        assert!(ancestor.fields().contains_key("_links"));
    }

    #[test]
    fn test_sanitized_without_transport_fields() {
        let ancestor = Ancestor::with_id("1");
        assert_eq!(ancestor.sanitized(), ancestor);
    }

    #[test]
    fn test_page_from_listing_without_expansion() {
        let page: Page = serde_json::from_value(json!({
            "id": "371111110",
            "type": "page",
            "status": "current",
            "title": "Home",
        }))
        .unwrap();

        assert_eq!(page.id, "371111110");
        assert!(page.version.is_none());
        assert!(page.ancestors.is_empty());
        assert_eq!(page.parent_id(), None);
        assert_eq!(page.body_html(), "");
    }

    #[test]
    fn test_parent_id_is_last_ancestor() {
        let page: Page = serde_json::from_value(json!({
            "id": "3",
            "title": "Child",
            "version": {"number": 4},
            "ancestors": [{"id": "1"}, {"id": "2"}],
            "body": {"storage": {"value": "<p>x</p>", "representation": "storage"}},
        }))
        .unwrap();

        assert_eq!(page.parent_id(), Some("2"));
        assert_eq!(page.body_html(), "<p>x</p>");
        assert_eq!(page.content_type, "page");
    }
}
