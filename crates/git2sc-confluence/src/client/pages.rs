//! Page and space operations for Confluence API.

use std::collections::HashMap;

use serde_json::json;
use tracing::{debug, info};

use super::{ConfluenceClient, Method, Transport};
use crate::error::ConfluenceError;
use crate::types::{Ancestor, Body, Page, PageList, Space, Version};

/// Fields expanded when reading pages.
const PAGE_EXPAND: &str = "ancestors,body.storage,version";

/// Batch size for space listings.
const LIST_LIMIT: usize = 100;

/// Status Confluence answers to successful reads and writes.
const STATUS_OK: u16 = 200;

/// Status Confluence answers to a successful delete.
const STATUS_NO_CONTENT: u16 = 204;

impl<T: Transport> ConfluenceClient<T> {
    /// Fetch a page with ancestors, body and version, and cache it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Remote`] if Confluence does not answer 200.
    pub fn fetch_page(&mut self, page_id: &str) -> Result<&Page, ConfluenceError> {
        let url = format!("{}?expand={PAGE_EXPAND}", self.content_url(page_id));
        debug!("Getting page {}", page_id);

        let body = self.call(Method::Get, url, None, STATUS_OK)?;
        let page: Page = serde_json::from_str(&body)?;

        self.pages.insert(page_id.to_owned(), page);
        Ok(&self.pages[page_id])
    }

    /// Resolve a space key to the ID of its homepage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Remote`] if Confluence does not answer 200,
    /// or [`ConfluenceError::UnexpectedResponse`] if the space has no homepage link.
    pub fn fetch_space_homepage(&self, space_key: &str) -> Result<String, ConfluenceError> {
        let url = format!("{}/space/{}", self.api_url, space_key);
        debug!("Getting space {}", space_key);

        let body = self.call(Method::Get, url, None, STATUS_OK)?;
        let space: Space = serde_json::from_str(&body)?;

        space.homepage_id().map(str::to_owned).ok_or_else(|| {
            ConfluenceError::UnexpectedResponse(format!("space {space_key} has no homepage"))
        })
    }

    /// List every page of a space, replacing the whole page cache.
    ///
    /// Follows pagination until Confluence stops reporting a next batch.
    /// The cache is left untouched if any request fails.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Remote`] if Confluence does not answer 200.
    pub fn fetch_space_pages(
        &mut self,
        space_key: &str,
    ) -> Result<&HashMap<String, Page>, ConfluenceError> {
        let mut pages = HashMap::new();
        let mut start = 0;

        loop {
            let url = format!(
                "{}/content?spaceKey={}&expand={PAGE_EXPAND}&start={start}&limit={LIST_LIMIT}",
                self.api_url, space_key
            );
            debug!("Listing pages of space {} from {}", space_key, start);

            let body = self.call(Method::Get, url, None, STATUS_OK)?;
            let batch: PageList = serde_json::from_str(&body)?;
            let has_next = batch.has_next();
            let count = batch.results.len();

            for page in batch.results {
                pages.insert(page.id.clone(), page);
            }

            if !has_next || count == 0 {
                break;
            }
            start += count;
        }

        info!("Space {} has {} pages", space_key, pages.len());
        self.pages = pages;
        Ok(&self.pages)
    }

    /// Cached page with version information, fetching it on a miss.
    ///
    /// Pages cached from an unexpanded listing are fetched again.
    ///
    /// # Errors
    ///
    /// Returns the error of the underlying fetch.
    pub fn cached_or_fetch(&mut self, page_id: &str) -> Result<&mut Page, ConfluenceError> {
        let needs_fetch = self
            .pages
            .get(page_id)
            .is_none_or(|page| page.version.is_none());
        if needs_fetch {
            self.fetch_page(page_id)?;
        }

        self.pages.get_mut(page_id).ok_or_else(|| {
            ConfluenceError::UnexpectedResponse(format!("page {page_id} missing from cache"))
        })
    }

    /// Replace the body (and optionally the title) of an existing page.
    ///
    /// Sends the cached version plus one and the immediate parent stripped of
    /// transport-only fields. The cached title is changed before the request
    /// is sent; the cached version and body only after it succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Remote`] if the fetch or the update fails.
    pub fn update_page(
        &mut self,
        page_id: &str,
        html: &str,
        title: Option<&str>,
    ) -> Result<(), ConfluenceError> {
        self.write_page(page_id, html, title, None)
    }

    /// Replace the body of an existing page and place it below `parent_id`.
    ///
    /// The cached ancestors point at the new parent once the update succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Remote`] if the fetch or the update fails.
    pub fn update_page_below(
        &mut self,
        page_id: &str,
        html: &str,
        parent_id: &str,
    ) -> Result<(), ConfluenceError> {
        self.write_page(page_id, html, None, Some(parent_id))
    }

    fn write_page(
        &mut self,
        page_id: &str,
        html: &str,
        title: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<(), ConfluenceError> {
        let page = self.cached_or_fetch(page_id)?;

        let current = page.version.as_ref().map(|v| v.number).ok_or_else(|| {
            ConfluenceError::UnexpectedResponse(format!("page {page_id} has no version"))
        })?;
        let version = current + 1;

        if let Some(title) = title {
            title.clone_into(&mut page.title);
        }

        let mut payload = json!({
            "id": page_id,
            "type": "page",
            "title": page.title,
            "version": {"number": version},
            "body": {
                "storage": {
                    "representation": "storage",
                    "value": html
                }
            }
        });

        if let Some(parent_id) = parent_id {
            payload["ancestors"] = json!([Ancestor::with_id(parent_id)]);
        } else if let Some(parent) = page.ancestors.last() {
            payload["ancestors"] = json!([parent.sanitized()]);
        }

        info!(
            "Updating page {} from version {} to {}",
            page_id, current, version
        );

        self.call(
            Method::Put,
            self.content_url(page_id),
            Some(&payload),
            STATUS_OK,
        )?;

        if let Some(page) = self.pages.get_mut(page_id) {
            page.version = Some(Version { number: version });
            page.body = Some(Body::storage(html));
            if let Some(parent_id) = parent_id
                && page.parent_id() != Some(parent_id)
            {
                page.ancestors = vec![Ancestor::with_id(parent_id)];
            }
        }
        Ok(())
    }

    /// Create a page in a space, optionally below a parent page.
    ///
    /// Returns the ID Confluence assigned to the new page.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Remote`] if Confluence does not answer 200.
    pub fn create_page(
        &mut self,
        space_key: &str,
        title: &str,
        html: &str,
        parent_id: Option<&str>,
    ) -> Result<String, ConfluenceError> {
        let mut payload = json!({
            "type": "page",
            "title": title,
            "space": {"key": space_key},
            "body": {
                "storage": {
                    "value": html,
                    "representation": "storage"
                }
            }
        });

        if let Some(parent_id) = parent_id {
            payload["ancestors"] = json!([{"id": parent_id}]);
        }

        info!(
            "Creating page '{}' in space {} (parent={})",
            title,
            space_key,
            parent_id.unwrap_or("none")
        );

        let url = format!("{}/content", self.api_url);
        let body = self.call(Method::Post, url, Some(&payload), STATUS_OK)?;
        let mut page: Page = serde_json::from_str(&body)?;
        let page_id = page.id.clone();

        // Keep the cache usable for title lookups when the response is sparse
        if page.title.is_empty() {
            title.clone_into(&mut page.title);
        }
        if page.ancestors.is_empty()
            && let Some(parent_id) = parent_id
        {
            page.ancestors.push(Ancestor::with_id(parent_id));
        }

        info!("Created page '{}' with id {}", title, page_id);
        self.pages.insert(page_id.clone(), page);
        Ok(page_id)
    }

    /// Delete a page and evict it from the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError::Remote`] unless Confluence answers exactly 204.
    pub fn delete_page(&mut self, page_id: &str) -> Result<(), ConfluenceError> {
        info!("Deleting page {}", page_id);

        self.call(
            Method::Delete,
            self.content_url(page_id),
            None,
            STATUS_NO_CONTENT,
        )?;

        self.pages.remove(page_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::mock::MockTransport;

    const API_URL: &str = "https://confluence.example.com/wiki/rest/api";

    fn client(transport: MockTransport) -> ConfluenceClient<MockTransport> {
        ConfluenceClient::with_transport(API_URL, transport)
    }

    fn cached_page_json() -> Value {
        json!({
            "id": "372274410",
            "type": "page",
            "title": "Test page title",
            "version": {"number": 1},
            "ancestors": [
                {
                    "id": "372000000",
                    "_links": {"self": "link"},
                    "_expandable": {"container": "expandable"},
                    "extensions": {"position": "none"},
                }
            ]
        })
    }

    fn seed_cache(client: &mut ConfluenceClient<MockTransport>, page: Value) {
        let page: Page = serde_json::from_value(page).unwrap();
        client.pages.insert(page.id.clone(), page);
    }

    #[test]
    fn test_new_client_has_empty_cache() {
        let client = client(MockTransport::new());
        assert!(client.pages().is_empty());
        assert_eq!(client.api_url(), API_URL);
    }

    #[test]
    fn test_fetch_page() {
        let transport = MockTransport::new().with_json(200, cached_page_json());
        let mut client = client(transport);

        let page = client.fetch_page("372274410").unwrap();
        assert_eq!(page.title, "Test page title");

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Get);
        assert_eq!(
            requests[0].url,
            format!("{API_URL}/content/372274410?expand=ancestors,body.storage,version")
        );
        assert!(client.cached_page("372274410").is_some());
    }

    #[test]
    fn test_fetch_page_error() {
        let transport = MockTransport::new().with_json(
            404,
            json!({"statusCode": 404, "message": "No content found with id: 1"}),
        );
        let mut client = client(transport);

        let err = client.fetch_page("1").unwrap_err();

        assert_eq!(err.to_string(), "Error 404: No content found with id: 1");
        assert!(client.pages().is_empty());
    }

    #[test]
    fn test_fetch_space_homepage() {
        let transport = MockTransport::new().with_json(
            200,
            json!({"key": "TST", "_expandable": {"homepage": "/rest/api/content/372334010"}}),
        );
        let client = client(transport);

        let homepage = client.fetch_space_homepage("TST").unwrap();

        assert_eq!(homepage, "372334010");
        assert_eq!(
            client.transport().requests()[0].url,
            format!("{API_URL}/space/TST")
        );
    }

    #[test]
    fn test_fetch_space_homepage_error() {
        let transport = MockTransport::new().with_json(
            404,
            json!({"statusCode": 404, "message": "No space with key : TST"}),
        );
        let err = client(transport).fetch_space_homepage("TST").unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_fetch_space_pages() {
        let transport = MockTransport::new().with_json(
            200,
            json!({
                "results": [
                    {"id": "371111110", "type": "page", "status": "current"},
                    {"id": "372222220", "type": "page", "status": "current"},
                ]
            }),
        );
        let mut client = client(transport);

        let pages = client.fetch_space_pages("TST").unwrap();

        let mut ids: Vec<_> = pages.keys().cloned().collect();
        ids.sort();
        assert_eq!(ids, vec!["371111110", "372222220"]);
        assert_eq!(
            client.transport().requests()[0].url,
            format!(
                "{API_URL}/content?spaceKey=TST&expand=ancestors,body.storage,version&start=0&limit=100"
            )
        );
    }

    #[test]
    fn test_fetch_space_pages_replaces_cache() {
        let transport = MockTransport::new()
            .with_json(200, json!({"results": [{"id": "1"}, {"id": "2"}]}))
            .with_json(200, json!({"results": [{"id": "3"}]}));
        let mut client = client(transport);

        client.fetch_space_pages("TST").unwrap();
        client.fetch_space_pages("TST").unwrap();

        let ids: Vec<_> = client.pages().keys().cloned().collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn test_fetch_space_pages_follows_pagination() {
        let transport = MockTransport::new()
            .with_json(
                200,
                json!({
                    "results": [{"id": "1"}, {"id": "2"}],
                    "_links": {"next": "/rest/api/content?spaceKey=TST&start=2"},
                }),
            )
            .with_json(200, json!({"results": [{"id": "3"}], "_links": {}}));
        let mut client = client(transport);

        assert_eq!(client.fetch_space_pages("TST").unwrap().len(), 3);

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].url.ends_with("&start=2&limit=100"));
    }

    #[test]
    fn test_fetch_space_pages_error_keeps_cache() {
        let transport = MockTransport::new()
            .with_json(200, json!({"results": [{"id": "1"}]}))
            .with_json(403, json!({"statusCode": 403, "message": "Forbidden"}));
        let mut client = client(transport);

        client.fetch_space_pages("TST").unwrap();
        assert!(client.fetch_space_pages("TST").is_err());

        assert!(client.cached_page("1").is_some());
    }

    #[test]
    fn test_update_page() {
        let transport = MockTransport::new().with_json(200, json!({"id": "372274410"}));
        let mut client = client(transport);
        seed_cache(&mut client, cached_page_json());

        client
            .update_page("372274410", "<p> This is a test </p>", None)
            .unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Put);
        assert_eq!(requests[0].url, format!("{API_URL}/content/372274410"));
        assert_eq!(
            client.transport().json_body(0),
            json!({
                "id": "372274410",
                "type": "page",
                "title": "Test page title",
                "version": {"number": 2},
                "ancestors": [{"id": "372000000"}],
                "body": {
                    "storage": {
                        "representation": "storage",
                        "value": "<p> This is a test </p>"
                    }
                }
            })
        );
    }

    #[test]
    fn test_update_page_below_moves_page() {
        let transport = MockTransport::new().with_json(200, json!({"id": "372274410"}));
        let mut client = client(transport);
        seed_cache(&mut client, cached_page_json());

        client
            .update_page_below("372274410", "<p>moved</p>", "50")
            .unwrap();

        let body = client.transport().json_body(0);
        assert_eq!(body["ancestors"], json!([{"id": "50"}]));
        assert_eq!(body["version"]["number"], 2);
        assert_eq!(body["title"], "Test page title");
        assert_eq!(
            client.cached_page("372274410").unwrap().parent_id(),
            Some("50")
        );
    }

    #[test]
    fn test_update_page_fetches_uncached_page_once() {
        let transport = MockTransport::new()
            .with_json(200, cached_page_json())
            .with_json(200, json!({"id": "372274410"}));
        let mut client = client(transport);

        client.update_page("372274410", "<p>x</p>", None).unwrap();

        let methods: Vec<_> = client
            .transport()
            .requests()
            .iter()
            .map(|r| r.method)
            .collect();
        assert_eq!(methods, vec![Method::Get, Method::Put]);
    }

    #[test]
    fn test_update_page_refetches_page_without_version() {
        let transport = MockTransport::new()
            .with_json(200, cached_page_json())
            .with_json(200, json!({"id": "372274410"}));
        let mut client = client(transport);
        seed_cache(&mut client, json!({"id": "372274410", "title": "Listed"}));

        client.update_page("372274410", "<p>x</p>", None).unwrap();

        assert_eq!(client.transport().requests_with(Method::Get).len(), 1);
        assert_eq!(client.transport().json_body(1)["version"]["number"], 2);
    }

    #[test]
    fn test_update_page_with_title() {
        let transport = MockTransport::new().with_json(200, json!({"id": "372274410"}));
        let mut client = client(transport);
        seed_cache(&mut client, cached_page_json());

        client
            .update_page("372274410", "<p>x</p>", Some("new title"))
            .unwrap();

        assert_eq!(client.cached_page("372274410").unwrap().title, "new title");
        assert_eq!(client.transport().json_body(0)["title"], "new title");
    }

    #[test]
    fn test_consecutive_updates_increment_version() {
        let transport = MockTransport::new()
            .with_json(200, json!({"id": "372274410"}))
            .with_json(200, json!({"id": "372274410"}));
        let mut client = client(transport);
        seed_cache(&mut client, cached_page_json());

        client.update_page("372274410", "<p>1</p>", None).unwrap();
        client.update_page("372274410", "<p>2</p>", None).unwrap();

        assert_eq!(client.transport().json_body(0)["version"]["number"], 2);
        assert_eq!(client.transport().json_body(1)["version"]["number"], 3);
    }

    #[test]
    fn test_failed_update_keeps_title_change_but_not_version() {
        let transport = MockTransport::new().with_json(
            409,
            json!({"statusCode": 409, "message": "Version must be incremented on update"}),
        );
        let mut client = client(transport);
        seed_cache(&mut client, cached_page_json());

        let err = client
            .update_page("372274410", "<p>x</p>", Some("new title"))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error 409: Version must be incremented on update"
        );
        let page = client.cached_page("372274410").unwrap();
        assert_eq!(page.title, "new title");
        assert_eq!(page.version.as_ref().unwrap().number, 1);
    }

    #[test]
    fn test_update_top_level_page_omits_ancestors() {
        let transport = MockTransport::new().with_json(200, json!({"id": "1"}));
        let mut client = client(transport);
        seed_cache(
            &mut client,
            json!({"id": "1", "title": "Home", "version": {"number": 7}, "ancestors": []}),
        );

        client.update_page("1", "<p>x</p>", None).unwrap();

        let body = client.transport().json_body(0);
        assert!(body.get("ancestors").is_none());
        assert_eq!(body["version"]["number"], 8);
    }

    #[test]
    fn test_create_page_as_parent() {
        let transport = MockTransport::new().with_json(
            200,
            json!({"id": "380000001", "title": "new title", "version": {"number": 1}}),
        );
        let mut client = client(transport);

        let id = client
            .create_page("TST", "new title", "<p> This is a new page </p>", None)
            .unwrap();

        assert_eq!(id, "380000001");
        let requests = client.transport().requests();
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].url, format!("{API_URL}/content"));
        assert_eq!(
            client.transport().json_body(0),
            json!({
                "type": "page",
                "title": "new title",
                "space": {"key": "TST"},
                "body": {
                    "storage": {
                        "value": "<p> This is a new page </p>",
                        "representation": "storage"
                    }
                }
            })
        );
        assert!(client.cached_page("380000001").is_some());
    }

    #[test]
    fn test_create_page_as_child() {
        let transport = MockTransport::new().with_json(200, json!({"id": "380000002"}));
        let mut client = client(transport);

        client
            .create_page("TST", "new title", "<p>child</p>", Some("372274410"))
            .unwrap();

        assert_eq!(
            client.transport().json_body(0)["ancestors"],
            json!([{"id": "372274410"}])
        );
        let cached = client.cached_page("380000002").unwrap();
        assert_eq!(cached.title, "new title");
        assert_eq!(cached.parent_id(), Some("372274410"));
    }

    #[test]
    fn test_create_page_error() {
        let transport = MockTransport::new().with_json(
            400,
            json!({"statusCode": 400, "message": "A page with this title already exists"}),
        );
        let mut client = client(transport);

        let err = client
            .create_page("TST", "Dup", "<p/>", None)
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(client.pages().is_empty());
    }

    #[test]
    fn test_delete_page() {
        let transport = MockTransport::new().with_response(204, "");
        let mut client = client(transport);
        seed_cache(&mut client, cached_page_json());

        client.delete_page("372274410").unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests[0].method, Method::Delete);
        assert_eq!(requests[0].url, format!("{API_URL}/content/372274410"));
        assert!(requests[0].body.is_none());
        assert!(client.cached_page("372274410").is_none());
    }

    #[test]
    fn test_delete_page_requires_204() {
        let transport = MockTransport::new().with_json(
            404,
            json!({"statusCode": 404, "message": "No content found with id: 372274410"}),
        );
        let mut client = client(transport);

        let err = client.delete_page("372274410").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error 404: No content found with id: 372274410"
        );
    }

    #[test]
    fn test_delete_page_rejects_200() {
        let transport = MockTransport::new().with_response(200, "");
        let err = client(transport).delete_page("1").unwrap_err();
        assert!(matches!(err, ConfluenceError::Remote { status: 200, .. }));
    }
}
