//! Cursor pagination over Calendly collection endpoints.
//!
//! Calendly list responses look like:
//!
//! ```json
//! {
//!   "collection": [ { "uri": "...", ... }, ... ],
//!   "pagination": { "next_page": "https://api.calendly.com/...?page_token=..." }
//! }
//! ```
//!
//! [`Pages`] walks that chain lazily: the first page is supplied by the
//! caller, and each following page is fetched with a plain `GET` on the
//! previous page's `next_page` URL only when the iterator is advanced. A
//! `next_page` that is absent, `null`, empty or the string `"null"` ends the
//! chain.
//!
//! There is no page cap. Termination depends on the service eventually
//! returning an empty cursor.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ApiResult, CalendlyError};
use crate::request::Requester;

/// An opaque collection record.
pub type Record = Map<String, Value>;

/// One page of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    /// Records on this page, in server order.
    #[serde(default)]
    pub collection: Vec<Record>,
    /// Cursor information.
    #[serde(default)]
    pub pagination: Pagination,
}

/// The `pagination` block of a collection response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pagination {
    /// Number of records requested per page.
    #[serde(default)]
    pub count: Option<u64>,
    /// Absolute URL of the next page, if any.
    #[serde(default, deserialize_with = "cursor")]
    pub next_page: Option<String>,
    /// Absolute URL of the previous page, if any.
    #[serde(default, deserialize_with = "cursor")]
    pub previous_page: Option<String>,
    /// Token for the next page, if any.
    #[serde(default, deserialize_with = "cursor")]
    pub next_page_token: Option<String>,
    /// Token for the previous page, if any.
    #[serde(default, deserialize_with = "cursor")]
    pub previous_page_token: Option<String>,
}

impl Page {
    /// Decodes a page from a JSON response body.
    pub fn from_value(value: Value) -> ApiResult<Self> {
        serde_json::from_value(value).map_err(|e| {
            CalendlyError::invalid_response(format!("invalid collection page: {}", e))
                .with_source(e)
        })
    }

    /// Returns the next page URL, if any.
    pub fn next_page(&self) -> Option<&str> {
        self.pagination.next_page.as_deref()
    }
}

/// Normalizes every "no more pages" spelling to `None`.
fn cursor<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() && s != "null" => Some(s),
        _ => None,
    })
}

/// Lazy iterator over a chain of pages.
///
/// Yields the first page as given, then fetches each `next_page` on demand.
/// After an error the iterator is exhausted.
#[derive(Debug)]
pub struct Pages<'a> {
    requester: &'a Requester,
    first: Option<Page>,
    next_url: Option<String>,
    fetched: usize,
}

impl<'a> Pages<'a> {
    /// Starts a traversal at `first`.
    pub fn new(requester: &'a Requester, first: Page) -> Self {
        Self {
            requester,
            first: Some(first),
            next_url: None,
            fetched: 0,
        }
    }

    /// Number of pages fetched through the cursor so far (the first page is not counted).
    pub fn fetched(&self) -> usize {
        self.fetched
    }
}

impl Iterator for Pages<'_> {
    type Item = ApiResult<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(page) = self.first.take() {
            self.next_url = page.pagination.next_page.clone();
            return Some(Ok(page));
        }

        let url = self.next_url.take()?;
        debug!(url = %url, fetched = self.fetched, "following next_page cursor");
        self.fetched += 1;

        let page = self
            .requester
            .get(&url, None)
            .and_then(Page::from_value);

        if let Ok(ref page) = page {
            self.next_url = page.pagination.next_page.clone();
        }
        Some(page)
    }
}

/// Collects every record of every page, in page order.
pub fn collect_all(requester: &Requester, first: Page) -> ApiResult<Vec<Record>> {
    let mut records = Vec::new();
    let mut pages = Pages::new(requester, first);

    for page in pages.by_ref() {
        records.extend(page?.collection);
    }

    debug!(
        records = records.len(),
        pages = pages.fetched() + 1,
        "collected all pages"
    );
    Ok(records)
}

/// Returns the first record matching `predicate`, scanning page by page.
///
/// Stops fetching as soon as a match is found.
pub fn find_record<P>(requester: &Requester, first: Page, mut predicate: P) -> ApiResult<Option<Record>>
where
    P: FnMut(&Record) -> bool,
{
    for page in Pages::new(requester, first) {
        if let Some(record) = page?.collection.into_iter().find(|r| predicate(r)) {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

/// Returns the first record whose `uri` field equals `uri`.
pub fn find_by_uri(requester: &Requester, first: Page, uri: &str) -> ApiResult<Option<Record>> {
    find_record(requester, first, |record| {
        record.get("uri").and_then(Value::as_str) == Some(uri)
    })
}
