//! Offset/count/total pagination.
//!
//! List endpoints answer with one page at a time:
//!
//! ```json
//! { "molts": [...], "count": 10, "offset": 20, "total": 25 }
//! ```
//!
//! [`Client::paginate`] walks the pages from a starting offset and returns
//! every item in server order once the list is complete.

use crate::{metadata::RequestMetadata, Client, Error, Response, Result};
use http::Method;
use serde_json::Value;

/// Consecutive failed page requests tolerated before giving up.
pub const DEFAULT_MAX_PAGE_FAILURES: usize = 3;

/// Describes a paginated list endpoint and how to walk it.
///
/// # Examples
///
/// ```
/// use crabber::Paginator;
///
/// let paginator = Paginator::new("/crabs/1/followers/", "crabs")
///     .limit(50)
///     .starting_offset(100);
/// assert_eq!(paginator.limit, 50);
/// ```
#[derive(Debug, Clone)]
pub struct Paginator {
    /// The list endpoint.
    pub endpoint: String,
    /// Caller-supplied values appended to the endpoint as escaped segments.
    pub path_segments: Vec<String>,
    /// Key of the item array in each page.
    pub item_key: String,
    /// Page size requested from the server.
    pub limit: u64,
    /// Offset of the first page.
    pub starting_offset: u64,
    /// Extra query parameters sent with every page request.
    pub query_params: Vec<(String, String)>,
    /// Consecutive rejected page requests after which the items gathered so
    /// far are returned.
    pub max_page_failures: usize,
}

impl Paginator {
    /// Creates a paginator with a page size of 10 starting at offset 0.
    pub fn new(endpoint: impl Into<String>, item_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            path_segments: Vec::new(),
            item_key: item_key.into(),
            limit: 10,
            starting_offset: 0,
            query_params: Vec::new(),
            max_page_failures: DEFAULT_MAX_PAGE_FAILURES,
        }
    }

    /// Appends a value to the endpoint as a single escaped path segment.
    pub fn with_path_segment(mut self, segment: impl Into<String>) -> Self {
        self.path_segments.push(segment.into());
        self
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the offset of the first page.
    pub fn starting_offset(mut self, offset: u64) -> Self {
        self.starting_offset = offset;
        self
    }

    /// Adds a query parameter sent with every page request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    /// Sets how many consecutive rejected pages are tolerated.
    pub fn max_page_failures(mut self, failures: usize) -> Self {
        self.max_page_failures = failures;
        self
    }

    fn page_request(&self, offset: u64) -> RequestMetadata {
        RequestMetadata::new(Method::GET, self.endpoint.clone())
            .with_path_segments(self.path_segments.iter().cloned())
            .with_query_params(self.query_params.iter().cloned())
            .with_query_param("offset", offset)
            .with_query_param("limit", self.limit)
    }
}

/// One decoded page.
#[derive(Debug)]
struct Page {
    items: Vec<Value>,
    count: u64,
    offset: u64,
    total: u64,
}

impl Page {
    fn parse(response: &Response, item_key: &str) -> Result<Self> {
        let mut body: Value = response.json()?;

        let malformed = |what: &str| Error::DeserializationFailed {
            raw_response: response.raw_body.clone(),
            serde_error: format!("page is missing `{what}`"),
            status: response.status,
        };

        let field = |body: &Value, key: &'static str| {
            body.get(key).and_then(Value::as_u64).ok_or_else(|| malformed(key))
        };
        let count = field(&body, "count")?;
        let offset = field(&body, "offset")?;
        let total = field(&body, "total")?;

        let items = match body.get_mut(item_key).map(Value::take) {
            Some(Value::Array(items)) => items,
            _ => return Err(malformed(item_key)),
        };

        Ok(Self {
            items,
            count,
            offset,
            total,
        })
    }

    /// Offset of the following page, or `None` if this page is the last.
    fn next_offset(&self) -> Option<u64> {
        if self.count == 0 {
            return None;
        }
        let next = self.offset.saturating_add(self.count);
        (next < self.total).then_some(next)
    }
}

impl Client {
    /// Fetches every page of a list endpoint and returns the raw items.
    ///
    /// Stops when a page reports no results or when `offset + count`
    /// reaches `total`. A page that would not move past the offset just
    /// requested also ends the walk with the items gathered so far. A page rejected with 400 or 404 is requested again;
    /// after `max_page_failures` consecutive rejections the items gathered
    /// so far are returned.
    ///
    /// # Errors
    ///
    /// Authentication failures and exhausted retries from the transport are
    /// propagated, as is a page that does not have the expected shape.
    pub async fn paginate(&self, paginator: &Paginator) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut offset = paginator.starting_offset;
        let mut failures = 0;

        loop {
            let response = self.call(paginator.page_request(offset)).await?;

            if !response.is_ok() {
                failures += 1;
                tracing::warn!(
                    endpoint = %paginator.endpoint,
                    status = response.status.as_u16(),
                    offset = offset,
                    failures = failures,
                    "Page request rejected"
                );
                if failures >= paginator.max_page_failures {
                    tracing::warn!(
                        endpoint = %paginator.endpoint,
                        collected = items.len(),
                        "Giving up on pagination, returning partial results"
                    );
                    return Ok(items);
                }
                continue;
            }
            failures = 0;

            let page = Page::parse(&response, &paginator.item_key)?;
            tracing::debug!(
                endpoint = %paginator.endpoint,
                offset = page.offset,
                count = page.count,
                total = page.total,
                "Received page"
            );

            let next_offset = page.next_offset();
            let page_offset = page.offset;
            items.extend(page.items);

            match next_offset {
                Some(next) if next <= offset => {
                    tracing::warn!(
                        endpoint = %paginator.endpoint,
                        requested_offset = offset,
                        reported_offset = page_offset,
                        collected = items.len(),
                        "Page offset did not advance, returning partial results"
                    );
                    return Ok(items);
                }
                Some(next) => offset = next,
                None => return Ok(items),
            }
        }
    }
}
