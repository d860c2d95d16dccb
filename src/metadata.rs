//! Request metadata and configuration types.

use crate::{Error, Result};
use http::Method;
use std::path::Path;

/// Metadata for one logical API request.
///
/// Endpoints are relative to the client's versioned prefix (`/api/v1` by
/// default) and are normalized to begin and end with `/` when the request is
/// sent, so `"crabs/1"` and `"/crabs/1/"` address the same resource.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method. Only GET, POST and DELETE are dispatched.
    pub method: Method,

    /// The endpoint path, relative to the versioned prefix.
    pub endpoint: String,

    /// Caller-supplied values appended to the endpoint, one escaped path
    /// segment each.
    pub path_segments: Vec<String>,

    /// Query parameters. Credentials are added by the client.
    pub query_params: Vec<(String, String)>,

    /// Form fields sent in the body of a POST.
    pub form_fields: Vec<(String, String)>,

    /// A file sent alongside the form fields of a POST.
    pub attachment: Option<Attachment>,

    /// Overrides the client's attempt bound for this request.
    pub max_attempts: Option<usize>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and endpoint.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            path_segments: Vec::new(),
            query_params: Vec::new(),
            form_fields: Vec::new(),
            attachment: None,
            max_attempts: None,
        }
    }

    /// Appends a value to the endpoint as a single path segment.
    ///
    /// Characters such as `/`, `?` and `#` are percent-encoded, so usernames
    /// and crabtags always address the resource they name.
    pub fn with_path_segment(mut self, segment: impl Into<String>) -> Self {
        self.path_segments.push(segment.into());
        self
    }

    /// Adds multiple path segments to the request.
    pub fn with_path_segments(mut self, segments: impl IntoIterator<Item = String>) -> Self {
        self.path_segments.extend(segments);
        self
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    /// Adds multiple query parameters to the request.
    pub fn with_query_params(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.query_params.extend(params);
        self
    }

    /// Adds a form field to the request body.
    pub fn with_form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form_fields.push((key.into(), value.into()));
        self
    }

    /// Attaches a file to the request body.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Overrides the attempt bound for this request only.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// The endpoint coerced to begin and end with a `/`.
    pub fn normalized_endpoint(&self) -> String {
        normalize_endpoint(&self.endpoint)
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}

/// Coerces an endpoint to begin and end with `/`.
///
/// # Examples
///
/// ```
/// use crabber::metadata::normalize_endpoint;
///
/// assert_eq!(normalize_endpoint("crabs/1"), "/crabs/1/");
/// assert_eq!(normalize_endpoint("/crabs/1/"), "/crabs/1/");
/// assert_eq!(normalize_endpoint(""), "/");
/// ```
pub fn normalize_endpoint(endpoint: &str) -> String {
    let mut normalized = String::with_capacity(endpoint.len() + 2);
    if !endpoint.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(endpoint);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// A named binary part of a multipart POST body.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Name of the multipart field.
    pub field: String,
    /// File name reported to the server.
    pub file_name: String,
    /// The file contents.
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Creates an attachment from bytes already in memory.
    pub fn new(field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Reads a local file into an `image` attachment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageNotFound`] if `path` is not an existing file,
    /// and [`Error::Io`] if it cannot be read.
    pub async fn image(path: &Path) -> Result<Self> {
        let is_file = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(Error::ImageNotFound(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self::new("image", file_name, bytes))
    }
}

/// Paging and filtering options for single-page list endpoints.
///
/// # Examples
///
/// ```
/// use crabber::ListOptions;
///
/// let opts = ListOptions::default().limit(25).since_id(1200);
/// assert_eq!(opts.limit, 25);
/// assert_eq!(opts.offset, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Maximum number of results to return. The server caps this at 50.
    pub limit: u32,
    /// How many results to skip before applying the limit.
    pub offset: u32,
    /// Only return molts posted after this UTC timestamp.
    pub since_ts: Option<i64>,
    /// Only return molts whose id is greater than this.
    pub since_id: Option<i64>,
}

impl ListOptions {
    /// Sets the result limit.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the offset.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Only returns molts posted after this UTC timestamp.
    pub fn since_ts(mut self, since_ts: i64) -> Self {
        self.since_ts = Some(since_ts);
        self
    }

    /// Only returns molts whose id is greater than this.
    pub fn since_id(mut self, since_id: i64) -> Self {
        self.since_id = Some(since_id);
        self
    }

    pub(crate) fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ];
        if let Some(since_ts) = self.since_ts {
            params.push(("since".to_string(), since_ts.to_string()));
        }
        if let Some(since_id) = self.since_id {
            params.push(("since_id".to_string(), since_id.to_string()));
        }
        params
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            since_ts: None,
            since_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("authenticate"), "/authenticate/");
        assert_eq!(normalize_endpoint("/molts/7"), "/molts/7/");
        assert_eq!(normalize_endpoint("molts/7/"), "/molts/7/");
        assert_eq!(normalize_endpoint("/"), "/");
    }

    #[test]
    fn test_list_options_query_params() {
        let params = ListOptions::default().since_ts(99).to_query_params();
        assert_eq!(
            params,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("offset".to_string(), "0".to_string()),
                ("since".to_string(), "99".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_image_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake_image.jpg");

        match Attachment::image(&path).await {
            Err(Error::ImageNotFound(missing)) => assert_eq!(missing, path),
            other => panic!("Expected ImageNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_image_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crab.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let attachment = Attachment::image(&path).await.unwrap();
        assert_eq!(attachment.field, "image");
        assert_eq!(attachment.file_name, "crab.png");
        assert_eq!(attachment.bytes, vec![0x89, b'P', b'N', b'G']);
    }
}
