//! Crabber client: transport with retry, cache-aware lookups, and the
//! authenticated actions that do not hang off a particular object.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure and connect one.

use crate::{
    bio::Bio,
    cache::{record_id, EntityCache, EntityId, Lookup},
    crab::Crab,
    metadata::{Attachment, ListOptions, RequestMetadata},
    molt::Molt,
    pagination::Paginator,
    retry::{ResponseClass, RetryPolicy},
    Error, Response, Result,
};
use http::Method;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use url::Url;

/// Default instance the client connects to.
pub const DEFAULT_BASE_URL: &str = "https://crabber.net";

/// Versioned prefix prepended to every endpoint.
pub const DEFAULT_BASE_ENDPOINT: &str = "/api/v1";

/// Default maximum number of characters in a molt.
pub const DEFAULT_CHARACTER_LIMIT: usize = 280;

/// Default upper bound on a single attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A connected session with one Crabber instance.
///
/// The client is a cheap handle: clones share the same credentials and the
/// same entity caches. Separately built clients never share cache state.
///
/// # Examples
///
/// ```no_run
/// use crabber::Client;
///
/// # async fn example() -> Result<(), crabber::Error> {
/// let client = Client::builder()
///     .api_key("7f94ebd306f12fe13e983fe0fb78b696")
///     .access_token("16c24b2e825acfb6af191d66c46e2369")
///     .build()
///     .await?;
///
/// if let Some(crab) = client.get_crab_by_username("jake").await? {
///     println!("{} has {} followers", crab.display_name(), crab.follower_count());
/// }
///
/// if let Some(molt) = client.post_molt("Hello from Rust!", None).await? {
///     println!("posted molt {}", molt.id());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    base_endpoint: String,
    api_key: String,
    access_token: RwLock<Option<String>>,
    retry_policy: RetryPolicy,
    timeout: Duration,
    character_limit: usize,
    current_crab: RwLock<Option<Arc<Crab>>>,
    crabs: EntityCache<Crab>,
    molts: EntityCache<Molt>,
}

/// A domain type the client caches by id.
pub(crate) trait Entity: Sized {
    /// Name used in errors and logs.
    const KIND: &'static str;

    /// Builds the object from a non-empty record.
    fn from_record(record: Value, client: &Client) -> Result<Self>;

    /// The cache holding objects of this kind.
    fn cache(inner: &ClientInner) -> &EntityCache<Self>;
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn from_inner(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// The base URL of the connected instance, without a trailing `/`.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The configured molt character limit.
    pub fn character_limit(&self) -> usize {
        self.inner.character_limit
    }

    /// The access token currently attached to requests, if any.
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .access_token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The crab the access token belongs to, once [`Client::authenticate`]
    /// has succeeded.
    pub fn current_crab(&self) -> Option<Arc<Crab>> {
        self.inner
            .current_crab
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Makes a request, retrying inconclusive failures.
    ///
    /// The endpoint is normalized and appended to the base URL and versioned
    /// prefix; the api key and, when set, the access token are added to the
    /// query string. Successful responses and definitive client outcomes
    /// (400, 404) are returned for the caller to inspect. A 401 fails at
    /// once. Anything else, transport errors included, consumes one attempt.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedMethod`] for verbs other than GET, POST and DELETE
    /// - [`Error::AuthenticationFailed`] on a 401
    /// - [`Error::MaxAttemptsExceeded`] once the attempt bound is reached
    pub async fn call(&self, metadata: RequestMetadata) -> Result<Response> {
        if !matches!(metadata.method, Method::GET | Method::POST | Method::DELETE) {
            return Err(Error::UnsupportedMethod(metadata.method));
        }

        let url = self.request_url(&metadata)?;
        let max_attempts = self.inner.retry_policy.attempts_for(metadata.max_attempts);
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let result = match self.execute_request(&metadata, url.clone(), attempt).await {
                Ok(response) => self.classify_response(response, start_time, attempt).await,
                Err(e) => Err(e),
            };

            let error = match result {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_retryable() => {
                    tracing::error!(
                        error = %e,
                        attempt = attempt,
                        method = %metadata.method,
                        endpoint = %metadata.endpoint,
                        "Request failed permanently"
                    );
                    return Err(e);
                }
                Err(e) => e,
            };

            tracing::warn!(
                error = %error,
                attempt = attempt,
                max_attempts = max_attempts,
                method = %metadata.method,
                endpoint = %metadata.endpoint,
                "Request failed"
            );

            if attempt >= max_attempts {
                return Err(Error::MaxAttemptsExceeded {
                    attempts: attempt,
                    last_error: Box::new(error),
                });
            }

            let delay = self.inner.retry_policy.backoff.delay_for_retry(attempt);
            if !delay.is_zero() {
                tracing::info!(
                    delay_ms = delay.as_millis(),
                    attempt = attempt,
                    "Retrying request after delay"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// Makes a GET request to the given endpoint.
    pub async fn get(&self, endpoint: impl Into<String>) -> Result<Response> {
        self.call(RequestMetadata::new(Method::GET, endpoint)).await
    }

    /// Makes a POST request with form fields.
    pub async fn post(
        &self,
        endpoint: impl Into<String>,
        form_fields: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Response> {
        let mut metadata = RequestMetadata::new(Method::POST, endpoint);
        metadata.form_fields.extend(form_fields);
        self.call(metadata).await
    }

    /// Makes a DELETE request to the given endpoint.
    pub async fn delete(&self, endpoint: impl Into<String>) -> Result<Response> {
        self.call(RequestMetadata::new(Method::DELETE, endpoint)).await
    }

    fn request_url(&self, metadata: &RequestMetadata) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}{}{}",
            self.inner.base_url,
            self.inner.base_endpoint,
            metadata.normalized_endpoint()
        ))?;

        if !metadata.path_segments.is_empty() {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::ConfigurationError(format!("{} cannot carry a path", self.inner.base_url))
            })?;
            segments
                .pop_if_empty()
                .extend(&metadata.path_segments)
                .push("");
        }

        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &metadata.query_params {
                query.append_pair(key, value);
            }
            query.append_pair("api_key", &self.inner.api_key);
            if let Some(token) = self.access_token() {
                query.append_pair("access_token", &token);
            }
        }

        Ok(url)
    }

    /// Executes a single request attempt.
    async fn execute_request(
        &self,
        metadata: &RequestMetadata,
        url: Url,
        attempt: usize,
    ) -> Result<reqwest::Response> {
        tracing::debug!(
            method = %metadata.method,
            endpoint = %metadata.endpoint,
            attempt = attempt,
            "Executing HTTP request"
        );

        let http = &self.inner.http_client;
        let mut request = match metadata.method {
            Method::GET => http.get(url),
            Method::DELETE => http.delete(url),
            Method::POST => {
                let request = http.post(url);
                if let Some(attachment) = &metadata.attachment {
                    let mut form = reqwest::multipart::Form::new();
                    for (key, value) in &metadata.form_fields {
                        form = form.text(key.clone(), value.clone());
                    }
                    let part = reqwest::multipart::Part::bytes(attachment.bytes.clone())
                        .file_name(attachment.file_name.clone());
                    request.multipart(form.part(attachment.field.clone(), part))
                } else if metadata.form_fields.is_empty() {
                    request
                } else {
                    request.form(&metadata.form_fields)
                }
            }
            ref other => return Err(Error::UnsupportedMethod(other.clone())),
        };

        request = request.timeout(self.inner.timeout);

        request.send().await.map_err(transport_error)
    }

    /// Sorts a raw response into a returnable response or an error.
    async fn classify_response(
        &self,
        response: reqwest::Response,
        start_time: Instant,
        attempts: usize,
    ) -> Result<Response> {
        let status = response.status();
        let headers = response.headers().clone();
        let latency = start_time.elapsed();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            attempts = attempts,
            "Received HTTP response"
        );

        let raw_body = response.text().await.map_err(transport_error)?;

        match ResponseClass::of(status) {
            ResponseClass::Complete => Ok(Response::new(
                raw_body, status, headers, latency, attempts,
            )),
            ResponseClass::Unauthorized => Err(Error::AuthenticationFailed {
                status,
                raw_response: raw_body,
            }),
            ResponseClass::Retry => Err(Error::HttpError {
                status,
                raw_response: raw_body,
                headers,
            }),
        }
    }

    /// Verifies the base URL points at a Crabber instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionCheckFailed`] if the versioned root does not
    /// answer with a success status.
    pub async fn check_connection(&self) -> Result<()> {
        let response = self.get("/").await?;
        if response.is_ok() {
            Ok(())
        } else {
            Err(Error::ConnectionCheckFailed {
                status: response.status,
            })
        }
    }

    /// Sets the access token used by every later request and resolves the
    /// crab it belongs to.
    ///
    /// Returns whether the server accepted the token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthenticationFailed`] if the server answers 401.
    pub async fn authenticate(&self, access_token: impl Into<String>) -> Result<bool> {
        *self
            .inner
            .access_token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(access_token.into());

        let response = self.get("/authenticate/").await?;
        if !response.is_ok() {
            tracing::warn!(status = response.status.as_u16(), "Authentication rejected");
            return Ok(false);
        }

        let crab = self.objectify::<Crab>(response.json()?)?;
        if let Some(crab) = &crab {
            tracing::info!(username = %crab.username(), "Authenticated");
        }
        *self
            .inner
            .current_crab
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = crab;
        Ok(true)
    }

    pub(crate) fn require_access_token(&self) -> Result<()> {
        match self.access_token() {
            Some(_) => Ok(()),
            None => Err(Error::MissingAccessToken),
        }
    }

    /// Turns a raw record into the canonical object for its id.
    ///
    /// If an object with the same id is already cached it is returned and
    /// `record` is discarded. An id the server reported as not found stays
    /// absent and yields `None`.
    pub(crate) fn objectify<T: Entity>(&self, record: Value) -> Result<Option<Arc<T>>> {
        let id = record_id(&record, T::KIND)?;
        T::cache(&self.inner).get_or_insert_with(id, || T::from_record(record, self))
    }

    /// Returns the canonical [`Crab`] for a raw crab record, or `None` if
    /// the id is known to be absent.
    pub fn objectify_crab(&self, record: Value) -> Result<Option<Arc<Crab>>> {
        self.objectify(record)
    }

    /// Returns the canonical [`Molt`] for a raw molt record, or `None` if
    /// the id is known to be absent.
    pub fn objectify_molt(&self, record: Value) -> Result<Option<Arc<Molt>>> {
        self.objectify(record)
    }

    fn objectify_all<T: Entity>(&self, records: Vec<Value>) -> Result<Vec<Arc<T>>> {
        records
            .into_iter()
            .filter_map(|record| self.objectify(record).transpose())
            .collect()
    }

    /// Resolves a by-id lookup response, remembering ids the server does not
    /// know.
    fn resolve<T: Entity>(&self, id: EntityId, response: &Response) -> Result<Option<Arc<T>>> {
        if response.is_ok() {
            return self.objectify(response.json()?);
        }
        if response.is_not_found() {
            T::cache(&self.inner).mark_absent(id);
        }
        Ok(None)
    }

    /// Gets a crab by id, from cache when possible.
    pub async fn get_crab(&self, crab_id: EntityId) -> Result<Option<Arc<Crab>>> {
        match self.inner.crabs.lookup(crab_id) {
            Lookup::Present(crab) => return Ok(Some(crab)),
            Lookup::Absent => return Ok(None),
            Lookup::Unknown => {}
        }

        let response = self.get(format!("/crabs/{crab_id}/")).await?;
        self.resolve(crab_id, &response)
    }

    /// Gets a crab by username. Cached crabs are searched before the server
    /// is asked.
    pub async fn get_crab_by_username(&self, username: &str) -> Result<Option<Arc<Crab>>> {
        if let Some(crab) = self
            .inner
            .crabs
            .find(|crab| crab.username().eq_ignore_ascii_case(username))
        {
            return Ok(Some(crab));
        }

        let metadata =
            RequestMetadata::new(Method::GET, "/crabs/username/").with_path_segment(username);
        let response = self.call(metadata).await?;
        if response.is_ok() {
            self.objectify(response.json()?)
        } else {
            Ok(None)
        }
    }

    /// Gets a molt by id, from cache when possible. Molts deleted through
    /// this client are reported as absent.
    pub async fn get_molt(&self, molt_id: EntityId) -> Result<Option<Arc<Molt>>> {
        match self.inner.molts.lookup(molt_id) {
            Lookup::Present(molt) if molt.is_deleted() => return Ok(None),
            Lookup::Present(molt) => return Ok(Some(molt)),
            Lookup::Absent => return Ok(None),
            Lookup::Unknown => {}
        }

        let response = self.get(format!("/molts/{molt_id}/")).await?;
        self.resolve(molt_id, &response)
    }

    /// Gets every molt that uses a crabtag, following all pages.
    pub async fn molts_with_crabtag(&self, crabtag: &str) -> Result<Vec<Arc<Molt>>> {
        self.all_pages(Paginator::new("/crabtag/", "molts").with_path_segment(crabtag))
            .await
    }

    /// Gets one page of molts that mention `@username` explicitly.
    pub async fn molts_mentioning(
        &self,
        username: &str,
        opts: &ListOptions,
    ) -> Result<Vec<Arc<Molt>>> {
        self.molt_page(
            RequestMetadata::new(Method::GET, "/molts/mentioning/").with_path_segment(username),
            opts,
        )
        .await
    }

    /// Gets one page of molts replying to molts posted by `username`.
    pub async fn molts_replying_to(
        &self,
        username: &str,
        opts: &ListOptions,
    ) -> Result<Vec<Arc<Molt>>> {
        self.molt_page(
            RequestMetadata::new(Method::GET, "/molts/replying/").with_path_segment(username),
            opts,
        )
        .await
    }

    /// Posts a new molt as the authenticated crab.
    ///
    /// Returns `None` if the server rejected the molt.
    ///
    /// # Errors
    ///
    /// [`Error::ContentTooLong`], [`Error::MissingAccessToken`] and
    /// [`Error::ImageNotFound`] are raised before any request is made.
    pub async fn post_molt(
        &self,
        content: &str,
        image_path: Option<&Path>,
    ) -> Result<Option<Arc<Molt>>> {
        let response = self.compose("/molts/", Some(content), image_path).await?;
        self.created_molt(&response)
    }

    /// Fetches every page of a paginated list and objectifies the items.
    pub(crate) async fn all_pages<T: Entity>(&self, paginator: Paginator) -> Result<Vec<Arc<T>>> {
        let records = self.paginate(&paginator).await?;
        self.objectify_all(records)
    }

    /// Fetches a single page of molts. A rejected request yields no molts.
    pub(crate) async fn molt_page(
        &self,
        request: RequestMetadata,
        opts: &ListOptions,
    ) -> Result<Vec<Arc<Molt>>> {
        let response = self
            .call(request.with_query_params(opts.to_query_params()))
            .await?;
        if !response.is_ok() {
            return Ok(Vec::new());
        }

        let mut page: Value = response.json()?;
        let records = match page.get_mut("molts").map(Value::take) {
            Some(Value::Array(records)) => records,
            _ => Vec::new(),
        };
        self.objectify_all(records)
    }

    /// Performs an authenticated action that reports only success.
    pub(crate) async fn action(&self, method: Method, endpoint: String) -> Result<bool> {
        self.require_access_token()?;
        let response = self.call(RequestMetadata::new(method, endpoint)).await?;
        Ok(response.is_ok())
    }

    /// Sends molt content and an optional image to a composing endpoint.
    ///
    /// Content length, credentials and the image path are all checked before
    /// any request is made.
    pub(crate) async fn compose(
        &self,
        endpoint: &str,
        content: Option<&str>,
        image_path: Option<&Path>,
    ) -> Result<Response> {
        if let Some(content) = content {
            self.check_content(content)?;
        }
        self.require_access_token()?;

        let mut metadata = RequestMetadata::new(Method::POST, endpoint);
        if let Some(content) = content {
            metadata = metadata.with_form_field("content", content);
        }
        if let Some(path) = image_path {
            metadata = metadata.with_attachment(Attachment::image(path).await?);
        }

        self.call(metadata).await
    }

    pub(crate) fn created_molt(&self, response: &Response) -> Result<Option<Arc<Molt>>> {
        if response.is_ok() {
            self.objectify(response.json()?)
        } else {
            Ok(None)
        }
    }

    /// Rejects content longer than the character limit.
    pub fn check_content(&self, content: &str) -> Result<()> {
        let length = content.chars().count();
        if length > self.inner.character_limit {
            return Err(Error::ContentTooLong {
                length,
                limit: self.inner.character_limit,
            });
        }
        Ok(())
    }

    /// Sends a bio update for `crab_id` and returns the refreshed record.
    pub(crate) async fn post_bio(&self, crab_id: EntityId, bio: &Bio) -> Result<Option<Value>> {
        self.require_access_token()?;
        let response = self
            .post(format!("/crabs/{crab_id}/bio/"), bio.to_form_fields())
            .await?;
        if response.is_ok() {
            response.json().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("base_endpoint", &self.inner.base_endpoint)
            .field("api_key", &"<secret>")
            .field(
                "access_token",
                &self.access_token().map(|_| "<secret>"),
            )
            .field("cached_crabs", &self.inner.crabs.len())
            .field("cached_molts", &self.inner.molts.len())
            .finish()
    }
}

impl Entity for Crab {
    const KIND: &'static str = "crab";

    fn from_record(record: Value, client: &Client) -> Result<Self> {
        Crab::new(record, client)
    }

    fn cache(inner: &ClientInner) -> &EntityCache<Self> {
        &inner.crabs
    }
}

impl Entity for Molt {
    const KIND: &'static str = "molt";

    fn from_record(record: Value, client: &Client) -> Result<Self> {
        Molt::new(record, client)
    }

    fn cache(inner: &ClientInner) -> &EntityCache<Self> {
        &inner.molts
    }
}

fn transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(error)
    }
}

/// Builder for configuring and connecting a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use crabber::{ClientBuilder, RetryPolicy, retry::Backoff};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), crabber::Error> {
/// let client = ClientBuilder::new()
///     .api_key("my-developer-key")
///     .base_url("http://localhost:5000")?
///     .timeout(Duration::from_secs(10))
///     .retry_policy(RetryPolicy::new(5).with_backoff(Backoff::Linear {
///         delay: Duration::from_millis(250),
///     }))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    access_token: Option<String>,
    base_url: String,
    base_endpoint: String,
    retry_policy: RetryPolicy,
    timeout: Duration,
    character_limit: usize,
    verify_connection: bool,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            access_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            base_endpoint: DEFAULT_BASE_ENDPOINT.to_string(),
            retry_policy: RetryPolicy::default(),
            timeout: DEFAULT_TIMEOUT,
            character_limit: DEFAULT_CHARACTER_LIMIT,
            verify_connection: true,
        }
    }

    /// Sets the developer api key. Required.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets an access token to authenticate with while building.
    pub fn access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Sets the instance to connect to. Must include the scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();
        Url::parse(url)?;
        self.base_url = url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Sets the versioned prefix. `/api/v1` is the only compliant one today.
    pub fn base_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let trimmed = endpoint.trim_end_matches('/');
        self.base_endpoint = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    /// Sets the retry policy for failed requests.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets the number of attempts per request, keeping the backoff.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.retry_policy.max_attempts = max_attempts;
        self
    }

    /// Sets the upper bound on a single attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum number of characters in a molt.
    pub fn character_limit(mut self, limit: usize) -> Self {
        self.character_limit = limit;
        self
    }

    /// Whether `build` checks the connection before returning. On by default.
    pub fn verify_connection(mut self, verify: bool) -> Self {
        self.verify_connection = verify;
        self
    }

    /// Builds the client, checks the connection and, if an access token was
    /// given, authenticates.
    ///
    /// # Errors
    ///
    /// Returns an error if no api key was provided, if the connection check
    /// fails, or if the access token is rejected with a 401.
    pub async fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::ConfigurationError("API key is required".to_string()))?;

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        let client = Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: self.base_url,
                base_endpoint: self.base_endpoint,
                api_key,
                access_token: RwLock::new(None),
                retry_policy: self.retry_policy,
                timeout: self.timeout,
                character_limit: self.character_limit,
                current_crab: RwLock::new(None),
                crabs: EntityCache::new(),
                molts: EntityCache::new(),
            }),
        };

        if self.verify_connection {
            client.check_connection().await?;
        }

        if let Some(token) = self.access_token {
            client.authenticate(token).await?;
        }

        Ok(client)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
