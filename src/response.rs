//! Classified HTTP response returned by the transport.
//!
//! A [`Response`] is only ever produced for statuses the transport considers
//! complete: successes and the definitive client outcomes (400, 404). The
//! caller tells them apart with [`Response::is_ok`].

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A completed HTTP exchange.
///
/// # Examples
///
/// ```no_run
/// use crabber::{Client, metadata::RequestMetadata};
/// use http::Method;
///
/// # async fn example(client: Client) -> Result<(), crabber::Error> {
/// let response = client
///     .call(RequestMetadata::new(Method::GET, "/crabs/1/"))
///     .await?;
///
/// if response.is_ok() {
///     let record: serde_json::Value = response.json()?;
///     println!("{} after {} attempts", record["username"], response.attempts);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from the first attempt until this response was received.
    pub latency: Duration,

    /// The number of attempts made to obtain this response.
    pub attempts: usize,
}

impl Response {
    /// Creates a new `Response`.
    pub fn new(
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            raw_body,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Returns `true` for 2xx responses.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// Returns `true` if the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    /// Deserializes the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeserializationFailed`] with the raw body attached if
    /// the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.raw_body).map_err(|e| {
            tracing::error!(
                error = %e,
                raw_response = %self.raw_body,
                "Failed to deserialize response"
            );
            Error::DeserializationFailed {
                raw_response: self.raw_body.clone(),
                serde_error: e.to_string(),
                status: self.status,
            }
        })
    }

    /// Returns `true` if the request required retries.
    ///
    /// # Examples
    ///
    /// ```
    /// # use crabber::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response::new(
    ///     String::new(),
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     Duration::from_millis(100),
    ///     3,
    /// );
    ///
    /// assert!(response.was_retried());
    /// ```
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a reference to a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}
