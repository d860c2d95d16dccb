//! Error types for Crabber API calls.
//!
//! Errors fall into a few families that callers are expected to branch on:
//! usage errors raised before any network I/O, authentication failures,
//! retryable transport failures, and exhausted retries. A 404 or 400 from
//! the server is *not* an error; lookups surface it as `None` and actions as
//! `false`.

use http::{HeaderMap, Method, StatusCode};
use std::path::PathBuf;

/// The main error type for the Crabber client.
///
/// # Examples
///
/// ```no_run
/// use crabber::{Client, Error};
///
/// # async fn example(client: Client) {
/// match client.post_molt("hello", None).await {
///     Ok(Some(molt)) => println!("posted molt {}", molt.id()),
///     Ok(None) => eprintln!("the server rejected the molt"),
///     Err(Error::MissingAccessToken) => eprintln!("call authenticate() first"),
///     Err(Error::AuthenticationFailed { .. }) => eprintln!("token was rejected"),
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection refused, DNS, TLS, ...).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A single attempt exceeded the configured per-attempt timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a status that is neither a success nor one of
    /// the definitive client outcomes (400, 401, 404).
    ///
    /// This is only ever observed as the `last_error` of
    /// [`Error::MaxAttemptsExceeded`], since such statuses are retried.
    #[error("HTTP error {status}: {raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// The server answered 401. Retrying cannot fix a credential problem.
    #[error("Authentication failed (status {status}): {raw_response}")]
    AuthenticationFailed {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// Every allowed attempt ended in a retryable failure.
    #[error("Max attempts exceeded after {attempts} attempts: {last_error}")]
    MaxAttemptsExceeded {
        /// The number of attempts made
        attempts: usize,
        /// The last error encountered
        last_error: Box<Error>,
    },

    /// The connectivity request made while building the client did not
    /// return a success status. The base URL is most likely wrong.
    #[error("Site responded with {status}; is the base URL accurate?")]
    ConnectionCheckFailed {
        /// The HTTP status code of the connectivity request
        status: StatusCode,
    },

    /// Failed to deserialize a response body into the expected shape.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// An authenticated action was attempted without an access token.
    #[error("You are not properly authenticated for this request")]
    MissingAccessToken,

    /// Molt content exceeds the configured character limit.
    #[error("Molts cannot exceed {limit} characters (got {length})")]
    ContentTooLong {
        /// Number of characters in the rejected content
        length: usize,
        /// The configured limit
        limit: usize,
    },

    /// `Molt::edit` was called with neither new content nor a new image.
    #[error("Edit requires new content, a new image, or both")]
    EmptyEdit,

    /// The image path given for an attachment does not point to a file.
    #[error("The image path {} does not point to a valid file", .0.display())]
    ImageNotFound(PathBuf),

    /// The image file exists but could not be read.
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The transport only speaks GET, POST and DELETE.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(Method),

    /// A domain object was built from an empty record.
    #[error("Cannot construct {kind} from an empty record")]
    EmptyRecord {
        /// The entity kind that was being constructed
        kind: &'static str,
    },

    /// A domain object outlived the client that created it.
    #[error("The client that created this object has been dropped")]
    ClientDropped,

    /// Invalid configuration was provided.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An invalid URL was provided or assembled.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if this error is potentially retryable.
    ///
    /// Network errors, timeouts and unclassified HTTP statuses are retried
    /// by the transport; everything else is terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use crabber::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::HttpError {
    ///     status: StatusCode::BAD_GATEWAY,
    ///     raw_response: "upstream down".to_string(),
    ///     headers: http::HeaderMap::new(),
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::AuthenticationFailed {
    ///     status: StatusCode::UNAUTHORIZED,
    ///     raw_response: String::new(),
    /// };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Timeout | Error::HttpError { .. }
        )
    }

    /// Returns `true` for errors caused by how the library was called rather
    /// than by the server or the network. These are raised before any I/O.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Error::MissingAccessToken
                | Error::ContentTooLong { .. }
                | Error::EmptyEdit
                | Error::ImageNotFound(_)
                | Error::UnsupportedMethod(_)
                | Error::EmptyRecord { .. }
                | Error::ConfigurationError(_)
                | Error::InvalidUrl(_)
        )
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::AuthenticationFailed { status, .. } => Some(*status),
            Error::ConnectionCheckFailed { status } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::MaxAttemptsExceeded { last_error, .. } => last_error.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::AuthenticationFailed { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Crabber API calls.
pub type Result<T> = std::result::Result<T, Error>;
