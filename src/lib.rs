//! # crabber - a client for the Crabber REST API
//!
//! `crabber` talks to any instance of Crabber, the crab-themed social
//! network. It retries transient failures, walks paginated list endpoints,
//! and hands out identity-stable [`Crab`] and [`Molt`] objects whose
//! relationships (authors, replies, followers, ...) resolve lazily through
//! the same client.
//!
//! ## Quick Start
//!
//! ```no_run
//! use crabber::{Client, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), crabber::Error> {
//!     let client = Client::builder()
//!         .api_key("your-developer-key")
//!         .access_token("your-access-token")
//!         .build()
//!         .await?;
//!
//!     // Lookups return `None` for things that do not exist
//!     if let Some(molt) = client.get_molt(1).await? {
//!         let author = molt.author().await?;
//!         println!("{:?} wrote: {}", author, molt.content());
//!
//!         for reply in molt.replies(&ListOptions::default()).await? {
//!             println!("  reply: {}", reply.content());
//!         }
//!     }
//!
//!     // Actions return whether the server accepted them
//!     if let Some(jake) = client.get_crab_by_username("jake").await? {
//!         jake.follow().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Identity
//!
//! Each client caches the objects it creates. Two lookups of the same id
//! return the same `Arc`, even when one went through the username endpoint
//! or a list, so `Arc::ptr_eq` is a valid identity test. The first record
//! seen for an id wins for the lifetime of the client.
//!
//! ## Error Handling
//!
//! ```no_run
//! use crabber::{Client, Error};
//!
//! # async fn example(client: Client) {
//! match client.get_crab(7).await {
//!     Ok(Some(crab)) => println!("found @{}", crab.username()),
//!     Ok(None) => println!("no such crab"),
//!     Err(Error::AuthenticationFailed { .. }) => eprintln!("re-authenticate"),
//!     Err(Error::MaxAttemptsExceeded { attempts, last_error }) => {
//!         eprintln!("gave up after {} attempts: {}", attempts, last_error)
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! # }
//! ```
//!
//! - Not found / bad request: `Ok(None)` for lookups, `Ok(false)` for actions
//! - Usage mistakes (no access token, content too long, missing image file):
//!   an error before any request is sent, see [`Error::is_usage_error`]
//! - 401: [`Error::AuthenticationFailed`], never retried
//! - Anything else: retried, then [`Error::MaxAttemptsExceeded`]

pub mod bio;
pub mod cache;
mod client;
pub mod crab;
mod error;
pub mod metadata;
pub mod molt;
mod pagination;
mod response;
pub mod retry;

pub use bio::{Bio, BioState};
pub use cache::EntityId;
pub use client::{
    Client, ClientBuilder, DEFAULT_BASE_ENDPOINT, DEFAULT_BASE_URL, DEFAULT_CHARACTER_LIMIT,
    DEFAULT_TIMEOUT,
};
pub use crab::Crab;
pub use error::{Error, Result};
pub use metadata::ListOptions;
pub use molt::Molt;
pub use pagination::{Paginator, DEFAULT_MAX_PAGE_FAILURES};
pub use response::Response;
pub use retry::{Backoff, RetryPolicy};
