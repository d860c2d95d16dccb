//! Retry policy and response classification.
//!
//! Every response the transport receives is sorted into one of three
//! [`ResponseClass`]es. Only [`ResponseClass::Retry`] consumes an attempt and
//! goes around the loop again; the [`RetryPolicy`] decides how many attempts
//! are allowed and how long to wait between them.

use http::StatusCode;
use rand::Rng;
use std::time::Duration;

/// Default number of attempts made for a single logical request.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;

/// How the transport treats a response with a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// Success, or a definitive client outcome (400, 404). Returned to the
    /// caller as-is.
    Complete,
    /// 401. Fails immediately, regardless of remaining attempts.
    Unauthorized,
    /// Anything else. Counts as one attempt.
    Retry,
}

impl ResponseClass {
    /// Classifies a response status.
    ///
    /// # Examples
    ///
    /// ```
    /// use crabber::retry::ResponseClass;
    /// use http::StatusCode;
    ///
    /// assert_eq!(ResponseClass::of(StatusCode::OK), ResponseClass::Complete);
    /// assert_eq!(ResponseClass::of(StatusCode::NOT_FOUND), ResponseClass::Complete);
    /// assert_eq!(ResponseClass::of(StatusCode::UNAUTHORIZED), ResponseClass::Unauthorized);
    /// assert_eq!(ResponseClass::of(StatusCode::BAD_GATEWAY), ResponseClass::Retry);
    /// ```
    pub fn of(status: StatusCode) -> Self {
        if status.is_success()
            || status == StatusCode::NOT_FOUND
            || status == StatusCode::BAD_REQUEST
        {
            ResponseClass::Complete
        } else if status == StatusCode::UNAUTHORIZED {
            ResponseClass::Unauthorized
        } else {
            ResponseClass::Retry
        }
    }
}

/// Delay inserted between two attempts of the same request.
///
/// # Examples
///
/// ```
/// use crabber::retry::Backoff;
/// use std::time::Duration;
///
/// // Re-attempt right away (the default)
/// let immediate = Backoff::Immediate;
///
/// // 100ms, 200ms, 400ms, ... capped at 5s
/// let exponential = Backoff::Exponential {
///     initial_delay: Duration::from_millis(100),
///     max_delay: Duration::from_secs(5),
///     jitter: true,
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub enum Backoff {
    /// Re-attempt immediately.
    #[default]
    Immediate,

    /// Wait the same amount of time before every re-attempt.
    Linear {
        /// The delay between attempts.
        delay: Duration,
    },

    /// Wait `initial_delay * 2^(retry - 1)`, capped at `max_delay`.
    Exponential {
        /// The delay before the first re-attempt.
        initial_delay: Duration,
        /// The maximum delay between attempts.
        max_delay: Duration,
        /// Whether to scale each delay by a random factor in `[0.5, 1.0]`.
        jitter: bool,
    },
}

impl Backoff {
    /// Returns the delay before the given re-attempt (1 = first re-attempt).
    pub fn delay_for_retry(&self, retry: usize) -> Duration {
        match self {
            Backoff::Immediate => Duration::ZERO,
            Backoff::Linear { delay } => *delay,
            Backoff::Exponential {
                initial_delay,
                max_delay,
                jitter,
            } => {
                let multiplier = 2u64.saturating_pow(retry.saturating_sub(1) as u32);
                let base_delay =
                    initial_delay.saturating_mul(multiplier.try_into().unwrap_or(u32::MAX));
                let delay = base_delay.min(*max_delay);

                if *jitter {
                    let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
                    delay.mul_f64(jitter_factor)
                } else {
                    delay
                }
            }
        }
    }
}

/// How many attempts a request gets and how they are spaced.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first one. Values below 1 are
    /// treated as 1.
    pub max_attempts: usize,
    /// Delay between attempts.
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt bound and no delay.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Immediate,
        }
    }

    /// Sets the delay between attempts.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns the attempt bound, optionally overridden for a single call.
    pub fn attempts_for(&self, override_attempts: Option<usize>) -> usize {
        override_attempts.unwrap_or(self.max_attempts).max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}
