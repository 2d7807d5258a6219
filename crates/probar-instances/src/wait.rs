//! Readiness Waits
//!
//! The readiness capability pages are awaited with. The core never polls a
//! UI itself: it hands the freshly built page to a [`Readiness`]
//! implementation together with the configured [`WaitOptions`].
//!
//! ## Toyota Way Application
//!
//! - **Jidoka**: Automatic detection of ready state
//! - **Poka-Yoke**: A bounded timeout is always applied
//! - **Muda**: Efficient polling reduces wasted CPU cycles

use crate::page_object::PageObject;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout for readiness waits (30 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// WAIT OPTIONS
// =============================================================================

/// Options for readiness waits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Settle time after the page reports ready, in milliseconds
    pub post_timeout_ms: u64,
    /// Message reported when the wait times out
    pub timeout_message: Option<String>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            post_timeout_ms: 0,
            timeout_message: None,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set settle time after readiness in milliseconds
    #[must_use]
    pub fn with_post_timeout(mut self, post_timeout_ms: u64) -> Self {
        self.post_timeout_ms = post_timeout_ms;
        self
    }

    /// Set the timeout message
    #[must_use]
    pub fn with_timeout_message(mut self, message: impl Into<String>) -> Self {
        self.timeout_message = Some(message.into());
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get settle time as Duration
    #[must_use]
    pub const fn post_timeout(&self) -> Duration {
        Duration::from_millis(self.post_timeout_ms)
    }
}

// =============================================================================
// WAIT RESULT
// =============================================================================

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Description of what was waited for
    pub waited_for: String,
}

impl WaitResult {
    /// Create a wait result
    #[must_use]
    pub fn new(elapsed: Duration, waited_for: impl Into<String>) -> Self {
        Self {
            elapsed,
            waited_for: waited_for.into(),
        }
    }
}

/// A readiness wait that ran out of time
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (after {timeout_ms}ms)")]
pub struct WaitTimeout {
    /// Timeout that was exceeded
    pub timeout_ms: u64,
    /// Description of the failure
    pub message: String,
}

impl WaitTimeout {
    /// Build a timeout for the given options and waited-for description
    #[must_use]
    pub fn for_options(options: &WaitOptions, waited_for: &str) -> Self {
        Self {
            timeout_ms: options.timeout_ms,
            message: options
                .timeout_message
                .clone()
                .unwrap_or_else(|| format!("Timed out waiting for {waited_for}")),
        }
    }
}

// =============================================================================
// READINESS CAPABILITY
// =============================================================================

/// Capability that blocks until a page is interactive.
///
/// Supplied by the UI driver integration. Retry behaviour, if any, belongs
/// to the implementation; the caller never retries a timed out wait.
pub trait Readiness {
    /// Block until `page` is ready or the timeout in `options` elapses
    fn await_ready(
        &self,
        page: &dyn PageObject,
        options: &WaitOptions,
    ) -> Result<WaitResult, WaitTimeout>;
}

impl<F> Readiness for F
where
    F: Fn(&dyn PageObject, &WaitOptions) -> Result<WaitResult, WaitTimeout>,
{
    fn await_ready(
        &self,
        page: &dyn PageObject,
        options: &WaitOptions,
    ) -> Result<WaitResult, WaitTimeout> {
        self(page, options)
    }
}

/// Default readiness: polls [`PageObject::is_loaded`] until it holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollingReadiness;

impl PollingReadiness {
    /// Create a polling readiness capability
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Readiness for PollingReadiness {
    fn await_ready(
        &self,
        page: &dyn PageObject,
        options: &WaitOptions,
    ) -> Result<WaitResult, WaitTimeout> {
        let start = Instant::now();
        let timeout = options.timeout();

        loop {
            if page.is_loaded() {
                tracing::trace!(
                    page = page.page_name(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "page ready"
                );
                if options.post_timeout_ms > 0 {
                    std::thread::sleep(options.post_timeout());
                }
                return Ok(WaitResult::new(start.elapsed(), page.page_name()));
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(WaitTimeout::for_options(options, page.page_name()));
            }
            std::thread::sleep(options.poll_interval().min(timeout - elapsed));
        }
    }
}
