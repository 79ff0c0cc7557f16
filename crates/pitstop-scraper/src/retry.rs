//! Transient-error classification and the watcher's retry counter.
//!
//! The watcher does not back off: a transient failure is retried after a
//! fixed delay until the budget runs out, after which it falls through to the
//! normal poll interval. Only a successful fetch refills the budget.

use crate::error::ScraperError;

/// Returns `true` for errors the watcher retries after its short delay.
///
/// **Transient:** timeouts, connect failures, and any non-2xx status.
///
/// **Not transient:** decode failures ([`ScraperError::Decode`]), malformed
/// URLs, and other request errors (body read failures, redirects, builder
/// errors). These are logged and the poll cycle is skipped with the counter
/// left untouched.
pub(crate) fn is_transient(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(e) => e.is_timeout() || e.is_connect() || e.is_status(),
        ScraperError::Decode { .. } | ScraperError::InvalidUrl { .. } => false,
    }
}

/// Counts retries spent since the last successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryBudget {
    max: u32,
    used: u32,
}

impl RetryBudget {
    pub(crate) fn new(max: u32) -> Self {
        Self { max, used: 0 }
    }

    /// Spends one retry, returning the 1-based attempt number, or `None` once
    /// the budget is exhausted. Exhaustion is sticky until [`reset`](Self::reset).
    pub(crate) fn try_consume(&mut self) -> Option<u32> {
        if self.used < self.max {
            self.used += 1;
            Some(self.used)
        } else {
            None
        }
    }

    pub(crate) fn reset(&mut self) {
        self.used = 0;
    }

    pub(crate) fn used(&self) -> u32 {
        self.used
    }

    pub(crate) fn max(&self) -> u32 {
        self.max
    }
}
