//! Result and error types for Comprobar.

use thiserror::Error;

/// Result type for Comprobar operations
pub type ComprobarResult<T> = Result<T, ComprobarError>;

/// Errors that can occur while driving a session or checking expectations
#[derive(Debug, Error)]
pub enum ComprobarError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Session creation or teardown failed
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Navigation request itself failed
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Element never matched within the wait budget
    #[error("No element matched {selector} within {timeout_ms}ms")]
    ResolutionTimeout {
        /// Selector that never resolved
        selector: String,
        /// Wait budget in milliseconds
        timeout_ms: u64,
    },

    /// URL pattern never reached within the wait budget
    #[error("URL never matched {pattern} within {timeout_ms}ms (last: {last_url})")]
    NavigationTimeout {
        /// URL pattern that was awaited
        pattern: String,
        /// Wait budget in milliseconds
        timeout_ms: u64,
        /// Last URL observed before giving up
        last_url: String,
    },

    /// Observed value differs from expected
    #[error("{subject}: expected {expected:?}, observed {observed:?}")]
    AssertionMismatch {
        /// What was being checked (element or condition)
        subject: String,
        /// Expected value
        expected: String,
        /// Observed value (or a description of its absence)
        observed: String,
    },

    /// Driver-level evaluation or interaction failure
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// A currency string could not be parsed
    #[error("Not a price: {text:?}")]
    InvalidPrice {
        /// The offending text
        text: String,
    },

    /// Price arithmetic overflowed
    #[error("Price arithmetic overflow: {cents} cents x {quantity}")]
    PriceOverflow {
        /// Unit price in cents
        cents: i64,
        /// Quantity multiplier
        quantity: u32,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ComprobarError {
    /// The expected/observed pair, when this is a comparison failure.
    ///
    /// Scenario reports surface these separately so a failing step shows a
    /// diff instead of one flattened string.
    #[must_use]
    pub fn expected_observed(&self) -> Option<(&str, &str)> {
        match self {
            Self::AssertionMismatch {
                expected, observed, ..
            } => Some((expected.as_str(), observed.as_str())),
            _ => None,
        }
    }

    /// True for the failure kinds that represent a scenario-level verdict
    /// (as opposed to harness plumbing going wrong).
    #[must_use]
    pub fn is_verdict(&self) -> bool {
        matches!(
            self,
            Self::ResolutionTimeout { .. }
                | Self::NavigationTimeout { .. }
                | Self::AssertionMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_carries_expected_and_observed() {
        let err = ComprobarError::AssertionMismatch {
            subject: "cart total".to_string(),
            expected: "$42.45".to_string(),
            observed: "$14.15".to_string(),
        };
        assert_eq!(err.expected_observed(), Some(("$42.45", "$14.15")));
        assert!(err.is_verdict());
    }

    #[test]
    fn test_resolution_timeout_display() {
        let err = ComprobarError::ResolutionTimeout {
            selector: "[data-test='add-to-cart']".to_string(),
            timeout_ms: 5000,
        };
        let msg = err.to_string();
        assert!(msg.contains("add-to-cart"));
        assert!(msg.contains("5000ms"));
        assert!(err.expected_observed().is_none());
    }

    #[test]
    fn test_driver_error_is_not_a_verdict() {
        let err = ComprobarError::Driver {
            message: "evaluate failed".to_string(),
        };
        assert!(!err.is_verdict());
    }
}
