//! One browser session, exclusively owned by one scenario.
//!
//! A [`Session`] wraps a boxed [`Driver`] and layers auto-waiting on top of
//! its resolve-and-act primitives: interactions poll until the target
//! element is present and visible (or the wait budget is spent), and
//! navigation waits poll the current URL against a pattern. Page objects
//! take their session as a constructor parameter; there is no ambient
//! singleton to leak state across scenarios.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::driver::Driver;
use crate::locator::{Locator, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::page::UrlMatcher;
use crate::result::{ComprobarError, ComprobarResult};

/// Session-wide wait configuration
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Override for every locator's wait budget (CLI `--timeout`)
    pub action_timeout: Option<Duration>,
    /// Wait budget for URL patterns
    pub navigation_timeout: Duration,
    /// Polling interval for navigation and stability waits
    pub poll_interval: Duration,
    /// How long a polled value must hold still to count as stabilized
    pub stabilize_for: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            action_timeout: None,
            navigation_timeout: Duration::from_millis(3 * DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            stabilize_for: Duration::from_millis(200),
        }
    }
}

impl SessionOptions {
    /// Apply one wait budget to every action in the session
    #[must_use]
    pub const fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = Some(timeout);
        self
    }
}

/// Exclusive handle to one live browser page.
#[derive(Debug)]
pub struct Session {
    driver: Mutex<Box<dyn Driver>>,
    options: SessionOptions,
}

impl Session {
    /// Wrap a driver with default waits
    #[must_use]
    pub fn new(driver: impl Driver + 'static) -> Self {
        Self::with_options(driver, SessionOptions::default())
    }

    /// Wrap a driver with explicit waits
    #[must_use]
    pub fn with_options(driver: impl Driver + 'static, options: SessionOptions) -> Self {
        Self {
            driver: Mutex::new(Box::new(driver)),
            options,
        }
    }

    /// The session's wait configuration
    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub(crate) fn budget(&self, locator: &Locator) -> Duration {
        self.options
            .action_timeout
            .unwrap_or(locator.options().timeout)
    }

    /// Navigate to an absolute URL
    pub async fn goto(&self, url: &str) -> ComprobarResult<()> {
        self.driver.lock().await.navigate(url).await
    }

    /// The URL the page is currently on
    pub async fn current_url(&self) -> ComprobarResult<String> {
        self.driver.lock().await.current_url().await
    }

    /// Click, waiting for the element to be present and visible
    pub async fn click(&self, locator: &Locator) -> ComprobarResult<()> {
        let deadline = Instant::now() + self.budget(locator);
        loop {
            {
                let mut driver = self.driver.lock().await;
                let actionable = !locator.options().visible
                    || driver.is_visible(locator.selector()).await?;
                if actionable && driver.click(locator.selector()).await? {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(self.resolution_timeout(locator));
            }
            sleep(locator.options().poll_interval).await;
        }
    }

    /// Fill an input, waiting for it to be present and visible
    pub async fn fill(&self, locator: &Locator, text: &str) -> ComprobarResult<()> {
        let deadline = Instant::now() + self.budget(locator);
        loop {
            {
                let mut driver = self.driver.lock().await;
                let actionable = !locator.options().visible
                    || driver.is_visible(locator.selector()).await?;
                if actionable && driver.fill(locator.selector(), text).await? {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(self.resolution_timeout(locator));
            }
            sleep(locator.options().poll_interval).await;
        }
    }

    /// Select a `<select>` option by value, waiting for the element
    pub async fn select_option(&self, locator: &Locator, value: &str) -> ComprobarResult<()> {
        let deadline = Instant::now() + self.budget(locator);
        loop {
            {
                let mut driver = self.driver.lock().await;
                if driver.select_option(locator.selector(), value).await? {
                    return Ok(());
                }
            }
            if Instant::now() >= deadline {
                return Err(self.resolution_timeout(locator));
            }
            sleep(locator.options().poll_interval).await;
        }
    }

    /// Dispatch a key to the focused element
    pub async fn press_key(&self, key: &str) -> ComprobarResult<()> {
        self.driver.lock().await.press_key(key).await
    }

    /// Current text content, without waiting
    pub async fn text_content(&self, locator: &Locator) -> ComprobarResult<Option<String>> {
        self.driver.lock().await.text_content(locator.selector()).await
    }

    /// Current input value, without waiting
    pub async fn input_value(&self, locator: &Locator) -> ComprobarResult<Option<String>> {
        self.driver.lock().await.input_value(locator.selector()).await
    }

    /// Whether the element is currently rendered, without waiting
    pub async fn is_visible(&self, locator: &Locator) -> ComprobarResult<bool> {
        self.driver.lock().await.is_visible(locator.selector()).await
    }

    /// Number of currently matching elements, without waiting
    pub async fn count(&self, locator: &Locator) -> ComprobarResult<usize> {
        self.driver.lock().await.count(locator.selector()).await
    }

    /// Wait until the current URL matches a pattern (`**` matches any
    /// number of path segments).
    pub async fn wait_for_url(&self, pattern: &str) -> ComprobarResult<()> {
        let matcher = UrlMatcher::new(pattern);
        let deadline = Instant::now() + self.options.navigation_timeout;
        let mut last_url;
        loop {
            last_url = self.current_url().await?;
            if matcher.matches(&last_url) {
                debug!(url = %last_url, pattern, "url matched");
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ComprobarError::NavigationTimeout {
                    pattern: pattern.to_string(),
                    timeout_ms: self.options.navigation_timeout.as_millis() as u64,
                    last_url,
                });
            }
            sleep(self.options.poll_interval).await;
        }
    }

    /// Wait until the element's text has held still for the configured
    /// stability window, then return it.
    ///
    /// Replaces the fixed "sleep while the price recalculates" wait: the
    /// predicate is "value has stabilized", so slow environments wait
    /// longer and fast ones return immediately.
    pub async fn stable_text(&self, locator: &Locator) -> ComprobarResult<String> {
        let deadline = Instant::now() + self.budget(locator);
        let mut last: Option<String> = None;
        let mut held_since = Instant::now();
        loop {
            let observed = self.text_content(locator).await?;
            match observed {
                Some(text) => {
                    if last.as_deref() == Some(text.as_str()) {
                        if held_since.elapsed() >= self.options.stabilize_for {
                            return Ok(text);
                        }
                    } else {
                        last = Some(text);
                        held_since = Instant::now();
                    }
                }
                None => {
                    last = None;
                }
            }
            if Instant::now() >= deadline {
                // The budget is spent; hand back whatever was last seen and
                // let the caller's comparison report the mismatch.
                return last.ok_or_else(|| self.resolution_timeout(locator));
            }
            sleep(locator.options().poll_interval).await;
        }
    }

    /// Tear the underlying page down
    pub async fn close(&self) -> ComprobarResult<()> {
        self.driver.lock().await.close().await
    }

    fn resolution_timeout(&self, locator: &Locator) -> ComprobarError {
        ComprobarError::ResolutionTimeout {
            selector: locator.to_string(),
            timeout_ms: self.budget(locator).as_millis() as u64,
        }
    }
}
