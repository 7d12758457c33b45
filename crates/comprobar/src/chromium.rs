//! Chromium driver over the Chrome DevTools Protocol.
//!
//! Available with the `browser` feature. One [`ChromiumBrowser`] is launched
//! per run; each scenario gets its own page wrapped in a [`ChromiumDriver`],
//! so sessions stay isolated while sharing the browser process.
//!
//! All element work goes through `Runtime.evaluate` with the JavaScript the
//! selectors generate; no element handles are held across calls.

use std::sync::Arc;

use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::driver::Driver;
use crate::locator::Selector;
use crate::result::{ComprobarError, ComprobarResult};

/// Launch options for the shared browser process
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run without a visible window
    pub headless: bool,
    /// Chromium sandbox (disable for containers/CI)
    pub sandbox: bool,
    /// Path to a chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            chromium_path: None,
        }
    }
}

impl BrowserOptions {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Disable the sandbox
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Point at a specific chromium binary
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }
}

/// A running browser process that hands out per-scenario drivers
#[derive(Debug)]
pub struct ChromiumBrowser {
    inner: Arc<Mutex<CdpBrowser>>,
    #[allow(dead_code)]
    handler: tokio::task::JoinHandle<()>,
}

impl ChromiumBrowser {
    /// Launch a browser process
    pub async fn launch(options: BrowserOptions) -> ComprobarResult<Self> {
        let mut builder = CdpConfig::builder();

        if !options.headless {
            builder = builder.with_head();
        }
        if !options.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = options.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let config = builder
            .build()
            .map_err(|e| ComprobarError::BrowserLaunch { message: e })?;

        let (browser, mut handler) =
            CdpBrowser::launch(config)
                .await
                .map_err(|e| ComprobarError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // Drive the CDP event stream until the browser goes away
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            inner: Arc::new(Mutex::new(browser)),
            handler: handle,
        })
    }

    /// Open a fresh page for one scenario
    pub async fn new_driver(&self) -> ComprobarResult<ChromiumDriver> {
        let browser = self.inner.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ComprobarError::Session {
                message: e.to_string(),
            })?;

        Ok(ChromiumDriver {
            page: Arc::new(Mutex::new(page)),
        })
    }

    /// Shut the browser process down
    pub async fn close(&self) -> ComprobarResult<()> {
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| ComprobarError::Session {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

/// [`Driver`] implementation bound to one CDP page
#[derive(Debug)]
pub struct ChromiumDriver {
    page: Arc<Mutex<CdpPage>>,
}

impl ChromiumDriver {
    async fn eval<T: serde::de::DeserializeOwned + Unpin>(
        &self,
        expr: &str,
    ) -> ComprobarResult<T> {
        let page = self.page.lock().await;
        let result = page
            .evaluate(expr)
            .await
            .map_err(|e| ComprobarError::Driver {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| ComprobarError::Driver {
            message: e.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Driver for ChromiumDriver {
    async fn navigate(&mut self, url: &str) -> ComprobarResult<()> {
        debug!(url, "navigate");
        let page = self.page.lock().await;
        page.goto(url)
            .await
            .map_err(|e| ComprobarError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> ComprobarResult<String> {
        self.eval("window.location.href").await
    }

    async fn click(&mut self, selector: &Selector) -> ComprobarResult<bool> {
        debug!(%selector, "click");
        let expr = format!(
            "(() => {{ const el = {query}; if (!el) return false; el.click(); return true; }})()",
            query = selector.to_query()
        );
        self.eval(&expr).await
    }

    async fn fill(&mut self, selector: &Selector, text: &str) -> ComprobarResult<bool> {
        debug!(%selector, text, "fill");
        let expr = format!(
            "(() => {{ const el = {query}; if (!el) return false; \
             el.focus(); el.value = {text:?}; \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); \
             el.blur(); return true; }})()",
            query = selector.to_query()
        );
        self.eval(&expr).await
    }

    async fn select_option(&mut self, selector: &Selector, value: &str) -> ComprobarResult<bool> {
        debug!(%selector, value, "select_option");
        let expr = format!(
            "(() => {{ const el = {query}; if (!el) return false; \
             el.value = {value:?}; \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); \
             return true; }})()",
            query = selector.to_query()
        );
        self.eval(&expr).await
    }

    async fn press_key(&mut self, key: &str) -> ComprobarResult<()> {
        debug!(key, "press_key");
        let expr = format!(
            "(() => {{ const el = document.activeElement || document.body; \
             for (const type of ['keydown', 'keypress', 'keyup']) {{ \
               el.dispatchEvent(new KeyboardEvent(type, {{key: {key:?}, bubbles: true}})); \
             }} return true; }})()"
        );
        let _: bool = self.eval(&expr).await?;
        Ok(())
    }

    async fn text_content(&self, selector: &Selector) -> ComprobarResult<Option<String>> {
        let expr = format!(
            "(() => {{ const el = {query}; return el ? el.textContent : null; }})()",
            query = selector.to_query()
        );
        self.eval(&expr).await
    }

    async fn input_value(&self, selector: &Selector) -> ComprobarResult<Option<String>> {
        let expr = format!(
            "(() => {{ const el = {query}; return el ? String(el.value) : null; }})()",
            query = selector.to_query()
        );
        self.eval(&expr).await
    }

    async fn is_visible(&self, selector: &Selector) -> ComprobarResult<bool> {
        let expr = format!(
            "(() => {{ const el = {query}; if (!el) return false; \
             const rect = el.getBoundingClientRect(); \
             const style = window.getComputedStyle(el); \
             return rect.width > 0 && rect.height > 0 && \
                    style.display !== 'none' && style.visibility !== 'hidden'; }})()",
            query = selector.to_query()
        );
        self.eval(&expr).await
    }

    async fn count(&self, selector: &Selector) -> ComprobarResult<usize> {
        self.eval(&selector.to_count_query()).await
    }

    async fn close(&mut self) -> ComprobarResult<()> {
        // Pages are cheap; they go away with the browser process. Navigating
        // to about:blank releases the site state this session held.
        debug!("close session page");
        let page = self.page.lock().await;
        page.goto("about:blank")
            .await
            .map_err(|e| ComprobarError::Session {
                message: e.to_string(),
            })?;
        Ok(())
    }
}
