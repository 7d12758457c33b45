//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a declarative, named reference to zero-or-more DOM
//! elements. It is resolved against the live document at the moment an
//! action or expectation runs, never earlier and never cached: re-navigation
//! invalidates nothing because nothing is held.
//!
//! # Design
//!
//! - **Deferred resolution**: building a locator (or a whole registry of
//!   them) touches no browser state; a selector that matches nothing fails
//!   as a timeout at the point of use.
//! - **Auto-waiting**: interactions and expectations poll until the element
//!   is present (and visible, when required) or the wait budget is spent.

use std::fmt;
use std::time::Duration;

/// Default timeout for auto-waiting (10 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Selector kind for locating elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// CSS selector (e.g. `"h1"`, `".card-title"`)
    Css(String),
    /// `data-test` attribute selector, the demo shop's stable hooks
    TestId(String),
    /// ARIA role plus accessible-name filter (e.g. link named
    /// "Combination Pliers")
    Role {
        /// ARIA role (`link`, `button`, ...)
        role: String,
        /// Accessible name substring
        name: String,
    },
    /// Any element whose text content contains the given string
    Text(String),
    /// CSS selector filtered by text content
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a `data-test` attribute selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a role+name selector
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Approximate a role with the elements that carry it implicitly.
    fn role_css(role: &str) -> &'static str {
        match role {
            "link" => "a[href], [role='link']",
            "button" => "button, input[type='submit'], [role='button']",
            "heading" => "h1, h2, h3, h4, h5, h6, [role='heading']",
            "textbox" => "input, textarea, [role='textbox']",
            _ => "[role]",
        }
    }

    /// JavaScript expression that resolves to the first matching element
    /// (or `null`).
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::TestId(id) => format!("document.querySelector('[data-test={id:?}]')"),
            Self::Role { role, name } => {
                let css = Self::role_css(role);
                format!(
                    "Array.from(document.querySelectorAll({css:?})).find(el => (el.textContent || el.getAttribute('aria-label') || '').includes({name:?}))"
                )
            }
            Self::Text(t) => {
                format!("Array.from(document.querySelectorAll('body *')).find(el => el.children.length === 0 && el.textContent.includes({t:?}))")
            }
            Self::CssWithText { css, text } => {
                format!("Array.from(document.querySelectorAll({css:?})).find(el => el.textContent.includes({text:?}))")
            }
        }
    }

    /// JavaScript expression that resolves to the number of matches.
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::TestId(id) => format!("document.querySelectorAll('[data-test={id:?}]').length"),
            Self::Role { role, name } => {
                let css = Self::role_css(role);
                format!(
                    "Array.from(document.querySelectorAll({css:?})).filter(el => (el.textContent || el.getAttribute('aria-label') || '').includes({name:?})).length"
                )
            }
            Self::Text(t) => {
                format!("Array.from(document.querySelectorAll('body *')).filter(el => el.children.length === 0 && el.textContent.includes({t:?})).length")
            }
            Self::CssWithText { css, text } => {
                format!("Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?})).length")
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::TestId(id) => write!(f, "[data-test='{id}']"),
            Self::Role { role, name } => write!(f, "role={role}[name~'{name}']"),
            Self::Text(t) => write!(f, "text~'{t}'"),
            Self::CssWithText { css, text } => write!(f, "{css}:has-text('{text}')"),
        }
    }
}

/// Options controlling how a locator waits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Wait budget for auto-waiting
    pub timeout: Duration,
    /// Polling interval while waiting
    pub poll_interval: Duration,
    /// Whether the element must be visible to count as resolved
    pub visible: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            visible: true,
        }
    }
}

/// A named, declarative reference to a DOM element.
///
/// Owned by the page object that declares it; carries no resolved handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    selector: Selector,
    options: LocatorOptions,
}

impl Locator {
    /// Create a locator from a CSS selector string
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from any selector
    #[must_use]
    pub fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            options: LocatorOptions::default(),
        }
    }

    /// Shorthand for a `data-test` attribute locator
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::from_selector(Selector::test_id(id))
    }

    /// Filter a CSS locator by text content
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        let selector = match self.selector {
            Selector::Css(css) => Selector::CssWithText {
                css,
                text: text.into(),
            },
            other => other,
        };
        Self {
            selector,
            options: self.options,
        }
    }

    /// Override the wait budget
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Allow resolution against hidden elements
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.options.visible = visible;
        self
    }

    /// The selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The wait options
    #[must_use]
    pub const fn options(&self) -> &LocatorOptions {
        &self.options
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.selector.fmt(f)
    }
}
