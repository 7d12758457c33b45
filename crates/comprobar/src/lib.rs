//! Comprobar: browser acceptance testing for the demo shop.
//!
//! Comprobar (Spanish: "to check/verify") drives a real Chromium through
//! the page-object pattern: every DOM access goes through a declarative
//! [`Locator`], every locator resolution auto-waits, and scenarios talk to
//! page objects rather than selectors. Fixed sleeps are replaced by
//! condition waits throughout.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐    ┌──────────────┐    ┌───────────┐    ┌──────────┐
//! │ Scenario │───►│ Page Object  │───►│ Session   │───►│ Driver   │
//! │ (steps)  │    │ (+ locators) │    │ (waiting) │    │ (CDP or  │
//! │          │    │              │    │           │    │  mock)   │
//! └──────────┘    └──────────────┘    └───────────┘    └──────────┘
//! ```
//!
//! The `browser` cargo feature enables the chromiumoxide-backed driver;
//! without it the crate still builds and runs against [`MockDriver`].

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;

#[cfg(feature = "browser")]
pub mod chromium;

mod config;
mod driver;
mod locator;
mod money;
mod page;
mod pages;
mod registry;
mod result;
mod runner;
mod scenario;
mod session;

pub mod suites;

pub use assertion::{expect, Expect};
#[cfg(feature = "browser")]
pub use chromium::{BrowserOptions, ChromiumBrowser, ChromiumDriver};
pub use config::{ContactMessage, SiteConfig};
pub use driver::{Driver, MockDriver, MockEffect, MockElement};
pub use locator::{
    Locator, LocatorOptions, Selector, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};
pub use money::Price;
pub use page::{PageObject, UrlMatcher};
pub use pages::{ContactLocators, ContactPage, ShopLocators, ShopPage};
pub use registry::LocatorRegistry;
pub use result::{ComprobarError, ComprobarResult};
pub use runner::{ScenarioRunner, SessionFactory, SessionFuture, Suite, SuiteReport};
pub use scenario::{
    Scenario, ScenarioReport, ScenarioStatus, Step, StepFailure, StepFn, StepFuture, StepReport,
    StepStatus,
};
pub use session::{Session, SessionOptions};
