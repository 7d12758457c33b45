//! Built-in acceptance suites for the demo shop.
//!
//! Each suite is a plain [`Suite`] value parameterized by a [`SiteConfig`],
//! so the same scenarios run against production, staging, or a local copy
//! of the shop. The CLI exposes these by name.

mod cart;
mod contact;

pub use cart::cart_suite;
pub use contact::contact_suite;

use crate::config::SiteConfig;
use crate::runner::Suite;

/// Names of the built-in suites, in display order
pub const SUITE_NAMES: &[&str] = &["cart", "contact"];

/// Every built-in suite
#[must_use]
pub fn all_suites(site: &SiteConfig) -> Vec<Suite> {
    vec![cart_suite(site), contact_suite(site)]
}

/// A built-in suite by name
#[must_use]
pub fn suite_by_name(name: &str, site: &SiteConfig) -> Option<Suite> {
    match name {
        "cart" => Some(cart_suite(site)),
        "contact" => Some(contact_suite(site)),
        _ => None,
    }
}
