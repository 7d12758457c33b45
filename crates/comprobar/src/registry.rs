//! Per-page locator registries.
//!
//! A registry is a fixed mapping from semantic name (`add-to-cart`,
//! `first-name`) to a resolution rule. Registries are plain data built once
//! per page object and never mutated afterwards; constructing one cannot
//! fail because nothing is resolved until the point of use.

use crate::locator::Locator;

/// A fixed, named collection of locators for one page or page group.
///
/// Implementors expose their locators as typed fields to the owning page
/// object; `entries` exists for diagnostics (listing what a page declares
/// when a scenario fails) and for tests that pin the mapping down.
pub trait LocatorRegistry {
    /// The page/domain this registry describes
    fn page_name(&self) -> &'static str;

    /// Every (semantic name, locator) pair, in declaration order
    fn entries(&self) -> Vec<(&'static str, &Locator)>;

    /// Look up a locator by its semantic name
    fn get(&self, name: &str) -> Option<&Locator> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, l)| l)
    }
}
