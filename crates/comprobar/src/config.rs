//! Target-site fixture configuration.
//!
//! The demo shop's URLs, `data-test` hooks, product names, and currency
//! formatting are an external contract this harness asserts against, not
//! something it defines. Everything scenario-specific about the site lives
//! here so suites stay free of literals.

use serde::{Deserialize, Serialize};

use crate::money::Price;

/// The demo shop under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base URL, no trailing slash
    pub base_url: String,
    /// Accessible name of the product link on the home page
    pub product_link_name: String,
    /// Product title as the cart line shows it
    pub product_name: String,
    /// Unit price as displayed on the product page
    pub unit_price: Price,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://practicesoftwaretesting.com".to_string(),
            product_link_name: "Combination Pliers".to_string(),
            product_name: "Combination Pliers".to_string(),
            unit_price: Price::from_cents(1415),
        }
    }
}

impl SiteConfig {
    /// Default fixture with a different base URL (local deployments)
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base: String = base_url.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            base_url: base,
            ..Self::default()
        }
    }

    /// Absolute URL for a site path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// The home page
    #[must_use]
    pub fn home_url(&self) -> String {
        format!("{}/", self.base_url)
    }

    /// The cart/checkout page
    #[must_use]
    pub fn checkout_url(&self) -> String {
        self.url("checkout")
    }
}

/// A contact-form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    /// First name field
    pub first_name: String,
    /// Last name field
    pub last_name: String,
    /// Email field
    pub email: String,
    /// Subject option value
    pub subject: String,
    /// Message body (the form enforces a minimum length)
    pub message: String,
}

impl ContactMessage {
    /// A submission the form accepts
    #[must_use]
    pub fn valid() -> Self {
        Self {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            subject: "webmaster".to_string(),
            message: "This is an automated acceptance-test message. \
                      Please ignore it; no reply is expected or needed."
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_cleanly() {
        let site = SiteConfig::with_base_url("http://localhost:4200/");
        assert_eq!(site.base_url, "http://localhost:4200");
        assert_eq!(site.checkout_url(), "http://localhost:4200/checkout");
        assert_eq!(site.url("/contact"), "http://localhost:4200/contact");
    }

    #[test]
    fn test_default_targets_demo_shop() {
        let site = SiteConfig::default();
        assert_eq!(site.unit_price.to_string(), "$14.15");
        assert!(site.home_url().starts_with("https://practicesoftwaretesting.com"));
    }

    #[test]
    fn test_valid_contact_message_is_long_enough() {
        // The form rejects messages under 50 characters
        assert!(ContactMessage::valid().message.len() >= 50);
    }
}
