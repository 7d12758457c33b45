//! Polling expectations.
//!
//! `expect(session, locator)` builds an expectation that polls the live
//! document until the condition holds or the wait budget is spent. There is
//! no retry policy above this window: a spent budget becomes either a
//! `ResolutionTimeout` (the element never matched) or an
//! `AssertionMismatch` carrying the expected and last-observed values.

use tokio::time::{sleep, Instant};

use crate::locator::Locator;
use crate::result::{ComprobarError, ComprobarResult};
use crate::session::Session;

/// Start an expectation on a locator
#[must_use]
pub fn expect<'a>(session: &'a Session, locator: &'a Locator) -> Expect<'a> {
    Expect { session, locator }
}

/// A pending expectation; each method polls until satisfied
#[derive(Debug, Clone, Copy)]
pub struct Expect<'a> {
    session: &'a Session,
    locator: &'a Locator,
}

impl Expect<'_> {
    fn deadline(&self) -> Instant {
        Instant::now() + self.session.budget(self.locator)
    }

    fn mismatch(&self, expected: impl Into<String>, observed: impl Into<String>) -> ComprobarError {
        ComprobarError::AssertionMismatch {
            subject: self.locator.to_string(),
            expected: expected.into(),
            observed: observed.into(),
        }
    }

    fn unresolved(&self) -> ComprobarError {
        ComprobarError::ResolutionTimeout {
            selector: self.locator.to_string(),
            timeout_ms: self.session.budget(self.locator).as_millis() as u64,
        }
    }

    /// The element is rendered
    pub async fn to_be_visible(self) -> ComprobarResult<()> {
        let deadline = self.deadline();
        loop {
            if self.session.is_visible(self.locator).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(self.locator.options().poll_interval).await;
        }
        if self.session.count(self.locator).await? == 0 {
            Err(self.unresolved())
        } else {
            Err(self.mismatch("visible", "hidden"))
        }
    }

    /// The element is absent or not rendered
    pub async fn to_be_hidden(self) -> ComprobarResult<()> {
        let deadline = self.deadline();
        loop {
            if !self.session.is_visible(self.locator).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(self.locator.options().poll_interval).await;
        }
        Err(self.mismatch("hidden", "visible"))
    }

    /// The element's trimmed text equals `expected`
    pub async fn to_have_text(self, expected: &str) -> ComprobarResult<()> {
        let deadline = self.deadline();
        let mut observed;
        loop {
            observed = self.session.text_content(self.locator).await?;
            if observed.as_deref().map(str::trim) == Some(expected) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(self.locator.options().poll_interval).await;
        }
        match observed {
            Some(text) => Err(self.mismatch(expected, text.trim())),
            None => Err(self.unresolved()),
        }
    }

    /// The element's text contains `expected`
    pub async fn to_contain_text(self, expected: &str) -> ComprobarResult<()> {
        let deadline = self.deadline();
        let mut observed;
        loop {
            observed = self.session.text_content(self.locator).await?;
            if observed.as_deref().is_some_and(|t| t.contains(expected)) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(self.locator.options().poll_interval).await;
        }
        match observed {
            Some(text) => Err(self.mismatch(format!("text containing {expected:?}"), text.trim())),
            None => Err(self.unresolved()),
        }
    }

    /// The input's value equals `expected`
    pub async fn to_have_value(self, expected: &str) -> ComprobarResult<()> {
        let deadline = self.deadline();
        let mut observed;
        loop {
            observed = self.session.input_value(self.locator).await?;
            if observed.as_deref() == Some(expected) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(self.locator.options().poll_interval).await;
        }
        match observed {
            Some(value) => Err(self.mismatch(expected, value)),
            None => Err(self.unresolved()),
        }
    }

    /// Exactly `expected` elements match
    pub async fn to_have_count(self, expected: usize) -> ComprobarResult<()> {
        let deadline = self.deadline();
        let mut observed;
        loop {
            observed = self.session.count(self.locator).await?;
            if observed == expected {
                return Ok(());
            }
            if Instant::now() >= deadline {
                break;
            }
            sleep(self.locator.options().poll_interval).await;
        }
        Err(self.mismatch(expected.to_string(), observed.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use crate::locator::Selector;
    use std::time::Duration;

    fn fast(selector: Selector) -> Locator {
        Locator::from_selector(selector).with_timeout(Duration::from_millis(120))
    }

    #[tokio::test]
    async fn test_to_have_text_passes_on_trimmed_match() {
        let title = Selector::css("h1");
        let driver =
            MockDriver::new().with_element(&title, MockElement::text("  Combination Pliers "));
        let session = Session::new(driver);
        expect(&session, &fast(title))
            .to_have_text("Combination Pliers")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_to_have_text_reports_expected_and_observed() {
        let badge = Selector::css("[data-test='nav-cart'] .badge");
        let driver = MockDriver::new().with_element(&badge, MockElement::text("1"));
        let session = Session::new(driver);
        let err = expect(&session, &fast(badge))
            .to_have_text("3")
            .await
            .unwrap_err();
        assert_eq!(err.expected_observed(), Some(("3", "1")));
    }

    #[tokio::test]
    async fn test_missing_element_is_a_resolution_timeout() {
        let session = Session::new(MockDriver::new());
        let err = expect(&session, &fast(Selector::test_id("cart-total")))
            .to_have_text("$14.15")
            .await
            .unwrap_err();
        assert!(matches!(err, ComprobarError::ResolutionTimeout { .. }));
    }

    #[tokio::test]
    async fn test_hidden_element_fails_visibility_with_mismatch() {
        let success = Selector::text("Thanks for your message!");
        let driver = MockDriver::new()
            .with_element(&success, MockElement::text("Thanks for your message!").hidden());
        let session = Session::new(driver);
        let err = expect(&session, &fast(success))
            .to_be_visible()
            .await
            .unwrap_err();
        assert_eq!(err.expected_observed(), Some(("visible", "hidden")));
    }

    #[tokio::test]
    async fn test_to_be_hidden_passes_for_absent_element() {
        let session = Session::new(MockDriver::new());
        expect(&session, &fast(Selector::text("Subject is required")))
            .to_be_hidden()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_to_have_count_passes_on_exact_match() {
        let errors = Selector::css(".alert-danger");
        let element = MockElement {
            count: 5,
            ..MockElement::text("is required")
        };
        let driver = MockDriver::new().with_element(&errors, element);
        let session = Session::new(driver);
        expect(&session, &fast(errors)).to_have_count(5).await.unwrap();
    }

    #[tokio::test]
    async fn test_to_have_count_reports_expected_and_observed() {
        let errors = Selector::css(".alert-danger");
        let element = MockElement {
            count: 2,
            ..MockElement::text("is required")
        };
        let driver = MockDriver::new().with_element(&errors, element);
        let session = Session::new(driver);
        let err = expect(&session, &fast(errors))
            .to_have_count(5)
            .await
            .unwrap_err();
        assert_eq!(err.expected_observed(), Some(("5", "2")));
    }

    #[tokio::test]
    async fn test_to_have_count_zero_matches_absent_element() {
        // Zero is an observation, not a resolution failure: expecting no
        // matches must pass on an empty document, and expecting some must
        // report the observed zero.
        let session = Session::new(MockDriver::new());
        let absent = fast(Selector::css(".alert-danger"));
        expect(&session, &absent).to_have_count(0).await.unwrap();
        let err = expect(&session, &absent).to_have_count(2).await.unwrap_err();
        assert_eq!(err.expected_observed(), Some(("2", "0")));
    }

    #[tokio::test]
    async fn test_to_have_value() {
        let quantity = Selector::test_id("product-quantity");
        let driver = MockDriver::new().with_element(&quantity, MockElement::value("3"));
        let session = Session::new(driver);
        expect(&session, &fast(quantity))
            .to_have_value("3")
            .await
            .unwrap();
    }
}
