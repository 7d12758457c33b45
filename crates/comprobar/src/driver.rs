//! Abstract browser-automation driver.
//!
//! The harness never talks to a browser engine directly; everything goes
//! through the [`Driver`] capability trait, which resolves a [`Selector`]
//! and acts in a single call. That keeps resolved element handles out of
//! this layer entirely (navigation can never invalidate a handle we do not
//! hold) and lets alternate engines be substituted without touching page
//! object logic.
//!
//! Two implementations ship: [`ChromiumDriver`](crate::chromium) behind the
//! `browser` feature, and [`MockDriver`] for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::locator::Selector;
use crate::result::ComprobarResult;

/// Resolve-and-act interface to a live browser page.
///
/// Interaction methods return `Ok(false)` when the selector currently
/// matches nothing; the auto-waiting layer above ([`Session`]) polls them
/// and converts a persistent `false` into a `ResolutionTimeout`. Query
/// methods report the current state of the document without waiting.
///
/// [`Session`]: crate::session::Session
#[async_trait]
pub trait Driver: std::fmt::Debug + Send + Sync {
    /// Navigate the page to a URL and wait for the load to settle
    async fn navigate(&mut self, url: &str) -> ComprobarResult<()>;

    /// The URL the page is currently on
    async fn current_url(&self) -> ComprobarResult<String>;

    /// Click the first matching element; `false` if none matched
    async fn click(&mut self, selector: &Selector) -> ComprobarResult<bool>;

    /// Replace the value of the first matching input and fire
    /// input/change/blur; `false` if none matched
    async fn fill(&mut self, selector: &Selector, text: &str) -> ComprobarResult<bool>;

    /// Select an option by value on the first matching `<select>`;
    /// `false` if none matched
    async fn select_option(&mut self, selector: &Selector, value: &str) -> ComprobarResult<bool>;

    /// Dispatch a keyboard event to the focused element
    async fn press_key(&mut self, key: &str) -> ComprobarResult<()>;

    /// Text content of the first matching element
    async fn text_content(&self, selector: &Selector) -> ComprobarResult<Option<String>>;

    /// Current value of the first matching input element
    async fn input_value(&self, selector: &Selector) -> ComprobarResult<Option<String>>;

    /// Whether the first matching element exists and is rendered
    async fn is_visible(&self, selector: &Selector) -> ComprobarResult<bool>;

    /// Number of elements currently matching
    async fn count(&self, selector: &Selector) -> ComprobarResult<usize>;

    /// Tear the page down
    async fn close(&mut self) -> ComprobarResult<()>;
}

/// One element in the mock document
#[derive(Debug, Clone, Default)]
pub struct MockElement {
    /// Text content
    pub text: String,
    /// Input value
    pub value: String,
    /// Whether the element is rendered
    pub visible: bool,
    /// How many elements this entry stands for
    pub count: usize,
}

impl MockElement {
    /// A visible element with the given text content
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: String::new(),
            visible: true,
            count: 1,
        }
    }

    /// A visible input with the given value
    #[must_use]
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            value: value.into(),
            visible: true,
            count: 1,
        }
    }

    /// Mark the element hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// State change a mock click triggers
#[derive(Debug, Clone)]
pub enum MockEffect {
    /// Set the text content of an element (creating it if absent)
    SetText(String, String),
    /// Set the value of an input (creating it if absent)
    SetValue(String, String),
    /// Make an element visible (creating it if absent)
    Show(String),
    /// Remove an element entirely
    Remove(String),
    /// Change the current URL, as a link or SPA route change would
    Navigate(String),
}

/// Scripted in-memory driver for unit tests.
///
/// Elements are keyed by the canonical [`Selector`] display form. Clicks can
/// be scripted to mutate the document, which is enough to exercise the
/// auto-wait and assertion layers without a browser.
#[derive(Debug, Default)]
pub struct MockDriver {
    url: String,
    elements: HashMap<String, MockElement>,
    click_effects: HashMap<String, Vec<MockEffect>>,
    history: Vec<String>,
    closed: bool,
}

impl MockDriver {
    /// Create an empty mock document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element
    #[must_use]
    pub fn with_element(mut self, selector: &Selector, element: MockElement) -> Self {
        self.set_element(selector, element);
        self
    }

    /// Script effects that applying a click to `selector` triggers
    #[must_use]
    pub fn on_click(mut self, selector: &Selector, effects: Vec<MockEffect>) -> Self {
        self.click_effects.insert(selector.to_string(), effects);
        self
    }

    /// Insert or replace an element
    pub fn set_element(&mut self, selector: &Selector, element: MockElement) {
        self.elements.insert(selector.to_string(), element);
    }

    /// Every driver call made so far, in order
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Whether a given call was recorded
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.history.iter().any(|c| c.starts_with(prefix))
    }

    fn apply(&mut self, effect: &MockEffect) {
        match effect {
            MockEffect::SetText(key, text) => {
                let el = self.elements.entry(key.clone()).or_insert(MockElement {
                    visible: true,
                    count: 1,
                    ..MockElement::default()
                });
                el.text.clone_from(text);
            }
            MockEffect::SetValue(key, value) => {
                let el = self.elements.entry(key.clone()).or_insert(MockElement {
                    visible: true,
                    count: 1,
                    ..MockElement::default()
                });
                el.value.clone_from(value);
            }
            MockEffect::Show(key) => {
                let el = self.elements.entry(key.clone()).or_default();
                el.visible = true;
                if el.count == 0 {
                    el.count = 1;
                }
            }
            MockEffect::Remove(key) => {
                self.elements.remove(key);
            }
            MockEffect::Navigate(url) => {
                self.url.clone_from(url);
            }
        }
    }

    fn lookup(&self, selector: &Selector) -> Option<&MockElement> {
        self.elements.get(&selector.to_string())
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn navigate(&mut self, url: &str) -> ComprobarResult<()> {
        self.history.push(format!("navigate:{url}"));
        self.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> ComprobarResult<String> {
        Ok(self.url.clone())
    }

    async fn click(&mut self, selector: &Selector) -> ComprobarResult<bool> {
        let key = selector.to_string();
        self.history.push(format!("click:{key}"));
        if self.lookup(selector).is_none() {
            return Ok(false);
        }
        if let Some(effects) = self.click_effects.get(&key).cloned() {
            for effect in &effects {
                self.apply(effect);
            }
        }
        Ok(true)
    }

    async fn fill(&mut self, selector: &Selector, text: &str) -> ComprobarResult<bool> {
        let key = selector.to_string();
        self.history.push(format!("fill:{key}={text}"));
        match self.elements.get_mut(&key) {
            Some(el) => {
                el.value = text.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn select_option(&mut self, selector: &Selector, value: &str) -> ComprobarResult<bool> {
        let key = selector.to_string();
        self.history.push(format!("select:{key}={value}"));
        match self.elements.get_mut(&key) {
            Some(el) => {
                el.value = value.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn press_key(&mut self, key: &str) -> ComprobarResult<()> {
        self.history.push(format!("press:{key}"));
        Ok(())
    }

    async fn text_content(&self, selector: &Selector) -> ComprobarResult<Option<String>> {
        Ok(self.lookup(selector).map(|el| el.text.clone()))
    }

    async fn input_value(&self, selector: &Selector) -> ComprobarResult<Option<String>> {
        Ok(self.lookup(selector).map(|el| el.value.clone()))
    }

    async fn is_visible(&self, selector: &Selector) -> ComprobarResult<bool> {
        Ok(self.lookup(selector).is_some_and(|el| el.visible))
    }

    async fn count(&self, selector: &Selector) -> ComprobarResult<usize> {
        Ok(self.lookup(selector).map_or(0, |el| el.count))
    }

    async fn close(&mut self) -> ComprobarResult<()> {
        self.history.push("close".to_string());
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn badge() -> Selector {
        Selector::css("[data-test='nav-cart'] .badge")
    }

    #[tokio::test]
    async fn test_navigate_records_url() {
        let mut driver = MockDriver::new();
        driver.navigate("https://shop.example/product/1").await.unwrap();
        assert_eq!(
            driver.current_url().await.unwrap(),
            "https://shop.example/product/1"
        );
        assert!(driver.was_called("navigate:"));
    }

    #[tokio::test]
    async fn test_click_missing_element_reports_unresolved() {
        let mut driver = MockDriver::new();
        let resolved = driver.click(&Selector::test_id("add-to-cart")).await.unwrap();
        assert!(!resolved);
    }

    #[tokio::test]
    async fn test_click_effect_mutates_document() {
        let add = Selector::test_id("add-to-cart");
        let mut driver = MockDriver::new()
            .with_element(&add, MockElement::text("Add to cart"))
            .on_click(
                &add,
                vec![MockEffect::SetText(badge().to_string(), "1".to_string())],
            );

        assert!(driver.click(&add).await.unwrap());
        assert_eq!(
            driver.text_content(&badge()).await.unwrap(),
            Some("1".to_string())
        );
    }

    #[tokio::test]
    async fn test_fill_updates_value() {
        let quantity = Selector::test_id("quantity");
        let mut driver =
            MockDriver::new().with_element(&quantity, MockElement::value("1"));
        assert!(driver.fill(&quantity, "3").await.unwrap());
        assert_eq!(
            driver.input_value(&quantity).await.unwrap(),
            Some("3".to_string())
        );
    }

    #[tokio::test]
    async fn test_hidden_element_is_not_visible() {
        let success = Selector::text("Thanks for your message!");
        let driver = MockDriver::new()
            .with_element(&success, MockElement::text("Thanks for your message!").hidden());
        assert!(!driver.is_visible(&success).await.unwrap());
        assert_eq!(driver.count(&success).await.unwrap(), 1);
    }
}
