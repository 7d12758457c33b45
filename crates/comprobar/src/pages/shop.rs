//! Product and cart pages.
//!
//! One page object covers the product detail page, the cart badge in the
//! nav, and the checkout cart view, mirroring how a shopper moves between
//! them within a single journey.

use tracing::info;

use crate::assertion::expect;
use crate::config::SiteConfig;
use crate::locator::{Locator, Selector};
use crate::money::Price;
use crate::page::PageObject;
use crate::registry::LocatorRegistry;
use crate::result::{ComprobarError, ComprobarResult};
use crate::session::Session;

/// Locators for the product page, nav cart, and checkout cart view
#[derive(Debug, Clone)]
pub struct ShopLocators {
    product_link: Locator,
    product_title: Locator,
    product_price: Locator,
    quantity_input: Locator,
    increase_quantity: Locator,
    decrease_quantity: Locator,
    add_to_cart: Locator,
    nav_cart: Locator,
    cart_badge: Locator,
    cart_product_title: Locator,
    cart_product_quantity: Locator,
    cart_product_price: Locator,
    cart_total: Locator,
    proceed: Locator,
    continue_shopping: Locator,
}

impl ShopLocators {
    /// Build the fixed mapping; `product_link_name` comes from the site
    /// fixture because the home page lists products by name.
    #[must_use]
    pub fn new(product_link_name: &str) -> Self {
        Self {
            product_link: Locator::from_selector(Selector::role("link", product_link_name)),
            product_title: Locator::new("h1"),
            product_price: Locator::new(".card-title").with_text("$"),
            quantity_input: Locator::test_id("quantity"),
            increase_quantity: Locator::test_id("increase-quantity"),
            decrease_quantity: Locator::test_id("decrease-quantity"),
            add_to_cart: Locator::test_id("add-to-cart"),
            nav_cart: Locator::test_id("nav-cart"),
            cart_badge: Locator::new("[data-test='nav-cart'] .badge"),
            cart_product_title: Locator::test_id("product-title"),
            cart_product_quantity: Locator::test_id("product-quantity"),
            cart_product_price: Locator::test_id("product-price"),
            cart_total: Locator::test_id("cart-total"),
            proceed: Locator::test_id("proceed-1"),
            continue_shopping: Locator::test_id("continue-shopping"),
        }
    }
}

impl LocatorRegistry for ShopLocators {
    fn page_name(&self) -> &'static str {
        "shop"
    }

    fn entries(&self) -> Vec<(&'static str, &Locator)> {
        vec![
            ("product-link", &self.product_link),
            ("product-title", &self.product_title),
            ("product-price", &self.product_price),
            ("quantity", &self.quantity_input),
            ("increase-quantity", &self.increase_quantity),
            ("decrease-quantity", &self.decrease_quantity),
            ("add-to-cart", &self.add_to_cart),
            ("nav-cart", &self.nav_cart),
            ("cart-badge", &self.cart_badge),
            ("cart-product-title", &self.cart_product_title),
            ("cart-product-quantity", &self.cart_product_quantity),
            ("cart-product-price", &self.cart_product_price),
            ("cart-total", &self.cart_total),
            ("proceed", &self.proceed),
            ("continue-shopping", &self.continue_shopping),
        ]
    }
}

/// Page object for the product and cart flow
#[derive(Debug)]
pub struct ShopPage<'a> {
    session: &'a Session,
    site: SiteConfig,
    locators: ShopLocators,
}

impl<'a> ShopPage<'a> {
    /// Bind to a session and site fixture
    #[must_use]
    pub fn new(session: &'a Session, site: SiteConfig) -> Self {
        let locators = ShopLocators::new(&site.product_link_name);
        Self {
            session,
            site,
            locators,
        }
    }

    /// The site fixture this page is bound to
    #[must_use]
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Open the shop home page
    pub async fn open_home(&self) -> ComprobarResult<()> {
        self.session.goto(&self.site.home_url()).await
    }

    /// Open the configured product's detail page from the home page and
    /// wait until it is interactive
    pub async fn open_product(&self) -> ComprobarResult<()> {
        info!(product = %self.site.product_name, "open product page");
        self.open_home().await?;
        self.session.click(&self.locators.product_link).await?;
        expect(self.session, &self.locators.add_to_cart)
            .to_be_visible()
            .await
    }

    /// Open the cart view directly and wait for the line items to render
    pub async fn open_cart(&self) -> ComprobarResult<()> {
        self.session.goto(&self.site.checkout_url()).await?;
        expect(self.session, &self.locators.cart_product_title)
            .to_be_visible()
            .await
    }

    /// Follow the nav cart link and wait for the checkout URL
    pub async fn open_cart_via_nav(&self) -> ComprobarResult<()> {
        self.session.click(&self.locators.nav_cart).await?;
        self.session.wait_for_url("**/checkout").await
    }

    /// Return from the cart view to the shop
    pub async fn continue_shopping(&self) -> ComprobarResult<()> {
        self.session.click(&self.locators.continue_shopping).await
    }

    /// Move from the cart view to the sign-in step
    pub async fn proceed_to_checkout(&self) -> ComprobarResult<()> {
        self.session.click(&self.locators.proceed).await
    }

    // ------------------------------------------------------------------
    // Product page actions
    // ------------------------------------------------------------------

    /// Displayed product title
    pub async fn product_title(&self) -> ComprobarResult<String> {
        self.session
            .text_content(&self.locators.product_title)
            .await?
            .map(|t| t.trim().to_string())
            .ok_or_else(|| ComprobarError::ResolutionTimeout {
                selector: self.locators.product_title.to_string(),
                timeout_ms: 0,
            })
    }

    /// Displayed unit price, parsed
    pub async fn displayed_unit_price(&self) -> ComprobarResult<Price> {
        let text = self.session.stable_text(&self.locators.product_price).await?;
        Price::parse(&text)
    }

    /// Type a quantity into the product page quantity field
    pub async fn fill_quantity(&self, quantity: u32) -> ComprobarResult<()> {
        self.session
            .fill(&self.locators.quantity_input, &quantity.to_string())
            .await
    }

    /// Bump the quantity with the stepper
    pub async fn increase_quantity(&self) -> ComprobarResult<()> {
        self.session.click(&self.locators.increase_quantity).await
    }

    /// Lower the quantity with the stepper
    pub async fn decrease_quantity(&self) -> ComprobarResult<()> {
        self.session.click(&self.locators.decrease_quantity).await
    }

    /// Add the currently selected quantity to the cart
    pub async fn add_to_cart(&self) -> ComprobarResult<()> {
        self.session.click(&self.locators.add_to_cart).await
    }

    /// Set a quantity (when above one) and add to cart
    pub async fn add_to_cart_with_quantity(&self, quantity: u32) -> ComprobarResult<()> {
        if quantity > 1 {
            self.fill_quantity(quantity).await?;
        }
        self.add_to_cart().await
    }

    // ------------------------------------------------------------------
    // Cart expectations
    // ------------------------------------------------------------------

    /// The nav badge shows exactly this count
    pub async fn expect_badge_count(&self, count: u32) -> ComprobarResult<()> {
        expect(self.session, &self.locators.cart_badge)
            .to_have_text(&count.to_string())
            .await
    }

    /// Current badge count, parsed
    pub async fn badge_count(&self) -> ComprobarResult<u32> {
        let text = self.session.stable_text(&self.locators.cart_badge).await?;
        text.trim()
            .parse()
            .map_err(|_| ComprobarError::AssertionMismatch {
                subject: self.locators.cart_badge.to_string(),
                expected: "a number".to_string(),
                observed: text.trim().to_string(),
            })
    }

    /// The cart line names this product
    pub async fn expect_cart_product(&self, name: &str) -> ComprobarResult<()> {
        expect(self.session, &self.locators.cart_product_title)
            .to_contain_text(name)
            .await
    }

    /// The cart line quantity input holds this value
    pub async fn expect_cart_quantity(&self, quantity: u32) -> ComprobarResult<()> {
        expect(self.session, &self.locators.cart_product_quantity)
            .to_have_value(&quantity.to_string())
            .await
    }

    /// Current cart line quantity, parsed
    pub async fn cart_quantity(&self) -> ComprobarResult<u32> {
        let value = self
            .session
            .input_value(&self.locators.cart_product_quantity)
            .await?
            .unwrap_or_default();
        value
            .trim()
            .parse()
            .map_err(|_| ComprobarError::AssertionMismatch {
                subject: self.locators.cart_product_quantity.to_string(),
                expected: "a number".to_string(),
                observed: value,
            })
    }

    /// The cart line's unit price equals this amount (numeric comparison)
    pub async fn expect_cart_unit_price(&self, expected: Price) -> ComprobarResult<()> {
        self.expect_price(&self.locators.cart_product_price, expected)
            .await
    }

    /// The cart total equals this amount (numeric comparison)
    pub async fn expect_cart_total(&self, expected: Price) -> ComprobarResult<()> {
        self.expect_price(&self.locators.cart_total, expected).await
    }

    /// Full cart-line check: product, quantity, unit price, total.
    /// Halts at the first failing field.
    pub async fn verify_cart_line(
        &self,
        name: &str,
        quantity: u32,
        unit_price: Price,
    ) -> ComprobarResult<()> {
        self.expect_cart_product(name).await?;
        self.expect_cart_quantity(quantity).await?;
        self.expect_cart_unit_price(unit_price).await?;
        self.expect_cart_total(unit_price.times(quantity)?).await
    }

    /// The badge equals the cart line quantity (single-line carts)
    pub async fn expect_badge_matches_cart(&self) -> ComprobarResult<()> {
        let badge = self.badge_count().await?;
        let in_cart = self.cart_quantity().await?;
        if badge == in_cart {
            Ok(())
        } else {
            Err(ComprobarError::AssertionMismatch {
                subject: "cart badge vs line quantities".to_string(),
                expected: in_cart.to_string(),
                observed: badge.to_string(),
            })
        }
    }

    /// Change the cart line quantity and wait for the total to settle
    pub async fn set_cart_quantity(&self, quantity: u32) -> ComprobarResult<()> {
        self.session
            .fill(&self.locators.cart_product_quantity, &quantity.to_string())
            .await?;
        // The shop recalculates the total asynchronously; wait for the
        // displayed value to stop moving instead of sleeping.
        let _ = self.session.stable_text(&self.locators.cart_total).await?;
        Ok(())
    }

    /// Waits for a displayed price to settle, then compares numerically
    async fn expect_price(&self, locator: &Locator, expected: Price) -> ComprobarResult<()> {
        let text = self.session.stable_text(locator).await?;
        let observed = Price::parse(&text)?;
        if observed == expected {
            Ok(())
        } else {
            Err(ComprobarError::AssertionMismatch {
                subject: locator.to_string(),
                expected: expected.to_string(),
                observed: observed.to_string(),
            })
        }
    }
}

impl PageObject for ShopPage<'_> {
    fn url_pattern(&self) -> &str {
        "/"
    }

    fn registry(&self) -> &dyn LocatorRegistry {
        &self.locators
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::{MockDriver, MockElement};
    use std::time::Duration;

    fn session(driver: MockDriver) -> Session {
        Session::with_options(
            driver,
            crate::session::SessionOptions::default()
                .with_action_timeout(Duration::from_millis(150)),
        )
    }

    fn badge_key() -> Selector {
        Selector::css("[data-test='nav-cart'] .badge")
    }

    #[test]
    fn test_registry_is_fixed_and_named() {
        let locators = ShopLocators::new("Combination Pliers");
        assert_eq!(locators.page_name(), "shop");
        assert!(locators.get("add-to-cart").is_some());
        assert!(locators.get("cart-total").is_some());
        assert_eq!(locators.entries().len(), 15);
    }

    #[tokio::test]
    async fn test_expect_cart_total_compares_numerically() {
        let driver = MockDriver::new()
            .with_element(&Selector::test_id("cart-total"), MockElement::text("$42.45"));
        let session = session(driver);
        let shop = ShopPage::new(&session, SiteConfig::default());

        let expected = Price::parse("$42.45").unwrap();
        shop.expect_cart_total(expected).await.unwrap();

        let err = shop
            .expect_cart_total(Price::parse("$14.15").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.expected_observed(), Some(("$14.15", "$42.45")));
    }

    #[tokio::test]
    async fn test_badge_matches_cart_line() {
        let driver = MockDriver::new()
            .with_element(&badge_key(), MockElement::text("3"))
            .with_element(
                &Selector::test_id("product-quantity"),
                MockElement::value("3"),
            );
        let session = session(driver);
        let shop = ShopPage::new(&session, SiteConfig::default());
        shop.expect_badge_matches_cart().await.unwrap();
    }

    #[tokio::test]
    async fn test_badge_mismatch_is_reported() {
        let driver = MockDriver::new()
            .with_element(&badge_key(), MockElement::text("2"))
            .with_element(
                &Selector::test_id("product-quantity"),
                MockElement::value("3"),
            );
        let session = session(driver);
        let shop = ShopPage::new(&session, SiteConfig::default());
        let err = shop.expect_badge_matches_cart().await.unwrap_err();
        assert_eq!(err.expected_observed(), Some(("3", "2")));
    }

    #[tokio::test]
    async fn test_add_to_cart_with_quantity_skips_fill_for_one() {
        let add = Selector::test_id("add-to-cart");
        let driver = MockDriver::new().with_element(&add, MockElement::text("Add to cart"));
        let session = session(driver);
        let shop = ShopPage::new(&session, SiteConfig::default());
        shop.add_to_cart_with_quantity(1).await.unwrap();
    }
}
