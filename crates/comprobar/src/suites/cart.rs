//! Cart acceptance scenarios.
//!
//! These follow a shopper through the product page and the cart view,
//! checking the nav badge and every cart-line field after each change.
//! Each step rebuilds its page object because page objects borrow the
//! scenario's session.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::pages::ShopPage;
use crate::runner::Suite;
use crate::scenario::Scenario;
use crate::session::Session;

/// The cart suite against the given site
#[must_use]
pub fn cart_suite(site: &SiteConfig) -> Suite {
    Suite::new("cart")
        .scenario(add_single_item(site))
        .scenario(add_one_then_two_more(site))
        .scenario(badge_tracks_cart_lines(site))
        .scenario(cart_survives_navigation(site))
}

// Clones the site fixture into a step closure and hands the body a ready
// ShopPage bound to the scenario's session.
macro_rules! shop_step {
    ($site:expr, |$shop:ident| $body:block) => {{
        let site = $site.clone();
        move |session: Arc<Session>| {
            let site = site.clone();
            async move {
                let $shop = ShopPage::new(&session, site);
                $body
            }
        }
    }};
}

fn add_single_item(site: &SiteConfig) -> Scenario {
    Scenario::new("add single item shows badge and cart line")
        .step(
            "open product page",
            shop_step!(site, |shop| { shop.open_product().await }),
        )
        .step(
            "add one unit",
            shop_step!(site, |shop| { shop.add_to_cart().await }),
        )
        .step(
            "badge shows 1",
            shop_step!(site, |shop| { shop.expect_badge_count(1).await }),
        )
        .step(
            "cart line matches product",
            shop_step!(site, |shop| {
                shop.open_cart_via_nav().await?;
                shop.verify_cart_line(
                    &shop.site().product_name,
                    1,
                    shop.site().unit_price,
                )
                .await
            }),
        )
}

fn add_one_then_two_more(site: &SiteConfig) -> Scenario {
    Scenario::new("adding more units accumulates quantity and total")
        .step(
            "open product page",
            shop_step!(site, |shop| { shop.open_product().await }),
        )
        .step(
            "add one unit",
            shop_step!(site, |shop| { shop.add_to_cart().await }),
        )
        .step(
            "add two more units",
            shop_step!(site, |shop| { shop.add_to_cart_with_quantity(2).await }),
        )
        .step(
            "badge shows 3",
            shop_step!(site, |shop| { shop.expect_badge_count(3).await }),
        )
        .step(
            "cart totals three units",
            shop_step!(site, |shop| {
                shop.open_cart_via_nav().await?;
                shop.verify_cart_line(
                    &shop.site().product_name,
                    3,
                    shop.site().unit_price,
                )
                .await
            }),
        )
}

fn badge_tracks_cart_lines(site: &SiteConfig) -> Scenario {
    Scenario::new("badge equals cart line quantity on repeated reads")
        .step(
            "add three units",
            shop_step!(site, |shop| {
                shop.open_product().await?;
                shop.add_to_cart_with_quantity(3).await
            }),
        )
        .step(
            "badge matches cart",
            shop_step!(site, |shop| {
                shop.open_cart_via_nav().await?;
                shop.expect_badge_matches_cart().await
            }),
        )
        .step(
            "badge is stable without actions",
            shop_step!(site, |shop| {
                shop.expect_badge_matches_cart().await?;
                shop.expect_badge_count(3).await
            }),
        )
}

fn cart_survives_navigation(site: &SiteConfig) -> Scenario {
    Scenario::new("cart line survives leaving and re-entering the cart")
        .step(
            "add one unit",
            shop_step!(site, |shop| {
                shop.open_product().await?;
                shop.add_to_cart().await
            }),
        )
        .step(
            "check the cart",
            shop_step!(site, |shop| {
                shop.open_cart_via_nav().await?;
                shop.verify_cart_line(
                    &shop.site().product_name,
                    1,
                    shop.site().unit_price,
                )
                .await
            }),
        )
        .step(
            "shop some more, then return",
            shop_step!(site, |shop| {
                shop.continue_shopping().await?;
                shop.open_cart_via_nav().await
            }),
        )
        .step(
            "cart line is unchanged",
            shop_step!(site, |shop| {
                shop.verify_cart_line(
                    &shop.site().product_name,
                    1,
                    shop.site().unit_price,
                )
                .await
            }),
        )
}
