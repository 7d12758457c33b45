//! Page objects for the demo shop.
//!
//! Each page object owns its locator registry and a borrowed session, and
//! is the only code that touches the locators it declares. Scenarios talk
//! to page objects exclusively.

mod contact;
mod shop;

pub use contact::{ContactLocators, ContactPage};
pub use shop::{ShopLocators, ShopPage};
