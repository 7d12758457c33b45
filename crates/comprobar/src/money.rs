//! Monetary values as the shop formats them.
//!
//! The shop renders prices as `$14.15`. Comparing those as strings is
//! locale-fragile, so displayed prices are parsed into integer cents and
//! compared numerically; formatting only comes back for failure messages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::result::{ComprobarError, ComprobarResult};

/// A dollar amount in integer cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    cents: i64,
}

impl Price {
    /// From integer cents
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// The amount in cents
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.cents
    }

    /// Unit price times a quantity
    pub fn times(&self, quantity: u32) -> ComprobarResult<Self> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Self::from_cents)
            .ok_or(ComprobarError::PriceOverflow {
                cents: self.cents,
                quantity,
            })
    }

    /// Parse a displayed price, tolerating surrounding whitespace
    pub fn parse(text: &str) -> ComprobarResult<Self> {
        let trimmed = text.trim();
        let bare = trimmed
            .strip_prefix('$')
            .ok_or_else(|| ComprobarError::InvalidPrice {
                text: text.to_string(),
            })?;
        let (dollars, cents) = match bare.split_once('.') {
            Some((d, c)) if c.len() == 2 => (d, c),
            None => (bare, "00"),
            Some(_) => {
                return Err(ComprobarError::InvalidPrice {
                    text: text.to_string(),
                })
            }
        };
        let dollars: i64 = dollars
            .parse()
            .map_err(|_| ComprobarError::InvalidPrice {
                text: text.to_string(),
            })?;
        let cents: i64 = cents.parse().map_err(|_| ComprobarError::InvalidPrice {
            text: text.to_string(),
        })?;
        if dollars < 0 || cents < 0 {
            return Err(ComprobarError::InvalidPrice {
                text: text.to_string(),
            });
        }
        dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .map(Self::from_cents)
            .ok_or_else(|| ComprobarError::InvalidPrice {
                text: text.to_string(),
            })
    }
}

impl FromStr for Price {
    type Err = ComprobarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let magnitude = self.cents.unsigned_abs();
        write!(f, "{sign}${}.{:02}", magnitude / 100, magnitude % 100)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_formatted_price() {
        assert_eq!(Price::parse("$14.15").unwrap().cents(), 1415);
        assert_eq!(Price::parse(" $42.45 ").unwrap().cents(), 4245);
        assert_eq!(Price::parse("$3").unwrap().cents(), 300);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Price::parse("14.15").is_err());
        assert!(Price::parse("$14.1").is_err());
        assert!(Price::parse("$").is_err());
        assert!(Price::parse("$-1.00").is_err());
    }

    #[test]
    fn test_parse_rejects_overflowing_dollars() {
        // i64::MAX dollars does not fit in cents; must be an error, not
        // a wrapping multiply.
        let text = format!("${}.00", i64::MAX);
        assert!(matches!(
            Price::parse(&text),
            Err(ComprobarError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let price = Price::from_cents(1415);
        assert_eq!(price.to_string(), "$14.15");
        assert_eq!(Price::parse(&price.to_string()).unwrap(), price);
    }

    #[test]
    fn test_display_negative_cents() {
        // Negative amounts only arise from hand-built prices, but they
        // must still render with a single leading sign.
        assert_eq!(Price::from_cents(-1).to_string(), "-$0.01");
        assert_eq!(Price::from_cents(-1415).to_string(), "-$14.15");
    }

    #[test]
    fn test_times() {
        let unit = Price::parse("$14.15").unwrap();
        assert_eq!(unit.times(3).unwrap(), Price::parse("$42.45").unwrap());
        assert_eq!(unit.times(1).unwrap(), unit);
    }

    #[test]
    fn test_times_overflow() {
        let huge = Price::from_cents(i64::MAX);
        assert!(huge.times(2).is_err());
    }

    proptest! {
        // The cart invariant: total equals unit price times cumulative
        // quantity, computed in cents.
        #[test]
        fn prop_total_is_linear_in_quantity(cents in 1i64..1_000_000, q1 in 1u32..500, q2 in 0u32..500) {
            let unit = Price::from_cents(cents);
            let a = unit.times(q1).unwrap();
            let b = unit.times(q2).unwrap();
            let total = unit.times(q1 + q2).unwrap();
            prop_assert_eq!(total.cents(), a.cents() + b.cents());
        }

        #[test]
        fn prop_display_parse_round_trip(cents in 0i64..100_000_000) {
            let price = Price::from_cents(cents);
            prop_assert_eq!(Price::parse(&price.to_string()).unwrap(), price);
        }
    }
}
