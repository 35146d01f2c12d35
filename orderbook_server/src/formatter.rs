//! Text rendering of order book results.
//!
//! Each side is rendered on its own line as `<label>: <entry>; <entry>; ...`, where an entry
//! is `<price to 2dp> (<quantity>)`. When a side has no list (too old, nothing active) the
//! side's message takes the place of the entries.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::quote::Quote;

/// Separator between rendered quotes.
pub const DELIMITER: &str = "; ";

/// Formats a price with exactly two decimals, rounding half away from zero.
///
/// Rounding works on the shortest decimal text of the double (`1.005` rounds to `1.01`),
/// not on its binary expansion. Values the decimal type cannot hold fall back to `{:.2}`.
pub fn format_price(price: f64) -> String {
    match Decimal::from_str(&price.to_string()) {
        Ok(decimal) => format!(
            "{:.2}",
            decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        Err(_) => format!("{:.2}", price),
    }
}

/// Renders `label: q1; q2; ...` using `render` for each quote.
pub fn format(label: &str, quotes: &[Arc<Quote>], render: fn(&Quote) -> String) -> String {
    let entries: Vec<String> = quotes.iter().map(|q| render(q)).collect();
    format!("{}: {}", label, entries.join(DELIMITER))
}

/// Renders `label: message` for a side that produced no list.
pub fn format_message(label: &str, message: &str) -> String {
    format!("{}: {}", label, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quote::fixtures::quote;

    fn bid(q: &Quote) -> String {
        format!("{} ({})", format_price(q.bid_price), q.bid_quantity)
    }

    #[test]
    fn prices_have_two_decimals() {
        assert_eq!(format_price(128.28), "128.28");
        assert_eq!(format_price(128.3), "128.30");
        assert_eq!(format_price(2.0), "2.00");
        assert_eq!(format_price(0.0), "0.00");
    }

    #[test]
    fn prices_round_half_up() {
        assert_eq!(format_price(1.005), "1.01");
        assert_eq!(format_price(0.125), "0.13");
        assert_eq!(format_price(128.274), "128.27");
        assert_eq!(format_price(128.2751), "128.28");
    }

    #[test]
    fn extreme_values_still_render() {
        assert_eq!(format_price(f64::NAN), "NaN");
        assert!(format_price(1e300).ends_with(".00"));
    }

    #[test]
    fn joins_entries_with_label() {
        let quotes = vec![
            Arc::new(quote("a", "z", 128.28, 300)),
            Arc::new(quote("a", "z", 128.27, 100)),
        ];
        assert_eq!(
            format("Best Bids", &quotes, bid),
            "Best Bids: 128.28 (300); 128.27 (100)"
        );
    }

    #[test]
    fn empty_list_keeps_the_label() {
        assert_eq!(format("Best Asks", &[], bid), "Best Asks: ");
        assert_eq!(
            format_message("Best Asks", "No active asks found at this timestamp"),
            "Best Asks: No active asks found at this timestamp"
        );
    }
}
