//! Money parsing and formatting using rust_decimal
//!
//! JSON numbers are converted from their textual form, never through `f64`,
//! so `2.505` stays exactly `2.505`.

use std::str::FromStr;

use rust_decimal::prelude::*;
use serde_json::Number;

/// Displayed decimal places
const DECIMAL_PLACES: u32 = 2;

/// Convert a JSON number into an exact decimal
pub fn decimal_from_json(n: &Number) -> Option<Decimal> {
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Round to 2 places, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Format with exactly 2 decimal places
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", round_money(value))
}
