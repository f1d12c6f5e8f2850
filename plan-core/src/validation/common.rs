//! Numeric parsing shared by the validators.
//!
//! Plan quantities are stored as the strings the user typed. They are only
//! interpreted here, so every validator agrees on what counts as a number.

use rust_decimal::Decimal;

/// Normalizes input for decimal parsing: trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a quantity string into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,250"`). Returns `None`
/// both for empty input and for input that is not a number, so a
/// non-numeric value fails every "greater than zero" check instead of
/// raising a fault.
pub fn parse_quantity(s: &str) -> Option<Decimal> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return None;
    }
    normalized.parse().map_or_else(
        |e| {
            tracing::debug!(input = %s, "non-numeric quantity: {}", e);
            None
        },
        Some,
    )
}

/// `true` when `s` has nothing but whitespace.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Sums quantity strings, counting anything that is not a number as zero.
///
/// `None` when the sum does not fit in a [`Decimal`].
pub fn sum_quantities<'a, I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .filter_map(parse_quantity)
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
}

/// Rounds for display with half-up rounding.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_quantity_accepts_comma_thousands_separator() {
        assert_eq!(parse_quantity("1,250"), Some(dec!(1250)));
        assert_eq!(parse_quantity("1,234,567.89"), Some(dec!(1234567.89)));
    }

    #[test]
    fn parse_quantity_trims_whitespace() {
        assert_eq!(parse_quantity("  12.5  "), Some(dec!(12.5)));
    }

    #[test]
    fn parse_quantity_empty_is_none() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("   "), None);
    }

    #[test]
    fn parse_quantity_non_numeric_is_none() {
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("12kg"), None);
    }

    #[test]
    fn parse_quantity_keeps_sign() {
        assert_eq!(parse_quantity("-3"), Some(dec!(-3)));
    }

    #[test]
    fn sum_quantities_ignores_non_numeric_values() {
        let total = sum_quantities(["10", "", "x", "2.5"]);

        assert_eq!(total, Some(dec!(12.5)));
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        let none: [&str; 0] = [];

        assert_eq!(sum_quantities(none), Some(Decimal::ZERO));
    }

    #[test]
    fn sum_past_decimal_range_is_none() {
        let max = Decimal::MAX.to_string();

        assert_eq!(sum_quantities([max.as_str(), max.as_str()]), None);
        assert_eq!(sum_quantities([max.as_str(), "-1", "1"]), Some(Decimal::MAX));
    }

    #[test]
    fn round_half_up_rounds_midpoint_away_from_zero() {
        assert_eq!(round_half_up(dec!(12.345), 2), dec!(12.35));
        assert_eq!(round_half_up(dec!(66.66), 1), dec!(66.7));
    }
}
