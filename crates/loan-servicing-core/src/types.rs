use chrono::{SecondsFormat, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.1899 = 18.99%). Never as percentages.
pub type Rate = Decimal;

/// Round to the nearest cent, halves away from zero.
pub fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Current UTC instant as an RFC3339 string with millisecond precision.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_cents_rounds_half_away_from_zero() {
        assert_eq!(to_cents(dec!(17.555)), dec!(17.56));
        assert_eq!(to_cents(dec!(17.554)), dec!(17.55));
        assert_eq!(to_cents(dec!(-17.555)), dec!(-17.56));
        assert_eq!(to_cents(dec!(49.995)), dec!(50.00));
    }

    #[test]
    fn test_to_cents_preserves_exact_cents() {
        assert_eq!(to_cents(dec!(147.92)), dec!(147.92));
        assert_eq!(to_cents(dec!(0)), dec!(0));
    }
}
