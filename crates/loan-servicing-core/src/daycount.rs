//! Day-count arithmetic for daily interest accrual.
//!
//! Elapsed time is measured in whole calendar days between two dates
//! (year/month/day only, no time-of-day), which keeps the accrual free of
//! timezone drift. Out-of-order or same-day events yield zero days, never
//! negative accrual.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{to_cents, Money, Rate};

/// Whole calendar days from `from` to `to`, floored at zero.
pub fn elapsed_days(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days().max(0)
}

/// Simple daily interest for one period, rounded to the cent.
///
/// `balance * annual_rate * days / day_base`, computed on the balance
/// before the period's payment. Interest never compounds within a period.
pub fn period_interest(balance: Money, annual_rate: Rate, days: i64, day_base: Decimal) -> Money {
    to_cents(balance * annual_rate * Decimal::from(days) / day_base)
}
