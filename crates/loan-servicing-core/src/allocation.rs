//! Payment allocation waterfall.
//!
//! Splits one collected amount across the competing due buckets in strict
//! priority order: open arrears (when arrears-first is elected), admission
//! fee, accrued interest, then principal. Each bucket is capped at its own
//! due amount except principal, which absorbs the residual.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Breakdown of one collected amount across the due buckets.
///
/// Conservation holds for every allocation:
/// `to_arrears + to_adhesion + to_interest + to_principal + surplus`
/// equals the allocated amount exactly, and no bucket is ever negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub to_arrears: Money,
    pub to_adhesion: Money,
    pub to_interest: Money,
    pub to_principal: Money,
    /// Exists so ledger records carry a complete split; zero in practice,
    /// since any excess over known dues lands in `to_principal`.
    pub surplus: Money,
}

impl Allocation {
    /// Sum of every bucket; equals the allocated amount.
    pub fn total(&self) -> Money {
        self.to_arrears + self.to_adhesion + self.to_interest + self.to_principal + self.surplus
    }
}

/// Apply `amount` against the dues in strict priority order.
///
/// A zero (or negative, defensively coerced) amount yields an all-zero
/// allocation. Negative dues are treated as zero.
pub fn allocate(
    amount: Money,
    adhesion_due: Money,
    interest_due: Money,
    arrears_due: Money,
    arrears_first: bool,
) -> Allocation {
    let mut remaining = amount.max(Decimal::ZERO);
    let mut alloc = Allocation::default();

    if arrears_first && arrears_due > Decimal::ZERO {
        alloc.to_arrears = remaining.min(arrears_due);
        remaining -= alloc.to_arrears;
    }

    alloc.to_adhesion = remaining.min(adhesion_due.max(Decimal::ZERO));
    remaining -= alloc.to_adhesion;

    alloc.to_interest = remaining.min(interest_due.max(Decimal::ZERO));
    remaining -= alloc.to_interest;

    alloc.to_principal = remaining;
    alloc
}
