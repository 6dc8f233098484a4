//! FIFO arrears ledger.
//!
//! Arrears items record the shortfall left by a rejected collection: the
//! rejected payment plus the NSF fee. Later allocations absorb them
//! oldest-first; an item whose outstanding total reaches zero is marked
//! resolved but never deleted, so the audit trail survives.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Lifecycle of a shortfall record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArrearsStatus {
    Open,
    Resolved,
}

/// A shortfall opened by a rejected collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrearsItem {
    pub id: String,
    /// Monotonic creation sequence; breaks `created_at` ties so FIFO order
    /// stays deterministic.
    pub seq: u64,
    /// Installment the rejection originated from.
    pub source_line: u32,
    /// Rejected payment portion.
    pub amount: Money,
    /// NSF fee portion.
    pub fee: Money,
    /// Outstanding total; non-increasing once created.
    pub total: Money,
    pub status: ArrearsStatus,
    pub created_at: String,
}

/// Result of a FIFO closure pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FifoOutcome {
    /// Items whose outstanding total reached zero in this pass.
    pub closed_count: usize,
    /// Amount left unapplied after every open item was exhausted.
    pub leftover: Money,
}

/// Sum of all open items' outstanding totals.
pub fn open_total(items: &[ArrearsItem]) -> Money {
    items
        .iter()
        .filter(|item| item.status == ArrearsStatus::Open)
        .map(|item| item.total)
        .sum()
}

/// Absorb `amount` into the open items, oldest first.
///
/// Order is ascending `(created_at, seq)`. An item smaller than the
/// remaining amount is zeroed and resolved; the first larger item is
/// reduced by the remainder and stays open.
pub fn close_fifo(items: &mut [ArrearsItem], amount: Money) -> FifoOutcome {
    let mut remaining = amount.max(Decimal::ZERO);
    let mut closed_count = 0;

    let mut order: Vec<usize> = (0..items.len())
        .filter(|&idx| items[idx].status == ArrearsStatus::Open)
        .collect();
    order.sort_by(|&a, &b| {
        items[a]
            .created_at
            .cmp(&items[b].created_at)
            .then(items[a].seq.cmp(&items[b].seq))
    });

    for idx in order {
        if remaining <= Decimal::ZERO {
            break;
        }
        let item = &mut items[idx];
        if remaining >= item.total {
            remaining -= item.total;
            item.total = Decimal::ZERO;
            item.status = ArrearsStatus::Resolved;
            closed_count += 1;
        } else {
            item.total -= remaining;
            remaining = Decimal::ZERO;
        }
    }

    FifoOutcome {
        closed_count,
        leftover: remaining,
    }
}
