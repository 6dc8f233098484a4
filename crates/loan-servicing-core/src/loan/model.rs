//! Loan aggregate: contract config, installment schedule, arrears, audit
//! trail and the allocation ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::arrears::ArrearsItem;
use crate::types::{now_iso, Money, Rate};

/// Fallback contract terms applied when the stored config is incomplete.
pub const DEFAULT_ANNUAL_RATE: Rate = dec!(0.1899);
pub const DEFAULT_DAY_COUNT_BASE: Decimal = dec!(365);
pub const DEFAULT_START_BALANCE: Money = dec!(2250.00);
pub const DEFAULT_NSF_FEE: Money = dec!(48);
pub const DEFAULT_REPORT_FEE: Money = dec!(25);

/// Per-installment collection state machine.
///
/// `None -> {Posted, Partial, Nsf}`; a retry resets `Nsf` back to `None`.
/// Posted lines may be re-posted: the later posting deliberately overrides
/// the recorded facts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionStatus {
    /// Scheduled, nothing collected yet.
    #[default]
    None,
    /// Collected in full.
    Posted,
    /// Collected short of the planned amount.
    Partial,
    /// Collection rejected for non-sufficient funds.
    Nsf,
}

/// Collection channel for a scheduled line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionMethod {
    /// Pre-authorized debit.
    #[default]
    Pad,
    /// Manual transfer line created by arrears resolution.
    Transfer,
}

/// Contract-level terms driving the recompute.
///
/// Optional numerics fall back to the documented defaults so a sparse
/// config still yields a schedule: a configuration default, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanConfig {
    /// Contract origin date; day counts for the first line accrue from here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_start_date: Option<NaiveDate>,
    /// Amount financed at origination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_balance: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rate: Option<Rate>,
    /// Day-count base, e.g. 365 for ACT/365.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_count_base: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_nsf_fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_report_fee: Option<Money>,
    /// Apply collected money to open arrears before any other bucket.
    #[serde(default)]
    pub arrears_first: bool,
}

impl LoanConfig {
    pub fn rate(&self) -> Rate {
        self.annual_rate.unwrap_or(DEFAULT_ANNUAL_RATE)
    }

    /// Day-count base; non-positive values count as malformed and default.
    pub fn day_base(&self) -> Decimal {
        match self.day_count_base {
            Some(base) if base > Decimal::ZERO => base,
            _ => DEFAULT_DAY_COUNT_BASE,
        }
    }

    pub fn opening_balance(&self) -> Money {
        self.start_balance.unwrap_or(DEFAULT_START_BALANCE)
    }

    /// Contract origin date; falls back to the earliest scheduled line.
    pub fn start_date(&self, schedule: &[Installment]) -> NaiveDate {
        self.contract_start_date
            .or_else(|| schedule.iter().map(|row| row.due_date).min())
            .unwrap_or_default()
    }

    pub fn nsf_fee(&self) -> Money {
        self.default_nsf_fee.unwrap_or(DEFAULT_NSF_FEE)
    }

    pub fn report_fee(&self) -> Money {
        self.default_report_fee.unwrap_or(DEFAULT_REPORT_FEE)
    }
}

/// One scheduled obligation in the loan's schedule.
///
/// Scheduled fields are written by the event mutators. The derived block is
/// overwritten in full on every recompute and must never be read stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// Sequence index; immutable identity, unique within the loan.
    #[serde(rename = "i")]
    pub seq: u32,
    #[serde(rename = "date")]
    pub due_date: NaiveDate,
    /// Base amount due.
    #[serde(rename = "total")]
    pub base: Money,
    /// Admission-fee portion; does not accrue interest.
    pub adhesion: Money,
    /// Arrears redistributed onto this line.
    pub adjustment: Money,
    pub method: CollectionMethod,
    pub status: CollectionStatus,
    pub collected_amount: Money,
    /// Actual collection date; `None` until collected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_date: Option<NaiveDate>,
    /// Arrears-first election recorded by the posting that collected this
    /// line; overrides the loan-wide flag for its allocation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrears_first_override: Option<bool>,

    // Derived block, written only by the recompute engine.
    pub elapsed_days: i64,
    pub interest: Money,
    pub capital: Money,
    pub balance_before: Money,
    pub balance_after: Money,
    pub allocation: Allocation,
}

impl Installment {
    /// A freshly scheduled line with no collection recorded.
    pub fn scheduled(
        seq: u32,
        due_date: NaiveDate,
        base: Money,
        adhesion: Money,
        method: CollectionMethod,
    ) -> Self {
        Self {
            seq,
            due_date,
            base,
            adhesion,
            adjustment: Decimal::ZERO,
            method,
            status: CollectionStatus::None,
            collected_amount: Decimal::ZERO,
            collection_date: None,
            arrears_first_override: None,
            elapsed_days: 0,
            interest: Decimal::ZERO,
            capital: Decimal::ZERO,
            balance_before: Decimal::ZERO,
            balance_after: Decimal::ZERO,
            allocation: Allocation::default(),
        }
    }

    /// Base amount plus redistributed arrears: what this line should collect.
    pub fn planned_amount(&self) -> Money {
        self.base + self.adjustment
    }

    pub fn is_collected(&self) -> bool {
        matches!(
            self.status,
            CollectionStatus::Posted | CollectionStatus::Partial
        )
    }
}

/// Append-only audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub ts: String,
    pub title: String,
    #[serde(rename = "txt")]
    pub detail: String,
}

/// Allocation record appended by each posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub line: u32,
    pub amount: Money,
    pub allocation: Allocation,
    pub posted_at: String,
}

/// Aggregate root: one serviced loan file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(rename = "loanId")]
    pub id: String,
    pub config: LoanConfig,
    pub schedule: Vec<Installment>,
    pub arrears_items: Vec<ArrearsItem>,
    pub events: Vec<Event>,
    pub ledger: Vec<LedgerEntry>,
    /// Next arrears creation sequence; FIFO tie-break for equal timestamps.
    pub arrears_seq: u64,
}

impl Loan {
    pub fn installment(&self, seq: u32) -> Option<&Installment> {
        self.schedule.iter().find(|row| row.seq == seq)
    }

    pub fn installment_mut(&mut self, seq: u32) -> Option<&mut Installment> {
        self.schedule.iter_mut().find(|row| row.seq == seq)
    }

    /// Next free installment sequence index.
    pub fn next_line_seq(&self) -> u32 {
        self.schedule.iter().map(|row| row.seq).max().unwrap_or(0) + 1
    }

    pub fn push_event(&mut self, title: &str, detail: impl Into<String>) {
        self.events.push(Event {
            ts: now_iso(),
            title: title.to_string(),
            detail: detail.into(),
        });
    }
}
