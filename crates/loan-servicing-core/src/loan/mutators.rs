//! Event mutators: the collection events that change a loan's recorded
//! facts and re-run the schedule recompute.
//!
//! Every mutator validates before touching state, so a returned error
//! leaves the loan exactly as it was.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::arrears::{close_fifo, ArrearsItem, ArrearsStatus};
use crate::engine::recompute_schedule;
use crate::error::ServicingError;
use crate::loan::model::{
    CollectionMethod, CollectionStatus, Installment, LedgerEntry, Loan,
};
use crate::types::{now_iso, to_cents, Money};
use crate::ServicingResult;

/// Record a non-sufficient-funds rejection on a line.
///
/// Opens a new arrears item for the planned amount plus the NSF fee and
/// returns its id. The line keeps its scheduled amounts but collects zero;
/// the arrears item stays open until later allocations or an explicit
/// resolution absorb it.
pub fn apply_nsf(loan: &mut Loan, line: u32, fee: Option<Money>) -> ServicingResult<String> {
    let nsf_fee = to_cents(fee.unwrap_or_else(|| loan.config.nsf_fee()).max(Decimal::ZERO));

    let row = loan
        .installment_mut(line)
        .ok_or(ServicingError::InvalidLine { line })?;
    let planned = to_cents(row.planned_amount());
    let total = to_cents(planned + nsf_fee);

    row.status = CollectionStatus::Nsf;
    row.collected_amount = Decimal::ZERO;
    row.collection_date = None;

    loan.arrears_seq += 1;
    let id = format!("A{}", loan.arrears_seq);
    loan.arrears_items.push(ArrearsItem {
        id: id.clone(),
        seq: loan.arrears_seq,
        source_line: line,
        amount: planned,
        fee: nsf_fee,
        total,
        status: ArrearsStatus::Open,
        created_at: now_iso(),
    });

    loan.push_event(
        "NSF",
        format!("Payment #{line} rejected. Arrears {planned}$ + {nsf_fee}$ = {total}$."),
    );
    recompute_schedule(loan);
    Ok(id)
}

/// Post a collection against a line.
///
/// The line becomes `PARTIAL` when the amount falls short of the planned
/// amount, `POSTED` otherwise. Re-posting an already-posted line is a
/// deliberate correction: the new facts override the old and a second
/// ledger entry is appended. After the recompute, the line's arrears share
/// is closed into the FIFO queue and the full split is written to the
/// ledger, then a second recompute folds the reduced arrears totals into
/// the schedule.
pub fn post_payment(
    loan: &mut Loan,
    line: u32,
    amount: Money,
    posted_date: Option<NaiveDate>,
    arrears_first: Option<bool>,
) -> ServicingResult<()> {
    let amount = to_cents(amount);
    if amount <= Decimal::ZERO {
        return Err(ServicingError::InvalidAmount { amount });
    }

    let row = loan
        .installment_mut(line)
        .ok_or(ServicingError::InvalidLine { line })?;
    let planned = to_cents(row.planned_amount());

    row.status = if amount < planned {
        CollectionStatus::Partial
    } else {
        CollectionStatus::Posted
    };
    row.collected_amount = amount;
    row.collection_date = Some(posted_date.unwrap_or(row.due_date));
    row.arrears_first_override = arrears_first;

    recompute_schedule(loan);

    let row = loan
        .installment(line)
        .ok_or(ServicingError::InvalidLine { line })?;
    let alloc = row.allocation.clone();
    let apply_first = row
        .arrears_first_override
        .unwrap_or(loan.config.arrears_first);
    let status = row.status;

    if apply_first && alloc.to_arrears > Decimal::ZERO {
        close_fifo(&mut loan.arrears_items, alloc.to_arrears);
    }

    loan.ledger.push(LedgerEntry {
        line,
        amount,
        allocation: alloc,
        posted_at: now_iso(),
    });
    loan.push_event(
        "Payment posted",
        format!("Payment #{line}: {amount}$ collected ({status:?})."),
    );
    recompute_schedule(loan);
    Ok(())
}

/// Reschedule an NSF line for another collection attempt.
///
/// Only valid on a line currently in NSF state. The arrears item opened by
/// the original rejection is untouched and stays open until separately
/// resolved.
pub fn retry_line(loan: &mut Loan, line: u32, new_date: Option<NaiveDate>) -> ServicingResult<()> {
    let row = loan
        .installment_mut(line)
        .ok_or(ServicingError::InvalidLine { line })?;
    if row.status != CollectionStatus::Nsf {
        return Err(ServicingError::NotNsf { line });
    }

    row.status = CollectionStatus::None;
    row.collected_amount = Decimal::ZERO;
    row.collection_date = None;
    if let Some(date) = new_date {
        row.due_date = date;
    }
    let due_date = row.due_date;

    loan.push_event(
        "Retry",
        format!("Payment #{line} rescheduled for {due_date}."),
    );
    recompute_schedule(loan);
    Ok(())
}

/// Resolve an open arrears item.
///
/// With `new_date`, the amount moves to a freshly appended transfer line.
/// Otherwise it is spread across the target lines' adjustments. Either way
/// the item is marked resolved with a zero outstanding total.
pub fn resolve_arrears(
    loan: &mut Loan,
    arrears_id: &str,
    amount: Option<Money>,
    target_lines: &[u32],
    new_date: Option<NaiveDate>,
) -> ServicingResult<()> {
    let item_idx = loan
        .arrears_items
        .iter()
        .position(|item| item.id == arrears_id && item.status == ArrearsStatus::Open)
        .ok_or_else(|| ServicingError::ArrearsNotFound {
            id: arrears_id.to_string(),
        })?;

    let amt = to_cents(amount.unwrap_or(loan.arrears_items[item_idx].total));
    if amt <= Decimal::ZERO {
        return Err(ServicingError::InvalidAmount { amount: amt });
    }

    if let Some(date) = new_date {
        let seq = loan.next_line_seq();
        loan.schedule.push(Installment::scheduled(
            seq,
            date,
            amt,
            Decimal::ZERO,
            CollectionMethod::Transfer,
        ));
        loan.push_event(
            "Arrears moved",
            format!("Arrears {amt}$ moved to new transfer line #{seq} ({date})."),
        );
    } else {
        let targets = match_targets(&loan.schedule, target_lines)?;
        spread_adjustment(&mut loan.schedule, &targets, amt);
        loan.push_event(
            "Arrears redistributed",
            format!("Arrears {amt}$ spread across {} line(s).", targets.len()),
        );
    }

    let item = &mut loan.arrears_items[item_idx];
    item.status = ArrearsStatus::Resolved;
    item.total = Decimal::ZERO;

    recompute_schedule(loan);
    Ok(())
}

/// Defer a line's planned amount onto other lines.
///
/// The source line is rewritten to collect only the deferral fee; the
/// deferred amount lands on the targets' adjustments.
pub fn report_line(
    loan: &mut Loan,
    line: u32,
    amount: Option<Money>,
    target_lines: &[u32],
) -> ServicingResult<()> {
    let src_idx = loan
        .schedule
        .iter()
        .position(|row| row.seq == line)
        .ok_or(ServicingError::InvalidLine { line })?;

    let amt = to_cents(amount.unwrap_or_else(|| loan.schedule[src_idx].planned_amount()));
    if amt <= Decimal::ZERO {
        return Err(ServicingError::InvalidAmount { amount: amt });
    }
    let targets = match_targets(&loan.schedule, target_lines)?;

    let fee = loan.config.report_fee();
    let src = &mut loan.schedule[src_idx];
    src.status = CollectionStatus::None;
    src.method = CollectionMethod::Pad;
    src.base = fee;
    src.adjustment = Decimal::ZERO;
    src.adhesion = Decimal::ZERO;
    src.collected_amount = Decimal::ZERO;
    src.collection_date = None;

    spread_adjustment(&mut loan.schedule, &targets, amt);
    loan.push_event(
        "Deferral",
        format!(
            "Deferred {amt}$ across {} line(s); line #{line} now carries the {fee}$ deferral fee.",
            targets.len()
        ),
    );
    recompute_schedule(loan);
    Ok(())
}

/// Schedule indices matching the requested line seqs.
fn match_targets(schedule: &[Installment], target_lines: &[u32]) -> ServicingResult<Vec<usize>> {
    let targets: Vec<usize> = schedule
        .iter()
        .enumerate()
        .filter(|(_, row)| target_lines.contains(&row.seq))
        .map(|(idx, _)| idx)
        .collect();
    if targets.is_empty() {
        return Err(ServicingError::NoTargets);
    }
    Ok(targets)
}

/// Spread `amount` over the targets in equal cent-rounded shares, with the
/// rounding remainder landing on the last target so the spread conserves
/// money exactly.
fn spread_adjustment(schedule: &mut [Installment], targets: &[usize], amount: Money) {
    let per = to_cents(amount / Decimal::from(targets.len() as u64));
    let mut applied = Decimal::ZERO;
    let last = targets.len() - 1;
    for (pos, &idx) in targets.iter().enumerate() {
        let share = if pos == last { amount - applied } else { per };
        applied += share;
        let row = &mut schedule[idx];
        row.adjustment = to_cents(row.adjustment + share);
    }
}
