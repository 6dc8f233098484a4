//! Schedule recompute engine.
//!
//! Walks the schedule in due-date order and re-derives day counts, accrued
//! interest, the payment allocation and the running balance from the loan's
//! recorded facts. Deterministic and idempotent: two passes over unchanged
//! facts produce identical derived fields. Never fails; incomplete config
//! falls back to the documented contract defaults.

use rust_decimal::Decimal;

use crate::allocation::allocate;
use crate::arrears::open_total;
use crate::daycount::{elapsed_days, period_interest};
use crate::loan::Loan;

/// Overwrite every derived field on every installment in one forward pass.
///
/// Ordering is by scheduled due date, ties broken by sequence index; that
/// ordering, not storage order, defines the prior line for balance and
/// reference-date threading. The accrual reference date only advances past
/// lines that actually collected, so an NSF or still-scheduled line never
/// shifts the clock: a later real collection accrues from the last real one.
pub fn recompute_schedule(loan: &mut Loan) {
    let rate = loan.config.rate();
    let day_base = loan.config.day_base();
    let arrears_first_default = loan.config.arrears_first;

    let mut order: Vec<usize> = (0..loan.schedule.len()).collect();
    order.sort_by(|&a, &b| {
        loan.schedule[a]
            .due_date
            .cmp(&loan.schedule[b].due_date)
            .then(loan.schedule[a].seq.cmp(&loan.schedule[b].seq))
    });

    let mut reference_date = loan.config.start_date(&loan.schedule);
    let mut balance = loan.config.opening_balance();

    for idx in order {
        // Live snapshot of the open shortfall total; recompute itself never
        // mutates arrears state.
        let arrears_due = open_total(&loan.arrears_items);

        let row = &mut loan.schedule[idx];
        let collected = row.is_collected();

        // For a line not yet collected the scheduled date only feeds the
        // informational day count; it does not move the reference date.
        let effective_date = if collected {
            row.collection_date.unwrap_or(row.due_date)
        } else {
            row.due_date
        };

        let days = elapsed_days(reference_date, effective_date);
        let interest_due = period_interest(balance, rate, days, day_base);

        let collected_amount = if collected {
            row.collected_amount.max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        let arrears_first = row.arrears_first_override.unwrap_or(arrears_first_default);
        let alloc = allocate(
            collected_amount,
            row.adhesion,
            interest_due,
            arrears_due,
            arrears_first,
        );

        let capital = alloc.to_principal;
        let balance_after = (balance - capital).max(Decimal::ZERO);

        row.elapsed_days = days;
        row.interest = interest_due;
        row.capital = capital;
        row.balance_before = balance;
        row.balance_after = balance_after;
        row.allocation = alloc;

        balance = balance_after;
        if collected {
            reference_date = effective_date;
        }
    }
}
