//! Demo contract seeding.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use crate::engine::recompute_schedule;
use crate::loan::model::{CollectionMethod, Installment, Loan, LoanConfig};
use crate::types::Money;

/// Build and recompute the demo loan file used by reset and first access.
///
/// Terms: 2250.00 financed on 2024-10-31 at 18.99% ACT/365, collected over
/// four biweekly pre-authorized debits each carrying a 45.00 admission fee.
pub fn seed_loan(id: &str) -> Loan {
    let config = LoanConfig {
        contract_start_date: date(2024, 10, 31),
        start_balance: Some(dec!(2250.00)),
        annual_rate: Some(dec!(0.1899)),
        day_count_base: Some(dec!(365)),
        default_nsf_fee: Some(dec!(48)),
        default_report_fee: Some(dec!(25)),
        arrears_first: false,
    };

    let schedule = vec![
        line(1, date(2024, 11, 15), dec!(147.92)),
        line(2, date(2024, 11, 29), dec!(147.19)),
        line(3, date(2024, 12, 13), dec!(146.56)),
        line(4, date(2024, 12, 27), dec!(145.94)),
    ];

    let mut loan = Loan {
        id: id.to_string(),
        config,
        schedule,
        arrears_items: Vec::new(),
        events: Vec::new(),
        ledger: Vec::new(),
        arrears_seq: 0,
    };
    loan.push_event("Loan file loaded", "Demo contract seeded");
    recompute_schedule(&mut loan);
    loan
}

fn line(seq: u32, due_date: Option<NaiveDate>, base: Money) -> Installment {
    Installment::scheduled(
        seq,
        due_date.unwrap_or_default(),
        base,
        dec!(45),
        CollectionMethod::Pad,
    )
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}
