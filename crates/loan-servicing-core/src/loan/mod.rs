//! Loan aggregate, its event mutators, and demo seeding.

pub mod model;
pub mod mutators;
pub mod seed;

pub use model::{
    CollectionMethod, CollectionStatus, Event, Installment, LedgerEntry, Loan, LoanConfig,
};
pub use mutators::{apply_nsf, post_payment, report_line, resolve_arrears, retry_line};
pub use seed::seed_loan;
