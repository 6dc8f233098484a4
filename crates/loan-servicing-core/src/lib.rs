//! Private-loan servicing ledger.
//!
//! Recomputes a loan's amortization schedule after each real-world
//! collection event (post, partial post, NSF rejection, retry) and
//! allocates collected money across open arrears, the admission fee,
//! accrued daily interest and principal in fixed priority order.
//! Unresolved shortfalls live in a FIFO arrears queue.
//!
//! All monetary arithmetic uses `rust_decimal::Decimal`. No `f64`.

pub mod allocation;
pub mod arrears;
pub mod daycount;
pub mod engine;
pub mod error;
pub mod loan;
pub mod store;
pub mod types;

pub use allocation::{allocate, Allocation};
pub use arrears::{close_fifo, open_total, ArrearsItem, ArrearsStatus, FifoOutcome};
pub use engine::recompute_schedule;
pub use error::ServicingError;
pub use loan::{
    apply_nsf, post_payment, report_line, resolve_arrears, retry_line, seed_loan,
    CollectionMethod, CollectionStatus, Event, Installment, LedgerEntry, Loan, LoanConfig,
};
pub use store::{InMemoryStore, LoanStore};
pub use types::{now_iso, to_cents, Money, Rate};

/// Standard result type for all servicing operations
pub type ServicingResult<T> = Result<T, ServicingError>;
