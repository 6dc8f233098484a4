use rust_decimal::Decimal;
use thiserror::Error;

/// Validation errors surfaced to callers of the event mutators.
///
/// None of these is raised by the recompute engine itself, which is total:
/// malformed numeric config falls back to documented defaults instead.
#[derive(Debug, Error)]
pub enum ServicingError {
    #[error("Installment {line} not found")]
    InvalidLine { line: u32 },

    #[error("Invalid amount {amount}: a positive amount is required")]
    InvalidAmount { amount: Decimal },

    #[error("Arrears item {id} not found or not open")]
    ArrearsNotFound { id: String },

    #[error("Redistribution target list is empty or matches no installment")]
    NoTargets,

    #[error("Installment {line} is not in NSF state")]
    NotNsf { line: u32 },
}
