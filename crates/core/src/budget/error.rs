//! Budget error types.

use thiserror::Error;

/// Budget-related validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// Amount must be strictly positive.
    #[error("Budget amount must be positive")]
    NonPositiveAmount,

    /// Start date must not come after end date.
    #[error("Budget start date must not be after end date")]
    InvalidWindow,

    /// Alert threshold must be a percentage between 1 and 100.
    #[error("Alert threshold must be between 1 and 100, got {0}")]
    ThresholdOutOfRange(i16),
}
