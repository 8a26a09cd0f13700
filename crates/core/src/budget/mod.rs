//! Budget evaluation, status derivation, and alert notifications.

pub mod error;
pub mod evaluation;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use evaluation::BudgetEvaluator;
pub use types::{
    BudgetNotification, BudgetSnapshot, BudgetStatus, BudgetStatusReport, NotificationKind,
    SpendAssessment,
};
