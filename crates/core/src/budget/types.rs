//! Budget data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Budget lifecycle state.
///
/// `Inactive` is terminal (set only when a newer budget supersedes this one).
/// `Exceeded` is a one-way transition from `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Budget is live and under its ceiling.
    Active,
    /// Budget has been superseded by a newer one for the same account.
    Inactive,
    /// Spending reached or passed 100% of the ceiling.
    Exceeded,
}

impl BudgetStatus {
    /// Returns true if the budget still accumulates spend.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Exceeded)
    }
}

/// Severity of a budget notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Spending crossed the alert threshold but is still under the ceiling.
    Warning,
    /// Spending reached or passed the ceiling.
    Error,
}

/// Notification produced when spending crosses the alert threshold or the
/// budget ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetNotification {
    /// Notification ID.
    pub id: Uuid,
    /// Human-readable message.
    pub message: String,
    /// Notification severity.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

/// A budget's state as seen by the evaluator.
///
/// `spent` is the running total *after* the triggering expense has been
/// applied; the evaluator derives status and notification from totals, it
/// never mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetSnapshot {
    /// Target ceiling.
    pub amount: Decimal,
    /// Running total of matching expense amounts.
    pub spent: Decimal,
    /// Alert threshold in percent (1-100).
    pub alert_threshold: i16,
    /// Current lifecycle state.
    pub status: BudgetStatus,
    /// Inclusive window start.
    pub start_date: NaiveDate,
    /// Inclusive window end.
    pub end_date: NaiveDate,
    /// Name of the account the budget tracks, used in notification messages.
    pub account_name: String,
}

/// Result of evaluating a budget's running total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendAssessment {
    /// Recomputed percentage of the ceiling used.
    pub percentage_used: Decimal,
    /// Derived lifecycle state (never moves backwards).
    pub status: BudgetStatus,
    /// Notification to surface to the user, if any.
    pub notification: Option<BudgetNotification>,
}

/// Result of the budget status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatusReport {
    /// True when the alert threshold has been crossed.
    pub exceeded: bool,
    /// Percentage of the ceiling used.
    pub percentage_used: Decimal,
    /// Recomputed spend total.
    pub spent: Decimal,
    /// Target ceiling.
    pub amount: Decimal,
    /// Ceiling minus spend (negative once over budget).
    pub remaining: Decimal,
    /// Derived lifecycle state.
    pub status: BudgetStatus,
}
