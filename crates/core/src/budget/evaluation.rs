//! Budget evaluation logic.
//!
//! The evaluator is pure: it derives a percentage, a (forward-only) status,
//! and an optional notification from a budget's running totals. Persisting
//! the totals and the derived status is the storage layer's job.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::BudgetError;
use super::types::{
    BudgetNotification, BudgetSnapshot, BudgetStatus, BudgetStatusReport, NotificationKind,
    SpendAssessment,
};

/// Budget evaluation service.
pub struct BudgetEvaluator;

impl BudgetEvaluator {
    /// Percentage of the ceiling used: spent / amount * 100.
    ///
    /// A zero or negative ceiling yields zero rather than dividing by zero;
    /// budget creation rejects such ceilings anyway.
    #[must_use]
    pub fn usage_percent(spent: Decimal, amount: Decimal) -> Decimal {
        if amount <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            spent / amount * Decimal::ONE_HUNDRED
        }
    }

    /// Returns true when `date` falls inside the inclusive window
    /// [`start`, `end`].
    #[must_use]
    pub fn window_contains(start: NaiveDate, end: NaiveDate, date: NaiveDate) -> bool {
        start <= date && date <= end
    }

    /// Derives status and notification from a budget's current running total.
    ///
    /// Rules:
    /// - usage >= 100%: status becomes `Exceeded` and an error notification is
    ///   produced. This fires again for every further spend on an
    ///   already-exceeded budget; exceeded budgets keep accumulating.
    /// - usage >= alert threshold (but < 100%): warning notification with the
    ///   percentage rounded to one decimal. Status is unchanged.
    /// - otherwise: no notification.
    ///
    /// Status never moves backwards: an `Exceeded` snapshot stays exceeded
    /// even if a negative adjustment pulled usage back under 100%.
    #[must_use]
    pub fn assess(snapshot: &BudgetSnapshot) -> SpendAssessment {
        let percentage_used = Self::usage_percent(snapshot.spent, snapshot.amount);
        let threshold = Decimal::from(snapshot.alert_threshold);

        if percentage_used >= Decimal::ONE_HUNDRED {
            let message = format!(
                "Budget for {} ({} to {}) has been exceeded",
                snapshot.account_name, snapshot.start_date, snapshot.end_date
            );
            return SpendAssessment {
                percentage_used,
                status: BudgetStatus::Exceeded,
                notification: Some(BudgetNotification {
                    id: Uuid::new_v4(),
                    message,
                    kind: NotificationKind::Error,
                }),
            };
        }

        let notification = if percentage_used >= threshold {
            let message = format!(
                "Spending on {} has reached {}% of the budget",
                snapshot.account_name,
                percentage_used.round_dp(1)
            );
            Some(BudgetNotification {
                id: Uuid::new_v4(),
                message,
                kind: NotificationKind::Warning,
            })
        } else {
            None
        };

        SpendAssessment {
            percentage_used,
            status: snapshot.status,
            notification,
        }
    }

    /// Builds the status-query report from recomputed totals.
    ///
    /// The `exceeded` flag reports whether the *alert threshold* has been
    /// crossed; the returned status reports whether the ceiling has.
    #[must_use]
    pub fn status_report(
        amount: Decimal,
        spent: Decimal,
        alert_threshold: i16,
        status: BudgetStatus,
    ) -> BudgetStatusReport {
        let percentage_used = Self::usage_percent(spent, amount);

        let status = if percentage_used >= Decimal::ONE_HUNDRED && status != BudgetStatus::Inactive
        {
            BudgetStatus::Exceeded
        } else {
            status
        };

        BudgetStatusReport {
            exceeded: percentage_used >= Decimal::from(alert_threshold),
            percentage_used,
            spent,
            amount,
            remaining: amount - spent,
            status,
        }
    }

    /// Validates a budget definition before it is persisted.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NonPositiveAmount` if the ceiling is not positive.
    /// Returns `BudgetError::InvalidWindow` if the window is reversed.
    /// Returns `BudgetError::ThresholdOutOfRange` if the threshold is outside 1-100.
    pub fn validate_definition(
        amount: Decimal,
        start_date: NaiveDate,
        end_date: NaiveDate,
        alert_threshold: i16,
    ) -> Result<(), BudgetError> {
        if amount <= Decimal::ZERO {
            return Err(BudgetError::NonPositiveAmount);
        }

        if start_date > end_date {
            return Err(BudgetError::InvalidWindow);
        }

        if !(1..=100).contains(&alert_threshold) {
            return Err(BudgetError::ThresholdOutOfRange(alert_threshold));
        }

        Ok(())
    }
}
