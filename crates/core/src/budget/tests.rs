//! Property-based and unit tests for budget evaluation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::evaluation::BudgetEvaluator;
use super::types::{BudgetSnapshot, BudgetStatus, NotificationKind};

fn january_snapshot(amount: Decimal, spent: Decimal, threshold: i16) -> BudgetSnapshot {
    BudgetSnapshot {
        amount,
        spent,
        alert_threshold: threshold,
        status: BudgetStatus::Active,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        account_name: "VISA".to_string(),
    }
}

proptest! {
    /// Notification is emitted iff usage >= alert threshold, and its kind is
    /// error iff usage >= 100%.
    #[test]
    fn notification_iff_threshold_crossed(
        amount in 1i64..1_000_000,
        spent in 0i64..2_000_000,
        threshold in 1i16..=100,
    ) {
        let snapshot = january_snapshot(Decimal::from(amount), Decimal::from(spent), threshold);
        let assessment = BudgetEvaluator::assess(&snapshot);

        let usage = Decimal::from(spent) / Decimal::from(amount) * dec!(100);
        prop_assert_eq!(assessment.percentage_used, usage);

        match assessment.notification {
            Some(n) if usage >= dec!(100) => prop_assert_eq!(n.kind, NotificationKind::Error),
            Some(n) => {
                prop_assert!(usage >= Decimal::from(threshold));
                prop_assert_eq!(n.kind, NotificationKind::Warning);
            }
            None => prop_assert!(usage < Decimal::from(threshold)),
        }
    }

    /// Status only ever moves forward: assessing an exceeded snapshot never
    /// yields active, and active flips to exceeded exactly at 100% usage.
    #[test]
    fn status_is_forward_only(
        amount in 1i64..1_000_000,
        spent in -1_000_000i64..2_000_000,
        already_exceeded in any::<bool>(),
    ) {
        let mut snapshot = january_snapshot(Decimal::from(amount), Decimal::from(spent), 80);
        if already_exceeded {
            snapshot.status = BudgetStatus::Exceeded;
        }

        let assessment = BudgetEvaluator::assess(&snapshot);

        if already_exceeded {
            prop_assert_eq!(assessment.status, BudgetStatus::Exceeded);
        } else if assessment.percentage_used >= dec!(100) {
            prop_assert_eq!(assessment.status, BudgetStatus::Exceeded);
        } else {
            prop_assert_eq!(assessment.status, BudgetStatus::Active);
        }
    }

    /// Applying a sequence of expenses one at a time, each assessment reports
    /// the cumulative percentage of the sum so far, the correct notification
    /// for that step, and a status that never moves backwards.
    #[test]
    fn assess_tracks_running_total_across_spends(
        amounts in prop::collection::vec(1i64..10_000, 1..20),
    ) {
        let ceiling = dec!(10000);
        let threshold = 80i16;
        let mut spent = Decimal::ZERO;
        let mut status = BudgetStatus::Active;

        for a in &amounts {
            spent += Decimal::from(*a);

            let mut snapshot = january_snapshot(ceiling, spent, threshold);
            snapshot.status = status;
            let assessment = BudgetEvaluator::assess(&snapshot);

            let expected_pct = spent / ceiling * dec!(100);
            prop_assert_eq!(assessment.percentage_used, expected_pct);

            match assessment.notification.as_ref() {
                Some(n) if expected_pct >= dec!(100) => {
                    prop_assert_eq!(n.kind, NotificationKind::Error);
                }
                Some(n) => {
                    prop_assert!(expected_pct >= Decimal::from(threshold));
                    prop_assert_eq!(n.kind, NotificationKind::Warning);
                }
                None => prop_assert!(expected_pct < Decimal::from(threshold)),
            }

            // Forward-only: once exceeded, later steps stay exceeded.
            if status == BudgetStatus::Exceeded {
                prop_assert_eq!(assessment.status, BudgetStatus::Exceeded);
            }
            status = assessment.status;
        }

        let total: Decimal = amounts.iter().map(|a| Decimal::from(*a)).sum();
        prop_assert_eq!(spent, total);
        prop_assert_eq!(
            status == BudgetStatus::Exceeded,
            total >= ceiling
        );
    }

    /// Zero ceiling never divides by zero.
    #[test]
    fn zero_amount_usage_is_zero(spent in 0i64..1_000_000) {
        prop_assert_eq!(
            BudgetEvaluator::usage_percent(Decimal::from(spent), Decimal::ZERO),
            Decimal::ZERO
        );
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::budget::error::BudgetError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// First half of the spec scenario: 850 spent of 1000 with an 80%
    /// threshold warns but stays active.
    #[test]
    fn test_warning_at_85_percent() {
        let snapshot = january_snapshot(dec!(1000), dec!(850), 80);
        let assessment = BudgetEvaluator::assess(&snapshot);

        assert_eq!(assessment.percentage_used, dec!(85));
        assert_eq!(assessment.status, BudgetStatus::Active);

        let notification = assessment.notification.expect("warning expected");
        assert_eq!(notification.kind, NotificationKind::Warning);
        assert!(notification.message.contains("85"));
        assert!(notification.message.contains("VISA"));
    }

    /// Second half of the scenario: a further 200 pushes the total to 1050
    /// and the budget into exceeded with an error notification.
    #[test]
    fn test_exceeded_at_105_percent() {
        let snapshot = january_snapshot(dec!(1000), dec!(1050), 80);
        let assessment = BudgetEvaluator::assess(&snapshot);

        assert_eq!(assessment.percentage_used, dec!(105));
        assert_eq!(assessment.status, BudgetStatus::Exceeded);

        let notification = assessment.notification.expect("error expected");
        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(notification.message.contains("VISA"));
        assert!(notification.message.contains("2024-01-01"));
        assert!(notification.message.contains("2024-01-31"));
    }

    #[test]
    fn test_no_notification_below_threshold() {
        let snapshot = january_snapshot(dec!(1000), dec!(500), 80);
        let assessment = BudgetEvaluator::assess(&snapshot);

        assert_eq!(assessment.percentage_used, dec!(50));
        assert_eq!(assessment.status, BudgetStatus::Active);
        assert!(assessment.notification.is_none());
    }

    #[test]
    fn test_warning_exactly_at_threshold() {
        let snapshot = january_snapshot(dec!(1000), dec!(800), 80);
        let assessment = BudgetEvaluator::assess(&snapshot);

        let notification = assessment.notification.expect("warning expected");
        assert_eq!(notification.kind, NotificationKind::Warning);
        assert_eq!(assessment.status, BudgetStatus::Active);
    }

    #[test]
    fn test_error_exactly_at_ceiling() {
        let snapshot = january_snapshot(dec!(1000), dec!(1000), 80);
        let assessment = BudgetEvaluator::assess(&snapshot);

        assert_eq!(assessment.status, BudgetStatus::Exceeded);
        assert_eq!(
            assessment.notification.expect("error expected").kind,
            NotificationKind::Error
        );
    }

    /// Exceeded budgets keep accumulating; each further spend at >= 100%
    /// produces another error notification.
    #[test]
    fn test_exceeded_budget_keeps_accumulating() {
        let mut snapshot = january_snapshot(dec!(1000), dec!(1200), 80);
        snapshot.status = BudgetStatus::Exceeded;

        let assessment = BudgetEvaluator::assess(&snapshot);

        assert_eq!(assessment.percentage_used, dec!(120));
        assert_eq!(assessment.status, BudgetStatus::Exceeded);
        assert_eq!(
            assessment.notification.expect("error expected").kind,
            NotificationKind::Error
        );
    }

    /// A negative adjustment that pulls usage under 100% does not revive an
    /// exceeded budget.
    #[test]
    fn test_negative_delta_never_reverts_exceeded() {
        let mut snapshot = january_snapshot(dec!(1000), dec!(950), 80);
        snapshot.status = BudgetStatus::Exceeded;

        let assessment = BudgetEvaluator::assess(&snapshot);

        assert_eq!(assessment.status, BudgetStatus::Exceeded);
        // Still over the threshold, so the warning rule applies.
        assert_eq!(
            assessment.notification.expect("warning expected").kind,
            NotificationKind::Warning
        );
    }

    #[test]
    fn test_warning_message_rounds_to_one_decimal() {
        let snapshot = january_snapshot(dec!(300), dec!(250), 80);
        let assessment = BudgetEvaluator::assess(&snapshot);

        let notification = assessment.notification.expect("warning expected");
        assert!(notification.message.contains("83.3%"));
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let start = date(2024, 1, 1);
        let end = date(2024, 1, 31);

        assert!(BudgetEvaluator::window_contains(start, end, start));
        assert!(BudgetEvaluator::window_contains(start, end, end));
        assert!(BudgetEvaluator::window_contains(start, end, date(2024, 1, 15)));
        assert!(!BudgetEvaluator::window_contains(start, end, date(2023, 12, 31)));
        assert!(!BudgetEvaluator::window_contains(start, end, date(2024, 2, 1)));
    }

    #[test]
    fn test_status_report_exceeded_flag_uses_threshold() {
        // 85% usage: over the 80% threshold but under the ceiling.
        let report = BudgetEvaluator::status_report(dec!(1000), dec!(850), 80, BudgetStatus::Active);

        assert!(report.exceeded);
        assert_eq!(report.percentage_used, dec!(85));
        assert_eq!(report.spent, dec!(850));
        assert_eq!(report.remaining, dec!(150));
        assert_eq!(report.status, BudgetStatus::Active);
    }

    /// Drift reconciliation: the report reflects the recomputed total and
    /// corrects the status when ground truth crossed the ceiling.
    #[test]
    fn test_status_report_corrects_status_at_ceiling() {
        let report =
            BudgetEvaluator::status_report(dec!(1000), dec!(1100), 80, BudgetStatus::Active);

        assert!(report.exceeded);
        assert_eq!(report.status, BudgetStatus::Exceeded);
        assert_eq!(report.remaining, dec!(-100));
    }

    #[test]
    fn test_status_report_under_threshold() {
        let report = BudgetEvaluator::status_report(dec!(1000), dec!(100), 80, BudgetStatus::Active);

        assert!(!report.exceeded);
        assert_eq!(report.status, BudgetStatus::Active);
    }

    #[test]
    fn test_validate_definition_accepts_sane_input() {
        assert!(
            BudgetEvaluator::validate_definition(dec!(1000), date(2024, 1, 1), date(2024, 1, 31), 80)
                .is_ok()
        );
        // Single-day window is fine.
        assert!(
            BudgetEvaluator::validate_definition(dec!(1), date(2024, 1, 1), date(2024, 1, 1), 1)
                .is_ok()
        );
    }

    #[test]
    fn test_validate_definition_rejects_bad_input() {
        assert_eq!(
            BudgetEvaluator::validate_definition(dec!(0), date(2024, 1, 1), date(2024, 1, 31), 80),
            Err(BudgetError::NonPositiveAmount)
        );
        assert_eq!(
            BudgetEvaluator::validate_definition(dec!(100), date(2024, 2, 1), date(2024, 1, 31), 80),
            Err(BudgetError::InvalidWindow)
        );
        assert_eq!(
            BudgetEvaluator::validate_definition(dec!(100), date(2024, 1, 1), date(2024, 1, 31), 0),
            Err(BudgetError::ThresholdOutOfRange(0))
        );
        assert_eq!(
            BudgetEvaluator::validate_definition(dec!(100), date(2024, 1, 1), date(2024, 1, 31), 101),
            Err(BudgetError::ThresholdOutOfRange(101))
        );
    }
}
