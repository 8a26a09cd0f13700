//! Tests for the pure parts of the budget repository.

use rust_decimal_macros::dec;
use sea_orm::ActiveEnum;

use akiba_core::budget::BudgetStatus;

use super::{ExpenseDelta, core_status, db_status};
use crate::entities::sea_orm_active_enums::{
    AccountType, BudgetPeriod, BudgetStatus as DbBudgetStatus,
};

#[test]
fn test_status_mapping_round_trips() {
    for status in [
        DbBudgetStatus::Active,
        DbBudgetStatus::Inactive,
        DbBudgetStatus::Exceeded,
    ] {
        assert_eq!(db_status(core_status(status)), status);
    }
}

#[test]
fn test_live_statuses_agree_with_core() {
    assert!(core_status(DbBudgetStatus::Active).is_live());
    assert!(core_status(DbBudgetStatus::Exceeded).is_live());
    assert!(!core_status(DbBudgetStatus::Inactive).is_live());
}

/// The stored enum labels must match the `CREATE TYPE` values in the
/// initial migration, including the partial index predicate on budgets.
#[test]
fn test_enum_labels_match_schema() {
    assert_eq!(DbBudgetStatus::Active.to_value(), "active");
    assert_eq!(DbBudgetStatus::Inactive.to_value(), "inactive");
    assert_eq!(DbBudgetStatus::Exceeded.to_value(), "exceeded");

    assert_eq!(BudgetPeriod::Weekly.to_value(), "weekly");
    assert_eq!(BudgetPeriod::Monthly.to_value(), "monthly");
    assert_eq!(BudgetPeriod::Yearly.to_value(), "yearly");

    assert_eq!(AccountType::Bank.to_value(), "bank");
    assert_eq!(AccountType::MobileMoney.to_value(), "mobile_money");
    assert_eq!(AccountType::Cash.to_value(), "cash");
}

#[test]
fn test_expense_delta_net_of_edit() {
    let old = ExpenseDelta {
        account_id: uuid::Uuid::new_v4(),
        date: chrono::NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        amount: dec!(150),
    };
    let new = ExpenseDelta { amount: dec!(200), ..old };

    // Same budget: a single net delta is applied.
    assert_eq!(new.amount - old.amount, dec!(50));
}

#[test]
fn test_status_is_forward_only_after_mapping() {
    // The evaluator never returns Active for an Exceeded input; mapping to
    // the stored enum must preserve that.
    assert_eq!(
        db_status(BudgetStatus::Exceeded),
        DbBudgetStatus::Exceeded
    );
    assert_ne!(db_status(BudgetStatus::Exceeded), DbBudgetStatus::Active);
}
