//! Active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Bank account.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// Mobile money wallet.
    #[sea_orm(string_value = "mobile_money")]
    MobileMoney,
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
}

/// Budget period classification (informational).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "budget_period")]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    /// Weekly budget.
    #[sea_orm(string_value = "weekly")]
    Weekly,
    /// Monthly budget.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Yearly budget.
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// Budget lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "budget_status")]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Live and under the ceiling.
    #[sea_orm(string_value = "active")]
    Active,
    /// Superseded by a newer budget for the same account.
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Spending reached or passed the ceiling.
    #[sea_orm(string_value = "exceeded")]
    Exceeded,
}
