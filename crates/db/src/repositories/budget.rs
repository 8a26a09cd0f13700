//! Budget repository.
//!
//! Owns budget persistence plus the spend-tracking flow: the `spent`
//! counter is advanced with a single server-side `UPDATE ... SET spent =
//! spent + delta` inside a transaction, so concurrent expense writes can
//! never lose an increment. Status transitions are forward only (a budget
//! that became `exceeded` stays `exceeded`), which makes a late status
//! write from a racing request harmless.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tracing::{debug, warn};
use uuid::Uuid;

use akiba_core::budget::{
    BudgetError as DefinitionError, BudgetEvaluator, BudgetNotification, BudgetSnapshot,
    BudgetStatus, BudgetStatusReport,
};

use crate::entities::{
    accounts, budgets, expenses,
    sea_orm_active_enums::{BudgetPeriod, BudgetStatus as DbBudgetStatus},
};

/// Error types for budget operations.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Budget definition failed validation.
    #[error(transparent)]
    InvalidDefinition(#[from] DefinitionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Account the budget covers.
    pub account_id: Uuid,
    /// Spending cap.
    pub amount: Decimal,
    /// First day of the window, inclusive.
    pub start_date: NaiveDate,
    /// Last day of the window, inclusive.
    pub end_date: NaiveDate,
    /// Percentage at which a warning fires, 1 to 100.
    pub alert_threshold: i16,
    /// Recurrence label.
    pub period: BudgetPeriod,
}

/// Budget with its account name resolved.
#[derive(Debug, Clone)]
pub struct BudgetWithAccount {
    /// Budget record.
    pub budget: budgets::Model,
    /// Name of the covered account.
    pub account_name: String,
}

/// A spend event as seen by the budget layer.
///
/// Carries just the fields budget matching needs; the expense row itself
/// is owned by the expense repository.
#[derive(Debug, Clone, Copy)]
pub struct ExpenseDelta {
    /// Account the money left.
    pub account_id: Uuid,
    /// Day the expense occurred.
    pub date: NaiveDate,
    /// Expense amount.
    pub amount: Decimal,
}

/// Budget repository for budget persistence and spend tracking.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a budget, superseding any live budget on the same account.
    ///
    /// The demotion of the previous live budget and the insert of the new
    /// one happen in one transaction, upholding the one-live-budget-per-
    /// account constraint enforced by the partial unique index.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The definition fails validation
    /// - The account does not exist
    /// - The database operation fails
    pub async fn create_budget(
        &self,
        input: CreateBudgetInput,
    ) -> Result<BudgetWithAccount, BudgetError> {
        BudgetEvaluator::validate_definition(
            input.amount,
            input.start_date,
            input.end_date,
            input.alert_threshold,
        )?;

        let account = accounts::Entity::find_by_id(input.account_id)
            .filter(accounts::Column::UserId.eq(input.user_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::AccountNotFound(input.account_id))?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let demoted = budgets::Entity::update_many()
            .col_expr(
                budgets::Column::Status,
                ActiveEnum::as_enum(&DbBudgetStatus::Inactive),
            )
            .col_expr(budgets::Column::UpdatedAt, Expr::value(now))
            .filter(budgets::Column::UserId.eq(input.user_id))
            .filter(budgets::Column::AccountId.eq(input.account_id))
            .filter(budgets::Column::Status.ne(DbBudgetStatus::Inactive))
            .exec(&txn)
            .await?;
        if demoted.rows_affected > 0 {
            debug!(
                account_id = %input.account_id,
                superseded = demoted.rows_affected,
                "Demoted previous live budget"
            );
        }

        let budget = budgets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            account_id: Set(input.account_id),
            amount: Set(input.amount),
            spent: Set(Decimal::ZERO),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            alert_threshold: Set(input.alert_threshold),
            period: Set(input.period),
            status: Set(DbBudgetStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let budget = budget.insert(&txn).await?;

        txn.commit().await?;

        Ok(BudgetWithAccount {
            budget,
            account_name: account.name,
        })
    }

    /// Lists a user's budgets with account names, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_budgets(&self, user_id: Uuid) -> Result<Vec<BudgetWithAccount>, BudgetError> {
        let budget_list = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(budget_list.len());
        for budget in budget_list {
            let account_name = accounts::Entity::find_by_id(budget.account_id)
                .one(&self.db)
                .await?
                .map(|a| a.name)
                .unwrap_or_default();
            result.push(BudgetWithAccount {
                budget,
                account_name,
            });
        }

        Ok(result)
    }

    /// Records a new expense against whichever live budget covers it.
    ///
    /// No-op returning `None` when no live budget matches the account and
    /// date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn record_spend(
        &self,
        user_id: Uuid,
        delta: ExpenseDelta,
    ) -> Result<Option<BudgetNotification>, BudgetError> {
        let txn = self.db.begin().await?;

        let notification = match Self::find_live_budget(&txn, user_id, &delta).await? {
            Some(budget) => Self::adjust_and_assess(&txn, &budget, delta.amount).await?,
            None => None,
        };

        txn.commit().await?;
        Ok(notification)
    }

    /// Re-applies budget tracking after an expense was edited.
    ///
    /// When the old and new versions fall under the same live budget, a
    /// single net delta is applied and assessed. When they fall under
    /// different budgets (account or date moved), the old budget's `spent`
    /// is silently reduced and the new budget gets a full evaluation. Only
    /// the budget receiving the new amount can emit a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn apply_spend_update(
        &self,
        user_id: Uuid,
        old: ExpenseDelta,
        new: ExpenseDelta,
    ) -> Result<Option<BudgetNotification>, BudgetError> {
        let txn = self.db.begin().await?;

        let old_budget = Self::find_live_budget(&txn, user_id, &old).await?;
        let new_budget = Self::find_live_budget(&txn, user_id, &new).await?;

        let notification = match (old_budget, new_budget) {
            (Some(old_b), Some(new_b)) if old_b.id == new_b.id => {
                Self::adjust_and_assess(&txn, &old_b, new.amount - old.amount).await?
            }
            (old_b, new_b) => {
                if let Some(old_b) = old_b {
                    Self::adjust_silent(&txn, &old_b, -old.amount).await?;
                }
                match new_b {
                    Some(new_b) => Self::adjust_and_assess(&txn, &new_b, new.amount).await?,
                    None => None,
                }
            }
        };

        txn.commit().await?;
        Ok(notification)
    }

    /// Recomputes a budget's true spend from its expenses and reconciles
    /// the stored status.
    ///
    /// The report's spend figure is the freshly computed sum, not the
    /// stored counter. If the sum shows the cap was crossed but the stored
    /// status has not caught up, the status is corrected to `exceeded`;
    /// the stored counter itself is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the budget is not found or the query fails.
    pub async fn check_status(
        &self,
        user_id: Uuid,
        budget_id: Uuid,
    ) -> Result<BudgetStatusReport, BudgetError> {
        let budget = budgets::Entity::find_by_id(budget_id)
            .filter(budgets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(BudgetError::NotFound(budget_id))?;

        let total: Option<Option<Decimal>> = expenses::Entity::find()
            .select_only()
            .column_as(expenses::Column::Amount.sum(), "total")
            .filter(expenses::Column::UserId.eq(user_id))
            .filter(expenses::Column::AccountId.eq(budget.account_id))
            .filter(expenses::Column::Date.gte(budget.start_date))
            .filter(expenses::Column::Date.lte(budget.end_date))
            .into_tuple()
            .one(&self.db)
            .await?;
        let actual_spent = total.flatten().unwrap_or(Decimal::ZERO);

        let report = BudgetEvaluator::status_report(
            budget.amount,
            actual_spent,
            budget.alert_threshold,
            core_status(budget.status),
        );

        if report.status != core_status(budget.status) {
            warn!(
                budget_id = %budget_id,
                spent = %actual_spent,
                "Stored budget status lagged behind recomputed spend, correcting"
            );
            let mut active: budgets::ActiveModel = budget.into();
            active.status = Set(db_status(report.status));
            active.updated_at = Set(Utc::now().into());
            active.update(&self.db).await?;
        }

        Ok(report)
    }

    /// Finds the live budget covering an account on a given day.
    ///
    /// Live means active or exceeded; the partial unique index guarantees
    /// at most one per account.
    async fn find_live_budget<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        delta: &ExpenseDelta,
    ) -> Result<Option<budgets::Model>, BudgetError> {
        let budget = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id))
            .filter(budgets::Column::AccountId.eq(delta.account_id))
            .filter(budgets::Column::Status.ne(DbBudgetStatus::Inactive))
            .filter(budgets::Column::StartDate.lte(delta.date))
            .filter(budgets::Column::EndDate.gte(delta.date))
            .one(conn)
            .await?;
        Ok(budget)
    }

    /// Applies a spend delta atomically, then evaluates the new total.
    ///
    /// The increment and the follow-up read run on the caller's
    /// transaction; the refetched row already contains every concurrent
    /// increment that committed before ours.
    async fn adjust_and_assess(
        txn: &DatabaseTransaction,
        budget: &budgets::Model,
        delta: Decimal,
    ) -> Result<Option<BudgetNotification>, BudgetError> {
        Self::increment_spent(txn, budget.id, delta).await?;

        let updated = budgets::Entity::find_by_id(budget.id)
            .one(txn)
            .await?
            .ok_or(BudgetError::NotFound(budget.id))?;

        let account_name = accounts::Entity::find_by_id(updated.account_id)
            .one(txn)
            .await?
            .map(|a| a.name)
            .unwrap_or_default();

        let snapshot = BudgetSnapshot {
            amount: updated.amount,
            spent: updated.spent,
            alert_threshold: updated.alert_threshold,
            status: core_status(updated.status),
            start_date: updated.start_date,
            end_date: updated.end_date,
            account_name,
        };
        let assessment = BudgetEvaluator::assess(&snapshot);

        if assessment.status != core_status(updated.status) {
            let mut active: budgets::ActiveModel = updated.into();
            active.status = Set(db_status(assessment.status));
            active.updated_at = Set(Utc::now().into());
            active.update(txn).await?;
        }

        Ok(assessment.notification)
    }

    /// Applies a spend delta without evaluating thresholds.
    ///
    /// Used for the reversal leg of an expense edit: reducing a budget's
    /// spend never emits a notification and never reverts its status.
    async fn adjust_silent(
        txn: &DatabaseTransaction,
        budget: &budgets::Model,
        delta: Decimal,
    ) -> Result<(), BudgetError> {
        Self::increment_spent(txn, budget.id, delta).await?;
        Ok(())
    }

    /// Single-statement server-side `spent = spent + delta`.
    async fn increment_spent(
        txn: &DatabaseTransaction,
        budget_id: Uuid,
        delta: Decimal,
    ) -> Result<(), BudgetError> {
        budgets::Entity::update_many()
            .col_expr(
                budgets::Column::Spent,
                Expr::col(budgets::Column::Spent).add(delta),
            )
            .col_expr(budgets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(budgets::Column::Id.eq(budget_id))
            .exec(txn)
            .await?;
        Ok(())
    }
}

/// Maps the stored status to the evaluation-layer status.
const fn core_status(status: DbBudgetStatus) -> BudgetStatus {
    match status {
        DbBudgetStatus::Active => BudgetStatus::Active,
        DbBudgetStatus::Inactive => BudgetStatus::Inactive,
        DbBudgetStatus::Exceeded => BudgetStatus::Exceeded,
    }
}

/// Maps the evaluation-layer status back to the stored status.
const fn db_status(status: BudgetStatus) -> DbBudgetStatus {
    match status {
        BudgetStatus::Active => DbBudgetStatus::Active,
        BudgetStatus::Inactive => DbBudgetStatus::Inactive,
        BudgetStatus::Exceeded => DbBudgetStatus::Exceeded,
    }
}

#[cfg(test)]
#[path = "budget_tests.rs"]
mod tests;
