//! Expense repository.
//!
//! Writes the expense rows themselves; budget tracking for a recorded
//! expense is driven separately through [`crate::BudgetRepository`], so an
//! expense always lands even when budget evaluation fails afterwards.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{accounts, categories, expenses, subcategories};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Subcategory not found or not under the given category.
    #[error("Subcategory not found under category: {0}")]
    SubcategoryNotFound(Uuid),

    /// Amount must be positive.
    #[error("Expense amount must be positive")]
    NonPositiveAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Owning user.
    pub user_id: Uuid,
    /// What the money was spent on.
    pub description: String,
    /// Expense amount.
    pub amount: Decimal,
    /// Day the expense occurred.
    pub date: NaiveDate,
    /// Expense category.
    pub category_id: Uuid,
    /// Subcategory, must belong to `category_id`.
    pub subcategory_id: Uuid,
    /// Account the money left.
    pub account_id: Uuid,
}

/// Input for updating an expense. All fields are replaced.
#[derive(Debug, Clone)]
pub struct UpdateExpenseInput {
    /// New description.
    pub description: String,
    /// New amount.
    pub amount: Decimal,
    /// New date.
    pub date: NaiveDate,
    /// New category.
    pub category_id: Uuid,
    /// New subcategory, must belong to `category_id`.
    pub subcategory_id: Uuid,
    /// New account.
    pub account_id: Uuid,
}

/// Expense repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new expense.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive
    /// - The account, category, or subcategory does not exist
    /// - The subcategory does not belong to the category
    /// - The database operation fails
    pub async fn create_expense(
        &self,
        input: CreateExpenseInput,
    ) -> Result<expenses::Model, ExpenseError> {
        self.validate_references(
            input.user_id,
            input.account_id,
            input.category_id,
            input.subcategory_id,
            input.amount,
        )
        .await?;

        let now = Utc::now().into();

        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            description: Set(input.description),
            amount: Set(input.amount),
            date: Set(input.date),
            category_id: Set(input.category_id),
            subcategory_id: Set(input.subcategory_id),
            account_id: Set(input.account_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = expense.insert(&self.db).await?;
        Ok(result)
    }

    /// Lists a user's expenses, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<expenses::Model>, ExpenseError> {
        let result = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(result)
    }

    /// Replaces an expense, returning the row before and after the edit.
    ///
    /// The caller needs both versions to re-apply budget tracking: the old
    /// version says which budget to reverse, the new one which to charge.
    ///
    /// # Errors
    ///
    /// Returns an error if the expense is not found, a reference is
    /// invalid, or the database operation fails.
    pub async fn update_expense(
        &self,
        user_id: Uuid,
        expense_id: Uuid,
        input: UpdateExpenseInput,
    ) -> Result<(expenses::Model, expenses::Model), ExpenseError> {
        let old = expenses::Entity::find_by_id(expense_id)
            .filter(expenses::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::NotFound(expense_id))?;

        self.validate_references(
            user_id,
            input.account_id,
            input.category_id,
            input.subcategory_id,
            input.amount,
        )
        .await?;

        let mut active: expenses::ActiveModel = old.clone().into();
        active.description = Set(input.description);
        active.amount = Set(input.amount);
        active.date = Set(input.date);
        active.category_id = Set(input.category_id);
        active.subcategory_id = Set(input.subcategory_id);
        active.account_id = Set(input.account_id);
        active.updated_at = Set(Utc::now().into());

        let new = active.update(&self.db).await?;
        Ok((old, new))
    }

    /// Checks the amount and that every referenced row exists and belongs
    /// to the user.
    async fn validate_references(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        category_id: Uuid,
        subcategory_id: Uuid,
        amount: Decimal,
    ) -> Result<(), ExpenseError> {
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount);
        }

        let _account = accounts::Entity::find_by_id(account_id)
            .filter(accounts::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::AccountNotFound(account_id))?;

        let _category = categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::CategoryNotFound(category_id))?;

        let _subcategory = subcategories::Entity::find_by_id(subcategory_id)
            .filter(subcategories::Column::CategoryId.eq(category_id))
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::SubcategoryNotFound(subcategory_id))?;

        Ok(())
    }
}
