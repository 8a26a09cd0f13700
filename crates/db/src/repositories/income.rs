//! Income repository.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{accounts, income_categories, income_subcategories, incomes};

/// Error types for income operations.
#[derive(Debug, thiserror::Error)]
pub enum IncomeError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Income category not found.
    #[error("Income category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Income subcategory not found or not under the given category.
    #[error("Income subcategory not found under category: {0}")]
    SubcategoryNotFound(Uuid),

    /// Amount must be positive.
    #[error("Income amount must be positive")]
    NonPositiveAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an income record.
#[derive(Debug, Clone)]
pub struct CreateIncomeInput {
    /// Owning user.
    pub user_id: Uuid,
    /// Where the money came from.
    pub description: String,
    /// Income amount.
    pub amount: Decimal,
    /// Day the income was received.
    pub date: NaiveDate,
    /// Income category.
    pub category_id: Uuid,
    /// Optional subcategory, must belong to `category_id` when given.
    pub subcategory_id: Option<Uuid>,
    /// Account the money entered.
    pub account_id: Uuid,
}

/// Income repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct IncomeRepository {
    db: DatabaseConnection,
}

impl IncomeRepository {
    /// Creates a new income repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new income record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is not positive
    /// - The account or category does not exist
    /// - A subcategory is given that does not belong to the category
    /// - The database operation fails
    pub async fn create_income(
        &self,
        input: CreateIncomeInput,
    ) -> Result<incomes::Model, IncomeError> {
        if input.amount <= Decimal::ZERO {
            return Err(IncomeError::NonPositiveAmount);
        }

        let _account = accounts::Entity::find_by_id(input.account_id)
            .filter(accounts::Column::UserId.eq(input.user_id))
            .one(&self.db)
            .await?
            .ok_or(IncomeError::AccountNotFound(input.account_id))?;

        let _category = income_categories::Entity::find_by_id(input.category_id)
            .filter(income_categories::Column::UserId.eq(input.user_id))
            .one(&self.db)
            .await?
            .ok_or(IncomeError::CategoryNotFound(input.category_id))?;

        if let Some(subcategory_id) = input.subcategory_id {
            let _sub = income_subcategories::Entity::find_by_id(subcategory_id)
                .filter(income_subcategories::Column::IncomeCategoryId.eq(input.category_id))
                .one(&self.db)
                .await?
                .ok_or(IncomeError::SubcategoryNotFound(subcategory_id))?;
        }

        let now = Utc::now().into();

        let income = incomes::ActiveModel {
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

        let result = income.insert(&self.db).await?;
        Ok(result)
    }

    /// Lists a user's income records, most recent date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_incomes(&self, user_id: Uuid) -> Result<Vec<incomes::Model>, IncomeError> {
        let result = incomes::Entity::find()
            .filter(incomes::Column::UserId.eq(user_id))
            .order_by_desc(incomes::Column::Date)
            .order_by_desc(incomes::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(result)
    }
}
