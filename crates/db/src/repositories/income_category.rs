//! Income category repository.
//!
//! Mirrors the expense category layout, with one extra operation: a full
//! replace used by the update endpoint, which swaps the subcategory set
//! inside a transaction.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{income_categories, income_subcategories};

/// Error types for income category operations.
#[derive(Debug, thiserror::Error)]
pub enum IncomeCategoryError {
    /// Income category not found.
    #[error("Income category not found: {0}")]
    NotFound(Uuid),

    /// Income category name already exists for this user.
    #[error("Income category name already exists: {0}")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Income category with its subcategories.
#[derive(Debug, Clone)]
pub struct IncomeCategoryWithSubcategories {
    /// Income category record.
    pub category: income_categories::Model,
    /// Subcategories belonging to the category.
    pub subcategories: Vec<income_subcategories::Model>,
}

/// Income category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct IncomeCategoryRepository {
    db: DatabaseConnection,
}

impl IncomeCategoryRepository {
    /// Creates a new income category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an income category with an optional initial set of
    /// subcategories, inserted in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken for this user or the
    /// database operation fails.
    pub async fn create_category(
        &self,
        user_id: Uuid,
        name: String,
        subcategory_names: Vec<String>,
    ) -> Result<IncomeCategoryWithSubcategories, IncomeCategoryError> {
        let existing = income_categories::Entity::find()
            .filter(income_categories::Column::UserId.eq(user_id))
            .filter(income_categories::Column::Name.eq(&name))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(IncomeCategoryError::DuplicateName(name));
        }

        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let category_id = Uuid::new_v4();

        let category = income_categories::ActiveModel {
            id: Set(category_id),
            user_id: Set(user_id),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let category = category.insert(&txn).await?;

        let mut created = Vec::with_capacity(subcategory_names.len());
        for sub_name in subcategory_names {
            let sub = income_subcategories::ActiveModel {
                id: Set(Uuid::new_v4()),
                income_category_id: Set(category_id),
                name: Set(sub_name),
                created_at: Set(now),
            };
            created.push(sub.insert(&txn).await?);
        }

        txn.commit().await?;

        Ok(IncomeCategoryWithSubcategories {
            category,
            subcategories: created,
        })
    }

    /// Lists a user's income categories with their subcategories, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<IncomeCategoryWithSubcategories>, IncomeCategoryError> {
        let category_list = income_categories::Entity::find()
            .filter(income_categories::Column::UserId.eq(user_id))
            .order_by_desc(income_categories::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(category_list.len());
        for category in category_list {
            let subs = income_subcategories::Entity::find()
                .filter(income_subcategories::Column::IncomeCategoryId.eq(category.id))
                .order_by_asc(income_subcategories::Column::CreatedAt)
                .all(&self.db)
                .await?;
            result.push(IncomeCategoryWithSubcategories {
                category,
                subcategories: subs,
            });
        }

        Ok(result)
    }

    /// Renames an income category and replaces its subcategory set.
    ///
    /// The old subcategories are deleted and the new set inserted inside a
    /// single transaction, so readers never observe a half-replaced list.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found, the new name collides
    /// with another category of the same user, or the database operation
    /// fails.
    pub async fn update_category(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        name: String,
        subcategory_names: Vec<String>,
    ) -> Result<IncomeCategoryWithSubcategories, IncomeCategoryError> {
        let category = income_categories::Entity::find_by_id(category_id)
            .filter(income_categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(IncomeCategoryError::NotFound(category_id))?;

        let collision = income_categories::Entity::find()
            .filter(income_categories::Column::UserId.eq(user_id))
            .filter(income_categories::Column::Name.eq(&name))
            .filter(income_categories::Column::Id.ne(category_id))
            .one(&self.db)
            .await?;

        if collision.is_some() {
            return Err(IncomeCategoryError::DuplicateName(name));
        }

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let mut active: income_categories::ActiveModel = category.into();
        active.name = Set(name);
        active.updated_at = Set(now);
        let category = active.update(&txn).await?;

        income_subcategories::Entity::delete_many()
            .filter(income_subcategories::Column::IncomeCategoryId.eq(category_id))
            .exec(&txn)
            .await?;

        let mut created = Vec::with_capacity(subcategory_names.len());
        for sub_name in subcategory_names {
            let sub = income_subcategories::ActiveModel {
                id: Set(Uuid::new_v4()),
                income_category_id: Set(category_id),
                name: Set(sub_name),
                created_at: Set(now),
            };
            created.push(sub.insert(&txn).await?);
        }

        txn.commit().await?;

        Ok(IncomeCategoryWithSubcategories {
            category,
            subcategories: created,
        })
    }
}
