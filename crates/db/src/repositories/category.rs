//! Expense category repository.
//!
//! Categories are two-level: each category owns a flat list of
//! subcategories. Category names are unique per user.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{categories, subcategories};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Category name already exists for this user.
    #[error("Category name already exists: {0}")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Category with its subcategories.
#[derive(Debug, Clone)]
pub struct CategoryWithSubcategories {
    /// Category record.
    pub category: categories::Model,
    /// Subcategories belonging to the category.
    pub subcategories: Vec<subcategories::Model>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category with an optional initial set of subcategories.
    ///
    /// The category and its subcategories are inserted in one transaction;
    /// a failed subcategory insert never leaves a half-created category.
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
    ) -> Result<CategoryWithSubcategories, CategoryError> {
        let existing = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .filter(categories::Column::Name.eq(&name))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(CategoryError::DuplicateName(name));
        }

        let txn = self.db.begin().await?;
        let now = Utc::now().into();
        let category_id = Uuid::new_v4();

        let category = categories::ActiveModel {
            id: Set(category_id),
            user_id: Set(user_id),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let category = category.insert(&txn).await?;

        let mut created = Vec::with_capacity(subcategory_names.len());
        for sub_name in subcategory_names {
            let sub = subcategories::ActiveModel {
                id: Set(Uuid::new_v4()),
                category_id: Set(category_id),
                name: Set(sub_name),
                created_at: Set(now),
            };
            created.push(sub.insert(&txn).await?);
        }

        txn.commit().await?;

        Ok(CategoryWithSubcategories {
            category,
            subcategories: created,
        })
    }

    /// Lists a user's categories with their subcategories, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CategoryWithSubcategories>, CategoryError> {
        let category_list = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id))
            .order_by_desc(categories::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(category_list.len());
        for category in category_list {
            let subs = subcategories::Entity::find()
                .filter(subcategories::Column::CategoryId.eq(category.id))
                .order_by_asc(subcategories::Column::CreatedAt)
                .all(&self.db)
                .await?;
            result.push(CategoryWithSubcategories {
                category,
                subcategories: subs,
            });
        }

        Ok(result)
    }

    /// Adds a subcategory to an existing category.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the database
    /// operation fails.
    pub async fn add_subcategory(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        name: String,
    ) -> Result<subcategories::Model, CategoryError> {
        let _category = categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(category_id))?;

        let sub = subcategories::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(category_id),
            name: Set(name),
            created_at: Set(Utc::now().into()),
        };

        let result = sub.insert(&self.db).await?;
        Ok(result)
    }
}
