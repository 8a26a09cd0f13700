//! Repository abstractions over the `SeaORM` entities.
//!
//! Each repository owns a [`sea_orm::DatabaseConnection`] clone and exposes
//! the operations the API layer needs. All queries are scoped by `user_id`.

pub mod account;
pub mod budget;
pub mod category;
pub mod expense;
pub mod income;
pub mod income_category;

pub use account::{AccountError, AccountRepository, CreateAccountInput};
pub use budget::{
    BudgetError, BudgetRepository, BudgetWithAccount, CreateBudgetInput, ExpenseDelta,
};
pub use category::{CategoryError, CategoryRepository, CategoryWithSubcategories};
pub use expense::{CreateExpenseInput, ExpenseError, ExpenseRepository, UpdateExpenseInput};
pub use income::{CreateIncomeInput, IncomeError, IncomeRepository};
pub use income_category::{
    IncomeCategoryError, IncomeCategoryRepository, IncomeCategoryWithSubcategories,
};
