//! `SeaORM` entity definitions for all tables.

pub mod accounts;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod income_categories;
pub mod income_subcategories;
pub mod incomes;
pub mod sea_orm_active_enums;
pub mod subcategories;
