//! `SeaORM` Entity for the incomes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub date: Date,
    pub category_id: Uuid,
    pub subcategory_id: Option<Uuid>,
    pub account_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::income_categories::Entity",
        from = "Column::CategoryId",
        to = "super::income_categories::Column::Id"
    )]
    IncomeCategories,
    #[sea_orm(
        belongs_to = "super::income_subcategories::Entity",
        from = "Column::SubcategoryId",
        to = "super::income_subcategories::Column::Id"
    )]
    IncomeSubcategories,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::income_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomeCategories.def()
    }
}

impl Related<super::income_subcategories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomeSubcategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
