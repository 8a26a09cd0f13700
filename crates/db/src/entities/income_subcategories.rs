//! `SeaORM` Entity for income subcategories, owned by their parent category.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "income_subcategories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub income_category_id: Uuid,
    pub name: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::income_categories::Entity",
        from = "Column::IncomeCategoryId",
        to = "super::income_categories::Column::Id"
    )]
    IncomeCategories,
}

impl Related<super::income_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomeCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
