//! Notice category entity model

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, Order, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repositories::ContentSchema;

/// Grouping label for notices
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "notice_categories")]
#[schema(as = NoticeCategory)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::notice::Entity")]
    Notice,
}

impl Related<super::notice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notice.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            self.created_at = Set(super::now());
        }
        Ok(self)
    }
}

/// Submitted fields for a category
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NoticeCategoryForm {
    #[schema(example = "Press")]
    pub name: String,
}

impl ContentSchema for Entity {
    const LABEL: &'static str = "Notice category";

    type Active = ActiveModel;
    type Form = NoticeCategoryForm;

    fn list_order() -> Vec<(Column, Order)> {
        vec![(Column::Name, Order::Asc), (Column::Id, Order::Asc)]
    }

    fn assign(active: &mut ActiveModel, form: NoticeCategoryForm) {
        active.name = Set(form.name);
    }
}
