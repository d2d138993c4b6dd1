//! Notice entity model
//!
//! Notices are the news/announcement posts of the site. Only published
//! notices are visible on the public pages.

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, Order, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repositories::ContentSchema;

/// Notice entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "notices")]
#[schema(as = Notice)]
pub struct Model {
    /// Store-assigned identifier
    #[sea_orm(primary_key)]
    pub id: i64,

    pub title: String,

    /// Rich text body; sanitized before public display
    #[sea_orm(column_type = "Text")]
    pub body: String,

    /// Category, cleared when the category is deleted
    pub category_id: Option<i64>,

    /// Visible on the public pages
    pub published: bool,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub created_at: DateTimeWithTimeZone,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::notice_category::Entity",
        from = "Column::CategoryId",
        to = "super::notice_category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::notice_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = super::now();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

/// Submitted fields for a notice
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NoticeForm {
    #[schema(example = "New office opening")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "<p>We moved.</p>")]
    pub body: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub published: bool,
}

impl ContentSchema for Entity {
    const LABEL: &'static str = "Notice";

    type Active = ActiveModel;
    type Form = NoticeForm;

    fn list_order() -> Vec<(Column, Order)> {
        vec![(Column::CreatedAt, Order::Desc), (Column::Id, Order::Desc)]
    }

    fn assign(active: &mut ActiveModel, form: NoticeForm) {
        active.title = Set(form.title);
        active.body = Set(form.body);
        active.category_id = Set(form.category_id);
        active.published = Set(form.published);
    }
}
