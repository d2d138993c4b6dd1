//! Facility entity model

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, Order, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repositories::ContentSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "facilities")]
#[schema(as = Facility)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    /// Rich text; sanitized before public display
    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub image_url: Option<String>,

    pub sort_order: i32,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub created_at: DateTimeWithTimeZone,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

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

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FacilityForm {
    #[schema(example = "Main factory")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

impl ContentSchema for Entity {
    const LABEL: &'static str = "Facility";

    type Active = ActiveModel;
    type Form = FacilityForm;

    fn list_order() -> Vec<(Column, Order)> {
        vec![(Column::SortOrder, Order::Asc), (Column::Id, Order::Asc)]
    }

    fn assign(active: &mut ActiveModel, form: FacilityForm) {
        active.name = Set(form.name);
        active.description = Set(form.description);
        active.image_url = Set(form.image_url);
        active.sort_order = Set(form.sort_order);
    }
}
