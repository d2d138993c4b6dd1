//! Partner entity model

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, Order, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::repositories::ContentSchema;

/// Partner company shown on the partners page and linked from products
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "partners")]
#[schema(as = Partner)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    pub logo_url: Option<String>,

    pub website_url: Option<String>,

    /// Free-form attributes (country, tier, ...)
    #[sea_orm(column_type = "JsonBinary", nullable)]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<JsonValue>,

    /// Ascending display position
    pub sort_order: i32,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub created_at: DateTimeWithTimeZone,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_partner::Entity")]
    ProductPartner,
}

impl Related<super::product_partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductPartner.def()
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

/// Submitted fields for a partner
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PartnerForm {
    #[schema(example = "Acme Corp")]
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<JsonValue>,
    #[serde(default)]
    pub sort_order: i32,
}

impl ContentSchema for Entity {
    const LABEL: &'static str = "Partner";

    type Active = ActiveModel;
    type Form = PartnerForm;

    fn list_order() -> Vec<(Column, Order)> {
        vec![(Column::SortOrder, Order::Asc), (Column::Id, Order::Asc)]
    }

    fn assign(active: &mut ActiveModel, form: PartnerForm) {
        active.name = Set(form.name);
        active.logo_url = Set(form.logo_url);
        active.website_url = Set(form.website_url);
        active.metadata = Set(form.metadata);
        active.sort_order = Set(form.sort_order);
    }
}
