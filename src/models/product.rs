//! Product entity model
//!
//! A product links to partners and notices through the `product_partners`
//! and `product_notices` tables. Those links are written by
//! [`ProductRepository`](crate::repositories::ProductRepository) together
//! with the product row.

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, Order, Set};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::repositories::ContentSchema;

/// Product entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "products")]
#[schema(as = Product)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub name: String,

    /// Rich text; sanitized before public display
    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Free-text product line, used for grouping on the public page
    pub category: Option<String>,

    /// JSON array of image URLs
    #[sea_orm(column_type = "JsonBinary")]
    #[schema(value_type = Vec<String>)]
    pub images: JsonValue,

    pub sort_order: i32,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub created_at: DateTimeWithTimeZone,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Image URLs; entries that are not strings are skipped.
    pub fn image_urls(&self) -> Vec<String> {
        self.images
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_partner::Entity")]
    ProductPartner,
    #[sea_orm(has_many = "super::product_notice::Entity")]
    ProductNotice,
}

impl Related<super::product_partner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductPartner.def()
    }
}

impl Related<super::product_notice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductNotice.def()
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

/// Editable columns of a product
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductFields {
    #[schema(example = "Industrial sensor X1")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    #[schema(example = json!(["https://cdn.example.com/x1.png"]))]
    pub images: Vec<String>,
    #[serde(default)]
    pub sort_order: i32,
}

/// Submitted product form: the columns plus the linked partner and notice ids
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductForm {
    #[serde(flatten)]
    pub fields: ProductFields,
    #[serde(default)]
    pub partner_ids: Vec<i64>,
    #[serde(default)]
    pub notice_ids: Vec<i64>,
}

impl ContentSchema for Entity {
    const LABEL: &'static str = "Product";

    type Active = ActiveModel;
    type Form = ProductFields;

    fn list_order() -> Vec<(Column, Order)> {
        vec![(Column::SortOrder, Order::Asc), (Column::Id, Order::Asc)]
    }

    fn assign(active: &mut ActiveModel, form: ProductFields) {
        active.name = Set(form.name);
        active.description = Set(form.description);
        active.category = Set(form.category);
        active.images = Set(JsonValue::from(form.images));
        active.sort_order = Set(form.sort_order);
    }
}
