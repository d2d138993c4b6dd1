//! Admin entity model
//!
//! The primary key is the user id issued by the external auth service, so
//! rows are keyed by the `sub` claim of the session token.

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, Order, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::repositories::ContentSchema;

/// Role given to admins registered without one.
pub const DEFAULT_ROLE: &str = "editor";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "admins")]
#[schema(as = Admin)]
pub struct Model {
    /// Auth service user id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    pub role: String,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

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

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

/// Submitted admin fields. `id` is only read on create.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdminForm {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[serde(default = "default_role")]
    #[schema(example = "editor")]
    pub role: String,
}

impl ContentSchema for Entity {
    const LABEL: &'static str = "Admin";

    type Active = ActiveModel;
    type Form = AdminForm;

    fn list_order() -> Vec<(Column, Order)> {
        vec![(Column::CreatedAt, Order::Asc), (Column::Email, Order::Asc)]
    }

    fn assign_key(active: &mut ActiveModel, form: &AdminForm) {
        active.id = Set(form.id);
    }

    fn assign(active: &mut ActiveModel, form: AdminForm) {
        active.name = Set(form.name);
        active.email = Set(form.email);
        active.role = Set(form.role);
    }
}
