//! Home page settings singleton (row id 1)

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use utoipa::ToSchema;

use crate::repositories::{SINGLETON_ID, SettingsSchema};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "home_settings")]
#[schema(as = HomeSettings)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub banner_title: String,

    pub banner_subtitle: Option<String>,

    pub banner_image_url: Option<String>,

    /// Section configuration for the home page, passed through to the client
    #[sea_orm(column_type = "JsonBinary")]
    #[schema(value_type = Object)]
    pub content: JsonValue,

    #[schema(value_type = String, example = "2025-01-06T09:00:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        self.updated_at = Set(super::now());
        Ok(self)
    }
}

fn empty_content() -> JsonValue {
    json!({})
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct HomeSettingsForm {
    #[serde(default)]
    pub banner_title: String,
    #[serde(default)]
    pub banner_subtitle: Option<String>,
    #[serde(default)]
    pub banner_image_url: Option<String>,
    #[serde(default = "empty_content")]
    #[schema(value_type = Object)]
    pub content: JsonValue,
}

impl Default for HomeSettingsForm {
    fn default() -> Self {
        Self {
            banner_title: String::new(),
            banner_subtitle: None,
            banner_image_url: None,
            content: empty_content(),
        }
    }
}

impl SettingsSchema for Entity {
    const LABEL: &'static str = "Home settings";

    type Active = ActiveModel;
    type Form = HomeSettingsForm;

    fn default_row() -> ActiveModel {
        let mut active = <ActiveModel as ActiveModelBehavior>::new();
        active.id = Set(SINGLETON_ID);
        Self::assign(&mut active, HomeSettingsForm::default());
        active
    }

    fn assign(active: &mut ActiveModel, form: HomeSettingsForm) {
        active.banner_title = Set(form.banner_title);
        active.banner_subtitle = Set(form.banner_subtitle);
        active.banner_image_url = Set(form.banner_image_url);
        active.content = Set(form.content);
    }
}
