//! Company settings singleton (row id 1)

use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::repositories::{SINGLETON_ID, SettingsSchema};

/// Company profile shown on the company page and in the site footer
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "company_settings")]
#[schema(as = CompanySettings)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,

    pub company_name: String,

    pub address: String,

    pub phone: Option<String>,

    pub fax: Option<String>,

    pub email: Option<String>,

    pub business_hours: Option<String>,

    pub ceo_name: Option<String>,

    /// Rich text greeting; sanitized before public display
    #[sea_orm(column_type = "Text")]
    pub ceo_message: String,

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

/// Submitted company settings
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CompanySettingsForm {
    #[serde(default)]
    #[schema(example = "Example Industries Co., Ltd.")]
    pub company_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub business_hours: Option<String>,
    #[serde(default)]
    pub ceo_name: Option<String>,
    #[serde(default)]
    pub ceo_message: String,
}

impl SettingsSchema for Entity {
    const LABEL: &'static str = "Company settings";

    type Active = ActiveModel;
    type Form = CompanySettingsForm;

    fn default_row() -> ActiveModel {
        let mut active = <ActiveModel as ActiveModelBehavior>::new();
        active.id = Set(SINGLETON_ID);
        Self::assign(&mut active, CompanySettingsForm::default());
        active
    }

    fn assign(active: &mut ActiveModel, form: CompanySettingsForm) {
        active.company_name = Set(form.company_name);
        active.address = Set(form.address);
        active.phone = Set(form.phone);
        active.fax = Set(form.fax);
        active.email = Set(form.email);
        active.business_hours = Set(form.business_hours);
        active.ceo_name = Set(form.ceo_name);
        active.ceo_message = Set(form.ceo_message);
    }
}
