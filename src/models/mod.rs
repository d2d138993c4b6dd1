//! # Data Models
//!
//! SeaORM entities for the site content plus the small DTOs shared by the
//! handlers. Each content entity module also carries its submitted form and
//! its [`ContentSchema`](crate::repositories::ContentSchema) wiring.

use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod admin;
pub mod company_settings;
pub mod facility;
pub mod home_settings;
pub mod notice;
pub mod notice_category;
pub mod partner;
pub mod product;
pub mod product_notice;
pub mod product_partner;

pub use admin::Entity as Admin;
pub use company_settings::Entity as CompanySettings;
pub use facility::Entity as Facility;
pub use home_settings::Entity as HomeSettings;
pub use notice::Entity as Notice;
pub use notice_category::Entity as NoticeCategory;
pub use partner::Entity as Partner;
pub use product::Entity as Product;
pub use product_notice::Entity as ProductNotice;
pub use product_partner::Entity as ProductPartner;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
    /// Locales the public pages are served in
    pub locales: Vec<String>,
    /// Locale used when a path carries none
    pub default_locale: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "corpsite".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            locales: Vec::new(),
            default_locale: String::new(),
        }
    }
}

/// Timestamp written by the `before_save` hooks.
pub(crate) fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().fixed_offset()
}
