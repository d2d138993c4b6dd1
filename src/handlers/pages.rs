//! # Public Pages
//!
//! Localized page payloads under `/{locale}`. Every handler reads through the
//! repositories at call time and cleans rich-text fields with the configured
//! sanitizer before returning them.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, not_found};
use crate::locale::{Locale, Localized};
use crate::models::{
    Notice, company_settings, facility, home_settings, notice, notice_category, partner, product,
};
use crate::repositories::{ContentRepository, ProductDetail, ProductRepository, SettingsRepository};
use crate::sanitize::sanitize;
use crate::server::AppState;

/// Published notices shown on the home page.
pub const HOME_NOTICE_COUNT: u64 = 5;

#[derive(Debug, Serialize, ToSchema)]
pub struct HomePage {
    pub locale: String,
    pub home: home_settings::Model,
    pub company: company_settings::Model,
    pub latest_notices: Vec<notice::Model>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeListPage {
    pub locale: String,
    pub categories: Vec<notice_category::Model>,
    /// Category filter in effect, if any
    pub category_id: Option<i64>,
    pub notices: Vec<notice::Model>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticePage {
    pub locale: String,
    pub notice: notice::Model,
    pub category: Option<notice_category::Model>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListPage {
    pub locale: String,
    pub products: Vec<product::Model>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPage {
    pub locale: String,
    #[serde(flatten)]
    pub detail: ProductDetail,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PartnerListPage {
    pub locale: String,
    pub partners: Vec<partner::Model>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FacilityListPage {
    pub locale: String,
    pub facilities: Vec<facility::Model>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyPage {
    pub locale: String,
    pub company: company_settings::Model,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NoticeFilter {
    /// Restrict the listing to one category
    pub category_id: Option<i64>,
}

impl AppState {
    fn clean(&self, html: &str) -> String {
        sanitize(self.sanitizer.as_ref(), html)
    }

    fn clean_notice(&self, mut notice: notice::Model) -> notice::Model {
        notice.body = self.clean(&notice.body);
        notice
    }

    fn clean_product(&self, mut product: product::Model) -> product::Model {
        product.description = self.clean(&product.description);
        product
    }

    fn clean_company(&self, mut company: company_settings::Model) -> company_settings::Model {
        company.ceo_message = self.clean(&company.ceo_message);
        company
    }
}

#[utoipa::path(
    get,
    path = "/{locale}",
    params(("locale" = String, Path, description = "Supported locale code")),
    responses(
        (status = 200, description = "Home page", body = HomePage),
        (status = 307, description = "Redirect to the default locale")
    ),
    tag = "pages"
)]
pub async fn home(
    State(state): State<AppState>,
    locale: Locale,
) -> Result<Localized<HomePage>, ApiError> {
    let home = SettingsRepository::<home_settings::Entity>::new(&state.db)
        .get()
        .await?;
    let company = SettingsRepository::<company_settings::Entity>::new(&state.db)
        .get()
        .await?;
    let latest_notices = ContentRepository::<Notice>::new(&state.db)
        .list_published(None, Some(HOME_NOTICE_COUNT))
        .await?;

    let page = HomePage {
        locale: locale.as_str().to_string(),
        home,
        company: state.clean_company(company),
        latest_notices: latest_notices
            .into_iter()
            .map(|n| state.clean_notice(n))
            .collect(),
    };
    Ok(Localized(locale, page))
}

#[utoipa::path(
    get,
    path = "/{locale}/notices",
    params(
        ("locale" = String, Path, description = "Supported locale code"),
        NoticeFilter
    ),
    responses(
        (status = 200, description = "Published notices, newest first", body = NoticeListPage)
    ),
    tag = "pages"
)]
pub async fn notices(
    State(state): State<AppState>,
    locale: Locale,
    Query(filter): Query<NoticeFilter>,
) -> Result<Localized<NoticeListPage>, ApiError> {
    let categories = ContentRepository::<notice_category::Entity>::new(&state.db)
        .list()
        .await?;
    let notices = ContentRepository::<Notice>::new(&state.db)
        .list_published(filter.category_id, None)
        .await?;

    let page = NoticeListPage {
        locale: locale.as_str().to_string(),
        categories,
        category_id: filter.category_id,
        notices: notices.into_iter().map(|n| state.clean_notice(n)).collect(),
    };
    Ok(Localized(locale, page))
}

/// Unpublished notices are reported as missing.
#[utoipa::path(
    get,
    path = "/{locale}/notices/{id}",
    params(
        ("locale" = String, Path, description = "Supported locale code"),
        ("id" = i64, Path, description = "Notice id")
    ),
    responses(
        (status = 200, description = "Notice detail", body = NoticePage),
        (status = 404, description = "No such published notice", body = ApiError)
    ),
    tag = "pages"
)]
pub async fn notice_detail(
    State(state): State<AppState>,
    locale: Locale,
    Path((_, id)): Path<(String, i64)>,
) -> Result<Localized<NoticePage>, ApiError> {
    let notice = ContentRepository::<Notice>::new(&state.db)
        .get_published(id)
        .await?
        .ok_or_else(|| not_found("Notice"))?;

    let category = match notice.category_id {
        Some(category_id) => {
            ContentRepository::<notice_category::Entity>::new(&state.db)
                .get(category_id)
                .await?
        }
        None => None,
    };

    let page = NoticePage {
        locale: locale.as_str().to_string(),
        notice: state.clean_notice(notice),
        category,
    };
    Ok(Localized(locale, page))
}

#[utoipa::path(
    get,
    path = "/{locale}/products",
    params(("locale" = String, Path, description = "Supported locale code")),
    responses(
        (status = 200, description = "Products in display order", body = ProductListPage)
    ),
    tag = "pages"
)]
pub async fn products(
    State(state): State<AppState>,
    locale: Locale,
) -> Result<Localized<ProductListPage>, ApiError> {
    let products = ProductRepository::new(&state.db).list().await?;

    let page = ProductListPage {
        locale: locale.as_str().to_string(),
        products: products
            .into_iter()
            .map(|p| state.clean_product(p))
            .collect(),
    };
    Ok(Localized(locale, page))
}

#[utoipa::path(
    get,
    path = "/{locale}/products/{id}",
    params(
        ("locale" = String, Path, description = "Supported locale code"),
        ("id" = i64, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product with partners and published notices", body = ProductPage),
        (status = 404, description = "No such product", body = ApiError)
    ),
    tag = "pages"
)]
pub async fn product_detail(
    State(state): State<AppState>,
    locale: Locale,
    Path((_, id)): Path<(String, i64)>,
) -> Result<Localized<ProductPage>, ApiError> {
    let ProductDetail {
        product,
        partners,
        notices,
    } = ProductRepository::new(&state.db)
        .get_detail(id, true)
        .await?
        .ok_or_else(|| not_found("Product"))?;

    let page = ProductPage {
        locale: locale.as_str().to_string(),
        detail: ProductDetail {
            product: state.clean_product(product),
            partners,
            notices: notices.into_iter().map(|n| state.clean_notice(n)).collect(),
        },
    };
    Ok(Localized(locale, page))
}

#[utoipa::path(
    get,
    path = "/{locale}/partners",
    params(("locale" = String, Path, description = "Supported locale code")),
    responses(
        (status = 200, description = "Partners in display order", body = PartnerListPage)
    ),
    tag = "pages"
)]
pub async fn partners(
    State(state): State<AppState>,
    locale: Locale,
) -> Result<Localized<PartnerListPage>, ApiError> {
    let partners = ContentRepository::<partner::Entity>::new(&state.db)
        .list()
        .await?;

    let page = PartnerListPage {
        locale: locale.as_str().to_string(),
        partners,
    };
    Ok(Localized(locale, page))
}

#[utoipa::path(
    get,
    path = "/{locale}/facilities",
    params(("locale" = String, Path, description = "Supported locale code")),
    responses(
        (status = 200, description = "Facilities in display order", body = FacilityListPage)
    ),
    tag = "pages"
)]
pub async fn facilities(
    State(state): State<AppState>,
    locale: Locale,
) -> Result<Localized<FacilityListPage>, ApiError> {
    let facilities = ContentRepository::<facility::Entity>::new(&state.db)
        .list()
        .await?
        .into_iter()
        .map(|mut facility| {
            facility.description = state.clean(&facility.description);
            facility
        })
        .collect();

    let page = FacilityListPage {
        locale: locale.as_str().to_string(),
        facilities,
    };
    Ok(Localized(locale, page))
}

#[utoipa::path(
    get,
    path = "/{locale}/company",
    params(("locale" = String, Path, description = "Supported locale code")),
    responses(
        (status = 200, description = "Company profile", body = CompanyPage)
    ),
    tag = "pages"
)]
pub async fn company(
    State(state): State<AppState>,
    locale: Locale,
) -> Result<Localized<CompanyPage>, ApiError> {
    let company = SettingsRepository::<company_settings::Entity>::new(&state.db)
        .get()
        .await?;

    let page = CompanyPage {
        locale: locale.as_str().to_string(),
        company: state.clean_company(company),
    };
    Ok(Localized(locale, page))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{locale}", get(home))
        .route("/{locale}/notices", get(notices))
        .route("/{locale}/notices/{id}", get(notice_detail))
        .route("/{locale}/products", get(products))
        .route("/{locale}/products/{id}", get(product_detail))
        .route("/{locale}/partners", get(partners))
        .route("/{locale}/facilities", get(facilities))
        .route("/{locale}/company", get(company))
}
