//! # Admin API
//!
//! JSON endpoints behind the admin session. Content entities share the
//! generic handlers below; `content_endpoints!` instantiates and documents
//! them per entity. Products and the singleton settings have their own
//! handlers.

use axum::{
    Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use sea_orm::IntoActiveModel;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::AdminSession;
use crate::error::{ApiError, not_found};
use crate::models::{
    admin::{self, AdminForm, Model as AdminModel},
    company_settings::{self, CompanySettingsForm, Model as CompanySettingsModel},
    facility::{self, FacilityForm, Model as FacilityModel},
    home_settings::{self, HomeSettingsForm, Model as HomeSettingsModel},
    notice::{self, Model as NoticeModel, NoticeForm},
    notice_category::{self, Model as NoticeCategoryModel, NoticeCategoryForm},
    partner::{self, Model as PartnerModel, PartnerForm},
    product::{Model as ProductModel, ProductForm},
};
use crate::repositories::{
    ContentRepository, ContentSchema, Id, ProductRecord, ProductRepository, SettingsRepository,
    SettingsSchema,
};
use crate::server::AppState;

async fn list_records<E>(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<E::Model>>, ApiError>
where
    E: ContentSchema,
    E::Model: IntoActiveModel<E::Active> + Serialize,
{
    let records = ContentRepository::<E>::new(&state.db).list().await?;
    Ok(Json(records))
}

async fn get_record<E>(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<Id<E>>,
) -> Result<Json<E::Model>, ApiError>
where
    E: ContentSchema,
    E::Model: IntoActiveModel<E::Active> + Serialize,
{
    ContentRepository::<E>::new(&state.db)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(E::LABEL))
}

async fn create_record<E>(
    State(state): State<AppState>,
    session: AdminSession,
    payload: Result<Json<E::Form>, JsonRejection>,
) -> Result<(StatusCode, Json<E::Model>), ApiError>
where
    E: ContentSchema,
    E::Model: IntoActiveModel<E::Active> + Serialize,
{
    let Json(form) = payload?;
    let created = ContentRepository::<E>::new(&state.db).create(form).await?;
    tracing::info!(entity = E::LABEL, admin_id = %session.admin.id, "record created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_record<E>(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Id<E>>,
    payload: Result<Json<E::Form>, JsonRejection>,
) -> Result<Json<E::Model>, ApiError>
where
    E: ContentSchema,
    E::Model: IntoActiveModel<E::Active> + Serialize,
{
    let Json(form) = payload?;
    let updated = ContentRepository::<E>::new(&state.db)
        .update(id, form)
        .await?;
    tracing::info!(entity = E::LABEL, admin_id = %session.admin.id, "record updated");
    Ok(Json(updated))
}

async fn delete_record<E>(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<Id<E>>,
) -> Result<StatusCode, ApiError>
where
    E: ContentSchema,
    E::Model: IntoActiveModel<E::Active>,
{
    let removed = ContentRepository::<E>::new(&state.db).delete(id).await?;
    tracing::info!(entity = E::LABEL, admin_id = %session.admin.id, removed, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Concrete, documented CRUD endpoints for one content entity, plus the
/// router mounting them.
macro_rules! content_endpoints {
    (
        $module:ident,
        entity = $entity:path,
        id = $id:ident,
        form = $form:ident,
        model = $model:ident,
        collection = $collection:literal,
        item = $item:literal,
        tag = $tag:literal $(,)?
    ) => {
        pub mod $module {
            use super::*;

            #[utoipa::path(
                get,
                path = $collection,
                security(("session" = [])),
                responses(
                    (status = 200, description = "All records in display order", body = Vec<$model>),
                    (status = 401, description = "Missing or invalid session", body = ApiError),
                    (status = 403, description = "Not an admin", body = ApiError)
                ),
                tag = $tag
            )]
            pub async fn list(
                state: State<AppState>,
                session: AdminSession,
            ) -> Result<Json<Vec<$model>>, ApiError> {
                list_records::<$entity>(state, session).await
            }

            #[utoipa::path(
                get,
                path = $item,
                security(("session" = [])),
                params(("id" = $id, Path, description = "Record id")),
                responses(
                    (status = 200, description = "The record", body = $model),
                    (status = 401, description = "Missing or invalid session", body = ApiError),
                    (status = 404, description = "No such record", body = ApiError)
                ),
                tag = $tag
            )]
            pub async fn fetch(
                state: State<AppState>,
                session: AdminSession,
                id: Path<$id>,
            ) -> Result<Json<$model>, ApiError> {
                get_record::<$entity>(state, session, id).await
            }

            #[utoipa::path(
                post,
                path = $collection,
                security(("session" = [])),
                request_body = $form,
                responses(
                    (status = 201, description = "Record created", body = $model),
                    (status = 400, description = "Malformed body", body = ApiError),
                    (status = 401, description = "Missing or invalid session", body = ApiError),
                    (status = 409, description = "Conflicts with an existing record", body = ApiError)
                ),
                tag = $tag
            )]
            pub async fn create(
                state: State<AppState>,
                session: AdminSession,
                payload: Result<Json<$form>, JsonRejection>,
            ) -> Result<(StatusCode, Json<$model>), ApiError> {
                create_record::<$entity>(state, session, payload).await
            }

            #[utoipa::path(
                put,
                path = $item,
                security(("session" = [])),
                params(("id" = $id, Path, description = "Record id")),
                request_body = $form,
                responses(
                    (status = 200, description = "Record updated", body = $model),
                    (status = 400, description = "Malformed body", body = ApiError),
                    (status = 401, description = "Missing or invalid session", body = ApiError),
                    (status = 404, description = "No such record", body = ApiError)
                ),
                tag = $tag
            )]
            pub async fn update(
                state: State<AppState>,
                session: AdminSession,
                id: Path<$id>,
                payload: Result<Json<$form>, JsonRejection>,
            ) -> Result<Json<$model>, ApiError> {
                update_record::<$entity>(state, session, id, payload).await
            }

            #[utoipa::path(
                delete,
                path = $item,
                security(("session" = [])),
                params(("id" = $id, Path, description = "Record id")),
                responses(
                    (status = 204, description = "Deleted, or already absent"),
                    (status = 401, description = "Missing or invalid session", body = ApiError)
                ),
                tag = $tag
            )]
            pub async fn remove(
                state: State<AppState>,
                session: AdminSession,
                id: Path<$id>,
            ) -> Result<StatusCode, ApiError> {
                delete_record::<$entity>(state, session, id).await
            }

            pub fn router() -> Router<AppState> {
                Router::new()
                    .route("/", get(list).post(create))
                    .route("/{id}", get(fetch).put(update).delete(remove))
            }
        }
    };
}

content_endpoints!(
    notice_categories,
    entity = notice_category::Entity,
    id = i64,
    form = NoticeCategoryForm,
    model = NoticeCategoryModel,
    collection = "/api/admin/notice-categories",
    item = "/api/admin/notice-categories/{id}",
    tag = "admin",
);

content_endpoints!(
    notices,
    entity = notice::Entity,
    id = i64,
    form = NoticeForm,
    model = NoticeModel,
    collection = "/api/admin/notices",
    item = "/api/admin/notices/{id}",
    tag = "admin",
);

content_endpoints!(
    partners,
    entity = partner::Entity,
    id = i64,
    form = PartnerForm,
    model = PartnerModel,
    collection = "/api/admin/partners",
    item = "/api/admin/partners/{id}",
    tag = "admin",
);

content_endpoints!(
    facilities,
    entity = facility::Entity,
    id = i64,
    form = FacilityForm,
    model = FacilityModel,
    collection = "/api/admin/facilities",
    item = "/api/admin/facilities/{id}",
    tag = "admin",
);

content_endpoints!(
    admins,
    entity = admin::Entity,
    id = Uuid,
    form = AdminForm,
    model = AdminModel,
    collection = "/api/admin/admins",
    item = "/api/admin/admins/{id}",
    tag = "admin",
);

pub mod products {
    use super::*;

    #[utoipa::path(
        get,
        path = "/api/admin/products",
        security(("session" = [])),
        responses(
            (status = 200, description = "All products in display order", body = Vec<ProductModel>),
            (status = 401, description = "Missing or invalid session", body = ApiError)
        ),
        tag = "admin"
    )]
    pub async fn list(
        State(state): State<AppState>,
        _session: AdminSession,
    ) -> Result<Json<Vec<ProductModel>>, ApiError> {
        Ok(Json(ProductRepository::new(&state.db).list().await?))
    }

    #[utoipa::path(
        get,
        path = "/api/admin/products/{id}",
        security(("session" = [])),
        params(("id" = i64, Path, description = "Product id")),
        responses(
            (status = 200, description = "Product with linked ids", body = ProductRecord),
            (status = 404, description = "No such product", body = ApiError)
        ),
        tag = "admin"
    )]
    pub async fn fetch(
        State(state): State<AppState>,
        _session: AdminSession,
        Path(id): Path<i64>,
    ) -> Result<Json<ProductRecord>, ApiError> {
        ProductRepository::new(&state.db)
            .get(id)
            .await?
            .map(Json)
            .ok_or_else(|| not_found("Product"))
    }

    /// The product and its links are stored in one transaction.
    #[utoipa::path(
        post,
        path = "/api/admin/products",
        security(("session" = [])),
        request_body = ProductForm,
        responses(
            (status = 201, description = "Product created", body = ProductRecord),
            (status = 400, description = "Malformed body", body = ApiError),
            (status = 500, description = "Nothing was stored", body = ApiError)
        ),
        tag = "admin"
    )]
    pub async fn create(
        State(state): State<AppState>,
        session: AdminSession,
        payload: Result<Json<ProductForm>, JsonRejection>,
    ) -> Result<(StatusCode, Json<ProductRecord>), ApiError> {
        let Json(form) = payload?;
        let created = ProductRepository::new(&state.db).create(form).await?;
        tracing::info!(product_id = created.product.id, admin_id = %session.admin.id, "product created");
        Ok((StatusCode::CREATED, Json(created)))
    }

    #[utoipa::path(
        put,
        path = "/api/admin/products/{id}",
        security(("session" = [])),
        params(("id" = i64, Path, description = "Product id")),
        request_body = ProductForm,
        responses(
            (status = 200, description = "Product updated", body = ProductRecord),
            (status = 404, description = "No such product", body = ApiError)
        ),
        tag = "admin"
    )]
    pub async fn update(
        State(state): State<AppState>,
        session: AdminSession,
        Path(id): Path<i64>,
        payload: Result<Json<ProductForm>, JsonRejection>,
    ) -> Result<Json<ProductRecord>, ApiError> {
        let Json(form) = payload?;
        let updated = ProductRepository::new(&state.db).update(id, form).await?;
        tracing::info!(product_id = id, admin_id = %session.admin.id, "product updated");
        Ok(Json(updated))
    }

    #[utoipa::path(
        delete,
        path = "/api/admin/products/{id}",
        security(("session" = [])),
        params(("id" = i64, Path, description = "Product id")),
        responses(
            (status = 204, description = "Deleted, or already absent")
        ),
        tag = "admin"
    )]
    pub async fn remove(
        State(state): State<AppState>,
        session: AdminSession,
        Path(id): Path<i64>,
    ) -> Result<StatusCode, ApiError> {
        let removed = ProductRepository::new(&state.db).delete(id).await?;
        tracing::info!(product_id = id, removed, admin_id = %session.admin.id, "product deleted");
        Ok(StatusCode::NO_CONTENT)
    }

    pub fn router() -> Router<AppState> {
        Router::new()
            .route("/", get(list).post(create))
            .route("/{id}", get(fetch).put(update).delete(remove))
    }
}

async fn read_settings<E>(state: &AppState) -> Result<Json<E::Model>, ApiError>
where
    E: SettingsSchema,
    E::Model: IntoActiveModel<E::Active>,
    i32: Into<Id<E>>,
{
    Ok(Json(SettingsRepository::<E>::new(&state.db).get().await?))
}

async fn write_settings<E>(
    state: &AppState,
    session: &AdminSession,
    payload: Result<Json<E::Form>, JsonRejection>,
) -> Result<Json<E::Model>, ApiError>
where
    E: SettingsSchema,
    E::Model: IntoActiveModel<E::Active>,
    i32: Into<Id<E>>,
{
    let Json(form) = payload?;
    let updated = SettingsRepository::<E>::new(&state.db).update(form).await?;
    tracing::info!(entity = E::LABEL, admin_id = %session.admin.id, "settings updated");
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings/company",
    security(("session" = [])),
    responses(
        (status = 200, description = "Company settings", body = CompanySettingsModel),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn get_company_settings(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<CompanySettingsModel>, ApiError> {
    read_settings::<company_settings::Entity>(&state).await
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/company",
    security(("session" = [])),
    request_body = CompanySettingsForm,
    responses(
        (status = 200, description = "Company settings updated", body = CompanySettingsModel),
        (status = 400, description = "Malformed body", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn put_company_settings(
    State(state): State<AppState>,
    session: AdminSession,
    payload: Result<Json<CompanySettingsForm>, JsonRejection>,
) -> Result<Json<CompanySettingsModel>, ApiError> {
    write_settings::<company_settings::Entity>(&state, &session, payload).await
}

#[utoipa::path(
    get,
    path = "/api/admin/settings/home",
    security(("session" = [])),
    responses(
        (status = 200, description = "Home settings", body = HomeSettingsModel),
        (status = 401, description = "Missing or invalid session", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn get_home_settings(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<HomeSettingsModel>, ApiError> {
    read_settings::<home_settings::Entity>(&state).await
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/home",
    security(("session" = [])),
    request_body = HomeSettingsForm,
    responses(
        (status = 200, description = "Home settings updated", body = HomeSettingsModel),
        (status = 400, description = "Malformed body", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn put_home_settings(
    State(state): State<AppState>,
    session: AdminSession,
    payload: Result<Json<HomeSettingsForm>, JsonRejection>,
) -> Result<Json<HomeSettingsModel>, ApiError> {
    write_settings::<home_settings::Entity>(&state, &session, payload).await
}

/// The admin behind the current session
#[utoipa::path(
    get,
    path = "/api/admin/session",
    security(("session" = [])),
    responses(
        (status = 200, description = "Current admin", body = AdminSession),
        (status = 401, description = "Missing or invalid session", body = ApiError),
        (status = 403, description = "Not an admin", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn current_session(session: AdminSession) -> Json<AdminSession> {
    Json(session)
}

/// Every admin route; the caller layers the session middleware on top.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", get(current_session))
        .route(
            "/settings/company",
            get(get_company_settings).put(put_company_settings),
        )
        .route(
            "/settings/home",
            get(get_home_settings).put(put_home_settings),
        )
        .nest("/notice-categories", notice_categories::router())
        .nest("/notices", notices::router())
        .nest("/partners", partners::router())
        .nest("/facilities", facilities::router())
        .nest("/products", products::router())
        .nest("/admins", admins::router())
}
