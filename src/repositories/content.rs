//! # Content Repository
//!
//! One generic implementation of the server actions (`list`, `get`, `create`,
//! `update`, `delete`) shared by every content entity. An entity opts in by
//! implementing [`ContentSchema`], which names its submitted form, how the
//! form maps onto the active model, and the list ordering.

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, Order, PrimaryKeyTrait, QueryOrder,
};
use serde::de::DeserializeOwned;

use crate::error::RepositoryError;

/// Primary key value type of an entity.
pub type Id<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Per-entity wiring for [`ContentRepository`].
pub trait ContentSchema: EntityTrait {
    /// Name used in "not found" errors.
    const LABEL: &'static str;

    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send + 'static;

    /// Fields as submitted by the admin form.
    type Form: DeserializeOwned + Send + 'static;

    /// Columns `list` sorts by, most significant first.
    fn list_order() -> Vec<(Self::Column, Order)>;

    /// Overwrite the editable columns of `active` with `form`.
    fn assign(active: &mut Self::Active, form: Self::Form);

    /// Set a caller-provided primary key on create. Store-assigned keys need
    /// nothing here.
    fn assign_key(_active: &mut Self::Active, _form: &Self::Form) {}
}

/// Server actions for one entity, on a connection or inside a transaction.
pub struct ContentRepository<'a, E, C = DatabaseConnection> {
    pub(super) db: &'a C,
    _entity: PhantomData<E>,
}

impl<'a, E, C> ContentRepository<'a, E, C>
where
    E: ContentSchema,
    E::Model: IntoActiveModel<E::Active>,
    C: ConnectionTrait,
{
    pub fn new(db: &'a C) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// All records in the entity's display order.
    pub async fn list(&self) -> Result<Vec<E::Model>, RepositoryError> {
        let mut query = E::find();
        for (column, order) in E::list_order() {
            query = query.order_by(column, order);
        }
        Ok(query.all(self.db).await?)
    }

    /// The record with `id`, or `None`. An absent id is not an error.
    pub async fn get(&self, id: Id<E>) -> Result<Option<E::Model>, RepositoryError> {
        Ok(E::find_by_id(id).one(self.db).await?)
    }

    /// Insert a record from the submitted fields and return it as stored.
    pub async fn create(&self, form: E::Form) -> Result<E::Model, RepositoryError> {
        let mut active = <E::Active as ActiveModelBehavior>::new();
        E::assign_key(&mut active, &form);
        E::assign(&mut active, form);

        let created = active.insert(self.db).await?;
        tracing::debug!(entity = E::LABEL, "record created");
        Ok(created)
    }

    /// Overwrite the editable fields of an existing record.
    pub async fn update(&self, id: Id<E>, form: E::Form) -> Result<E::Model, RepositoryError> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(E::LABEL))?;

        let mut active: E::Active = existing.into_active_model();
        E::assign(&mut active, form);

        Ok(active.update(self.db).await?)
    }

    /// Hard delete. Returns the number of rows removed, so deleting an
    /// absent id yields `Ok(0)`.
    pub async fn delete(&self, id: Id<E>) -> Result<u64, RepositoryError> {
        let result = E::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected > 0 {
            tracing::debug!(entity = E::LABEL, "record deleted");
        }
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{facility, notice, notice_category, partner};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};
    use serde_json::json;

    async fn setup_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.expect("sqlite");
        Migrator::up(&db, None).await.expect("migrations");
        db
    }

    fn notice_form(title: &str, published: bool) -> notice::NoticeForm {
        notice::NoticeForm {
            title: title.to_string(),
            body: format!("<p>{title}</p>"),
            category_id: None,
            published,
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_submitted_fields() {
        let db = setup_db().await;
        let repo = ContentRepository::<partner::Entity>::new(&db);

        let created = repo
            .create(partner::PartnerForm {
                name: "Acme".to_string(),
                logo_url: Some("https://cdn.example.com/acme.png".to_string()),
                website_url: None,
                metadata: Some(json!({"tier": "gold"})),
                sort_order: 3,
            })
            .await
            .unwrap();

        let fetched = repo.get(created.id).await.unwrap().expect("present");
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Acme");
        assert_eq!(fetched.metadata, Some(json!({"tier": "gold"})));
        assert_eq!(fetched.sort_order, 3);
    }

    #[tokio::test]
    async fn get_absent_id_is_none() {
        let db = setup_db().await;
        let repo = ContentRepository::<notice::Entity>::new(&db);

        assert!(repo.get(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_then_get_is_none_and_repeat_delete_is_ok() {
        let db = setup_db().await;
        let repo = ContentRepository::<facility::Entity>::new(&db);
        let created = repo
            .create(facility::FacilityForm {
                name: "Plant".to_string(),
                description: String::new(),
                image_url: None,
                sort_order: 0,
            })
            .await
            .unwrap();

        assert_eq!(repo.delete(created.id).await.unwrap(), 1);
        assert!(repo.get(created.id).await.unwrap().is_none());
        assert_eq!(repo.delete(created.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_missing_id_is_not_found() {
        let db = setup_db().await;
        let repo = ContentRepository::<notice::Entity>::new(&db);
        let created = repo.create(notice_form("Draft", false)).await.unwrap();

        let updated = repo
            .update(created.id, notice_form("Final", true))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Final");
        assert!(updated.published);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        let missing = repo.update(9999, notice_form("x", false)).await;
        assert!(matches!(
            missing,
            Err(RepositoryError::NotFound { entity: "Notice" })
        ));
    }

    #[tokio::test]
    async fn list_uses_entity_ordering() {
        let db = setup_db().await;
        let repo = ContentRepository::<notice_category::Entity>::new(&db);
        for name in ["Press", "Events", "Careers"] {
            repo.create(notice_category::NoticeCategoryForm {
                name: name.to_string(),
            })
            .await
            .unwrap();
        }

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Careers", "Events", "Press"]);
    }

    #[tokio::test]
    async fn list_empty_store_is_empty() {
        let db = setup_db().await;
        let repo = ContentRepository::<partner::Entity>::new(&db);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_category_clears_notice_reference() {
        let db = setup_db().await;
        let categories = ContentRepository::<notice_category::Entity>::new(&db);
        let notices = ContentRepository::<notice::Entity>::new(&db);

        let category = categories
            .create(notice_category::NoticeCategoryForm {
                name: "Press".to_string(),
            })
            .await
            .unwrap();
        let mut form = notice_form("Launch", true);
        form.category_id = Some(category.id);
        let notice = notices.create(form).await.unwrap();

        categories.delete(category.id).await.unwrap();

        let reloaded = notices.get(notice.id).await.unwrap().expect("notice kept");
        assert_eq!(reloaded.category_id, None);
    }
}
