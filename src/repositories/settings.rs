//! # Settings Repository
//!
//! Singleton settings tables hold exactly one row, keyed by [`SINGLETON_ID`].
//! Reads create the default row when it is missing, so callers never observe
//! an empty table.

use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
};
use serde::de::DeserializeOwned;

use super::content::Id;
use crate::error::RepositoryError;

/// Primary key of the only row in a settings table.
pub const SINGLETON_ID: i32 = 1;

/// Per-table wiring for [`SettingsRepository`].
pub trait SettingsSchema: EntityTrait {
    const LABEL: &'static str;

    type Active: ActiveModelTrait<Entity = Self> + ActiveModelBehavior + Send + 'static;
    type Form: DeserializeOwned + Send + 'static;

    /// Row inserted when the table is empty; carries `SINGLETON_ID`.
    fn default_row() -> Self::Active;

    fn assign(active: &mut Self::Active, form: Self::Form);
}

pub struct SettingsRepository<'a, E> {
    db: &'a DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<'a, E> SettingsRepository<'a, E>
where
    E: SettingsSchema,
    E::Model: IntoActiveModel<E::Active>,
    i32: Into<Id<E>>,
{
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// The settings row, inserting the defaults first if it does not exist.
    pub async fn get(&self) -> Result<E::Model, RepositoryError> {
        if let Some(existing) = E::find_by_id(SINGLETON_ID).one(self.db).await? {
            return Ok(existing);
        }

        match E::default_row().insert(self.db).await {
            Ok(created) => {
                tracing::info!(entity = E::LABEL, "default settings row created");
                Ok(created)
            }
            // A concurrent reader may have inserted the row first.
            Err(insert_err) => E::find_by_id(SINGLETON_ID)
                .one(self.db)
                .await?
                .ok_or(RepositoryError::Persistence(insert_err)),
        }
    }

    /// Overwrite the settings row with the submitted fields.
    pub async fn update(&self, form: E::Form) -> Result<E::Model, RepositoryError> {
        let current = self.get().await?;
        let mut active: E::Active = current.into_active_model();
        E::assign(&mut active, form);
        Ok(active.update(self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{company_settings, home_settings};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, PaginatorTrait};
    use serde_json::json;

    async fn setup_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.expect("sqlite");
        Migrator::up(&db, None).await.expect("migrations");
        db
    }

    #[tokio::test]
    async fn get_creates_exactly_one_row() {
        let db = setup_db().await;
        let repo = SettingsRepository::<company_settings::Entity>::new(&db);

        let first = repo.get().await.unwrap();
        let second = repo.get().await.unwrap();

        assert_eq!(first.id, SINGLETON_ID);
        assert_eq!(first, second);
        assert_eq!(
            company_settings::Entity::find().count(&db).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn update_overwrites_singleton() {
        let db = setup_db().await;
        let repo = SettingsRepository::<home_settings::Entity>::new(&db);

        let updated = repo
            .update(home_settings::HomeSettingsForm {
                banner_title: "Welcome".to_string(),
                banner_subtitle: Some("Since 1990".to_string()),
                banner_image_url: None,
                content: json!({"sections": ["about", "products"]}),
            })
            .await
            .unwrap();

        assert_eq!(updated.id, SINGLETON_ID);
        assert_eq!(updated.banner_title, "Welcome");
        assert_eq!(repo.get().await.unwrap(), updated);
        assert_eq!(home_settings::Entity::find().count(&db).await.unwrap(), 1);
    }
}
