//! Public read queries for notices.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::content::ContentRepository;
use crate::error::RepositoryError;
use crate::models::notice::{Column, Entity as Notice, Model as NoticeModel};

/// Upper bound on notices returned by one public listing.
pub const MAX_PUBLIC_NOTICES: u64 = 100;

impl<'a, C: ConnectionTrait> ContentRepository<'a, Notice, C> {
    /// Published notices, newest first, optionally restricted to a category.
    pub async fn list_published(
        &self,
        category_id: Option<i64>,
        limit: Option<u64>,
    ) -> Result<Vec<NoticeModel>, RepositoryError> {
        let mut query = Notice::find().filter(Column::Published.eq(true));
        if let Some(category_id) = category_id {
            query = query.filter(Column::CategoryId.eq(category_id));
        }

        let notices = query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit.unwrap_or(MAX_PUBLIC_NOTICES).min(MAX_PUBLIC_NOTICES))
            .all(self.db)
            .await?;

        Ok(notices)
    }

    /// A notice only if it is published.
    pub async fn get_published(&self, id: i64) -> Result<Option<NoticeModel>, RepositoryError> {
        Ok(self.get(id).await?.filter(|notice| notice.published))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{notice::NoticeForm, notice_category};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection};

    async fn setup_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.expect("sqlite");
        Migrator::up(&db, None).await.expect("migrations");
        db
    }

    fn form(title: &str, category_id: Option<i64>, published: bool) -> NoticeForm {
        NoticeForm {
            title: title.to_string(),
            body: String::new(),
            category_id,
            published,
        }
    }

    #[tokio::test]
    async fn list_published_filters_drafts_and_category() {
        let db = setup_db().await;
        let category = ContentRepository::<notice_category::Entity>::new(&db)
            .create(notice_category::NoticeCategoryForm {
                name: "Press".to_string(),
            })
            .await
            .unwrap();
        let repo = ContentRepository::<Notice>::new(&db);
        repo.create(form("draft", Some(category.id), false)).await.unwrap();
        repo.create(form("press", Some(category.id), true)).await.unwrap();
        repo.create(form("general", None, true)).await.unwrap();

        let all: Vec<String> = repo
            .list_published(None, None)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(all, vec!["general", "press"]);

        let press = repo.list_published(Some(category.id), None).await.unwrap();
        assert_eq!(press.len(), 1);
        assert_eq!(press[0].title, "press");

        assert_eq!(repo.list_published(None, Some(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn get_published_hides_drafts() {
        let db = setup_db().await;
        let repo = ContentRepository::<Notice>::new(&db);
        let draft = repo.create(form("draft", None, false)).await.unwrap();

        assert!(repo.get(draft.id).await.unwrap().is_some());
        assert!(repo.get_published(draft.id).await.unwrap().is_none());
    }
}
