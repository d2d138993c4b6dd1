//! # Product Repository
//!
//! Products are written together with their partner and notice links. Each
//! write runs in one transaction: either the product row and all of its links
//! are stored, or nothing is.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::content::ContentRepository;
use crate::error::RepositoryError;
use crate::models::{notice, partner, product, product_notice, product_partner};

/// A product together with the ids it links to.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductRecord {
    #[serde(flatten)]
    pub product: product::Model,
    pub partner_ids: Vec<i64>,
    pub notice_ids: Vec<i64>,
}

/// A product with its linked partners and notices resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    pub product: product::Model,
    pub partners: Vec<partner::Model>,
    pub notices: Vec<notice::Model>,
}

pub struct ProductRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProductRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> Result<Vec<product::Model>, RepositoryError> {
        ContentRepository::<product::Entity>::new(self.db).list().await
    }

    pub async fn get(&self, id: i64) -> Result<Option<ProductRecord>, RepositoryError> {
        let Some(product) = ContentRepository::<product::Entity>::new(self.db)
            .get(id)
            .await?
        else {
            return Ok(None);
        };
        let (partner_ids, notice_ids) = link_ids(self.db, id).await?;

        Ok(Some(ProductRecord {
            product,
            partner_ids,
            notice_ids,
        }))
    }

    pub async fn create(&self, form: product::ProductForm) -> Result<ProductRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let product = ContentRepository::<product::Entity, DatabaseTransaction>::new(&txn)
            .create(form.fields)
            .await?;
        let (partner_ids, notice_ids) =
            replace_links(&txn, product.id, form.partner_ids, form.notice_ids).await?;

        txn.commit().await?;

        Ok(ProductRecord {
            product,
            partner_ids,
            notice_ids,
        })
    }

    /// Overwrite the product and replace its link sets.
    pub async fn update(
        &self,
        id: i64,
        form: product::ProductForm,
    ) -> Result<ProductRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let product = ContentRepository::<product::Entity, DatabaseTransaction>::new(&txn)
            .update(id, form.fields)
            .await?;
        let (partner_ids, notice_ids) =
            replace_links(&txn, id, form.partner_ids, form.notice_ids).await?;

        txn.commit().await?;

        Ok(ProductRecord {
            product,
            partner_ids,
            notice_ids,
        })
    }

    /// Links are removed by the schema's cascade.
    pub async fn delete(&self, id: i64) -> Result<u64, RepositoryError> {
        ContentRepository::<product::Entity>::new(self.db)
            .delete(id)
            .await
    }

    /// Product page data: the product, its partners in display order and its
    /// linked notices, newest first. With `published_only`, draft notices are
    /// left out.
    pub async fn get_detail(
        &self,
        id: i64,
        published_only: bool,
    ) -> Result<Option<ProductDetail>, RepositoryError> {
        let Some(ProductRecord {
            product,
            partner_ids,
            notice_ids,
        }) = self.get(id).await?
        else {
            return Ok(None);
        };

        let partners = if partner_ids.is_empty() {
            Vec::new()
        } else {
            partner::Entity::find()
                .filter(partner::Column::Id.is_in(partner_ids))
                .order_by_asc(partner::Column::SortOrder)
                .order_by_asc(partner::Column::Id)
                .all(self.db)
                .await?
        };

        let notices = if notice_ids.is_empty() {
            Vec::new()
        } else {
            let mut query = notice::Entity::find().filter(notice::Column::Id.is_in(notice_ids));
            if published_only {
                query = query.filter(notice::Column::Published.eq(true));
            }
            query
                .order_by_desc(notice::Column::CreatedAt)
                .order_by_desc(notice::Column::Id)
                .all(self.db)
                .await?
        };

        Ok(Some(ProductDetail {
            product,
            partners,
            notices,
        }))
    }
}

async fn link_ids<C: ConnectionTrait>(
    db: &C,
    product_id: i64,
) -> Result<(Vec<i64>, Vec<i64>), RepositoryError> {
    let partner_ids = product_partner::Entity::find()
        .filter(product_partner::Column::ProductId.eq(product_id))
        .order_by_asc(product_partner::Column::PartnerId)
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.partner_id)
        .collect();

    let notice_ids = product_notice::Entity::find()
        .filter(product_notice::Column::ProductId.eq(product_id))
        .order_by_asc(product_notice::Column::NoticeId)
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.notice_id)
        .collect();

    Ok((partner_ids, notice_ids))
}

/// Swap the link sets of a product. Returns the stored ids, sorted and
/// deduplicated.
async fn replace_links(
    txn: &DatabaseTransaction,
    product_id: i64,
    mut partner_ids: Vec<i64>,
    mut notice_ids: Vec<i64>,
) -> Result<(Vec<i64>, Vec<i64>), RepositoryError> {
    partner_ids.sort_unstable();
    partner_ids.dedup();
    notice_ids.sort_unstable();
    notice_ids.dedup();

    product_partner::Entity::delete_many()
        .filter(product_partner::Column::ProductId.eq(product_id))
        .exec(txn)
        .await?;
    product_notice::Entity::delete_many()
        .filter(product_notice::Column::ProductId.eq(product_id))
        .exec(txn)
        .await?;

    if !partner_ids.is_empty() {
        product_partner::Entity::insert_many(partner_ids.iter().map(|&partner_id| {
            product_partner::ActiveModel {
                product_id: Set(product_id),
                partner_id: Set(partner_id),
            }
        }))
        .exec_without_returning(txn)
        .await?;
    }

    if !notice_ids.is_empty() {
        product_notice::Entity::insert_many(notice_ids.iter().map(|&notice_id| {
            product_notice::ActiveModel {
                product_id: Set(product_id),
                notice_id: Set(notice_id),
            }
        }))
        .exec_without_returning(txn)
        .await?;
    }

    Ok((partner_ids, notice_ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notice::NoticeForm;
    use crate::models::partner::PartnerForm;
    use crate::models::product::{ProductFields, ProductForm};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, PaginatorTrait};

    async fn setup_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1);
        let db = Database::connect(options).await.expect("sqlite");
        Migrator::up(&db, None).await.expect("migrations");
        db
    }

    async fn seed_partner(db: &DatabaseConnection, name: &str, sort_order: i32) -> i64 {
        ContentRepository::<partner::Entity>::new(db)
            .create(PartnerForm {
                name: name.to_string(),
                logo_url: None,
                website_url: None,
                metadata: None,
                sort_order,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_notice(db: &DatabaseConnection, title: &str, published: bool) -> i64 {
        ContentRepository::<notice::Entity>::new(db)
            .create(NoticeForm {
                title: title.to_string(),
                body: String::new(),
                category_id: None,
                published,
            })
            .await
            .unwrap()
            .id
    }

    fn form(name: &str, partner_ids: Vec<i64>, notice_ids: Vec<i64>) -> ProductForm {
        ProductForm {
            fields: ProductFields {
                name: name.to_string(),
                description: "<p>desc</p>".to_string(),
                category: Some("sensors".to_string()),
                images: vec!["x1.png".to_string()],
                sort_order: 0,
            },
            partner_ids,
            notice_ids,
        }
    }

    #[tokio::test]
    async fn create_stores_product_and_links() {
        let db = setup_db().await;
        let p1 = seed_partner(&db, "B", 2).await;
        let p2 = seed_partner(&db, "A", 1).await;
        let n1 = seed_notice(&db, "launch", true).await;
        let repo = ProductRepository::new(&db);

        let created = repo
            .create(form("X1", vec![p1, p2, p1], vec![n1]))
            .await
            .unwrap();
        assert_eq!(created.partner_ids, vec![p1, p2]);
        assert_eq!(created.notice_ids, vec![n1]);
        assert_eq!(created.product.image_urls(), vec!["x1.png"]);

        let fetched = repo.get(created.product.id).await.unwrap().expect("present");
        assert_eq!(fetched, created);

        let detail = repo
            .get_detail(created.product.id, true)
            .await
            .unwrap()
            .expect("present");
        let partner_names: Vec<_> = detail.partners.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(partner_names, vec!["A", "B"]);
        assert_eq!(detail.notices.len(), 1);
    }

    #[tokio::test]
    async fn failed_link_rolls_back_product() {
        let db = setup_db().await;
        let repo = ProductRepository::new(&db);

        let result = repo.create(form("X1", vec![9999], Vec::new())).await;

        assert!(matches!(result, Err(RepositoryError::Persistence(_))));
        assert_eq!(product::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_replaces_links_and_missing_is_not_found() {
        let db = setup_db().await;
        let p1 = seed_partner(&db, "A", 0).await;
        let p2 = seed_partner(&db, "B", 0).await;
        let repo = ProductRepository::new(&db);
        let created = repo.create(form("X1", vec![p1], Vec::new())).await.unwrap();

        let updated = repo
            .update(created.product.id, form("X2", vec![p2], Vec::new()))
            .await
            .unwrap();
        assert_eq!(updated.product.name, "X2");
        assert_eq!(updated.partner_ids, vec![p2]);

        let missing = repo.update(4242, form("nope", Vec::new(), Vec::new())).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn detail_can_hide_draft_notices() {
        let db = setup_db().await;
        let draft = seed_notice(&db, "draft", false).await;
        let live = seed_notice(&db, "live", true).await;
        let repo = ProductRepository::new(&db);
        let created = repo
            .create(form("X1", Vec::new(), vec![draft, live]))
            .await
            .unwrap();

        let public = repo
            .get_detail(created.product.id, true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(public.notices.len(), 1);
        assert_eq!(public.notices[0].title, "live");

        let admin = repo
            .get_detail(created.product.id, false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.notices.len(), 2);
    }

    #[tokio::test]
    async fn delete_cascades_links() {
        let db = setup_db().await;
        let p1 = seed_partner(&db, "A", 0).await;
        let repo = ProductRepository::new(&db);
        let created = repo.create(form("X1", vec![p1], Vec::new())).await.unwrap();

        assert_eq!(repo.delete(created.product.id).await.unwrap(), 1);
        assert!(repo.get(created.product.id).await.unwrap().is_none());
        assert_eq!(
            product_partner::Entity::find().count(&db).await.unwrap(),
            0
        );
    }
}
