//! # Product Repository
//!
//! Catalog storage and keyset pagination.
//!
//! ## Keyset Pagination
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Walking the catalog by id                               │
//! │                                                                         │
//! │  ids:   1  2  3  4  5 │ 6  7  8  9  10 │ 11 12                          │
//! │         └── First ───┘ └─── Next(5) ──┘ └ Next(10) ┘                    │
//! │                                                                         │
//! │  First     ORDER BY id ASC LIMIT n                                      │
//! │  Next(c)   WHERE id > c ORDER BY id ASC LIMIT n                         │
//! │  Prev(c)   WHERE id < c ORDER BY id DESC LIMIT n, re-sorted ASC         │
//! │                                                                         │
//! │  No OFFSET: every page is an index range scan on the primary key,       │
//! │  and rows inserted behind the cursor never shift the page.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repository works on plain ids. Encrypting them into opaque cursors
//! is the caller's job.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Sqlite, SqlitePool};
use tracing::debug;

use pasar_core::metadata::Metadata;
use pasar_core::{PageDirection, PageLimit, Product};

use crate::error::{DbError, DbResult};
use crate::gateway::{ProductGateway, ProductRecord};

macro_rules! product_columns {
    () => {
        "id, uid, name, slug, sku, description, images, weight, weight_value, \
         base_price, base_price_value, offer_price, offer_price_value, discount, \
         stock, status, created_at, updated_at"
    };
}

const SELECT_BY_UID_SQL: &str = concat!("SELECT ", product_columns!(), " FROM products WHERE uid = ?1");

const LIST_FIRST_SQL: &str = concat!(
    "SELECT ",
    product_columns!(),
    " FROM products ORDER BY id ASC LIMIT ?1"
);

const LIST_NEXT_SQL: &str = concat!(
    "SELECT ",
    product_columns!(),
    " FROM products WHERE id > ?1 ORDER BY id ASC LIMIT ?2"
);

const LIST_PREV_SQL: &str = concat!(
    "SELECT * FROM (SELECT ",
    product_columns!(),
    " FROM products WHERE id < ?1 ORDER BY id DESC LIMIT ?2) ORDER BY id ASC"
);

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// use pasar_db::ProductGateway;
///
/// let repo = db.products();
/// let page = repo.list(PageLimit::new(20)?, 0, PageDirection::First).await?;
/// let product = repo.get_by_uid("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }
}

/// Reads one product by uid on any executor.
///
/// Shared with the cart repository, which resolves products inside its own
/// calls.
pub(crate) async fn fetch_by_uid<'e, E>(executor: E, uid: &str) -> DbResult<Option<Product>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let product = sqlx::query_as::<_, Product>(SELECT_BY_UID_SQL)
        .bind(uid)
        .fetch_optional(executor)
        .await?;

    Ok(product)
}

impl ProductGateway for ProductRepository {
    async fn create(&self, metadata: &Metadata, record: &ProductRecord) -> DbResult<String> {
        debug!(uid = %metadata.uid, slug = %record.slug, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                uid, name, slug, sku, description, images,
                weight, weight_value,
                base_price, base_price_value, offer_price, offer_price_value,
                discount, stock, status,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8,
                ?9, ?10, ?11, ?12,
                ?13, ?14, ?15,
                ?16, ?17
            )
            "#,
        )
        .bind(&metadata.uid)
        .bind(&record.name)
        .bind(&record.slug)
        .bind(&record.sku)
        .bind(&record.description)
        .bind(Json(&record.images))
        .bind(&record.weight)
        .bind(record.weight_value)
        .bind(&record.base_price)
        .bind(record.base_price_value)
        .bind(&record.offer_price)
        .bind(record.offer_price_value)
        .bind(record.discount)
        .bind(record.stock)
        .bind(record.status)
        .bind(metadata.created_at)
        .bind(metadata.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("sku") => {
                DbError::duplicate("sku", record.sku.clone().unwrap_or_default())
            }
            other => other,
        })?;

        Ok(metadata.uid.clone())
    }

    async fn list(
        &self,
        limit: PageLimit,
        cursor_id: i64,
        direction: PageDirection,
    ) -> DbResult<Vec<Product>> {
        debug!(
            limit = limit.get(),
            cursor_id,
            direction = direction.as_str(),
            "Listing products"
        );

        let query = match direction {
            PageDirection::First => {
                sqlx::query_as::<_, Product>(LIST_FIRST_SQL).bind(limit.get())
            }
            PageDirection::Next => sqlx::query_as::<_, Product>(LIST_NEXT_SQL)
                .bind(cursor_id)
                .bind(limit.get()),
            PageDirection::Prev => sqlx::query_as::<_, Product>(LIST_PREV_SQL)
                .bind(cursor_id)
                .bind(limit.get()),
        };

        let products = query.fetch_all(&self.pool).await?;

        debug!(count = products.len(), "Product page fetched");
        Ok(products)
    }

    async fn get_by_uid(&self, uid: &str) -> DbResult<Option<Product>> {
        fetch_by_uid(&self.pool, uid).await
    }

    async fn update_by_uid(
        &self,
        uid: &str,
        record: &ProductRecord,
        updated_at: DateTime<Utc>,
    ) -> DbResult<Option<Product>> {
        debug!(uid = %uid, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?1, slug = ?2, sku = ?3, description = ?4, images = ?5,
                weight = ?6, weight_value = ?7,
                base_price = ?8, base_price_value = ?9,
                offer_price = ?10, offer_price_value = ?11,
                discount = ?12, stock = ?13, status = ?14,
                updated_at = ?15
            WHERE uid = ?16
            "#,
        )
        .bind(&record.name)
        .bind(&record.slug)
        .bind(&record.sku)
        .bind(&record.description)
        .bind(Json(&record.images))
        .bind(&record.weight)
        .bind(record.weight_value)
        .bind(&record.base_price)
        .bind(record.base_price_value)
        .bind(&record.offer_price)
        .bind(record.offer_price_value)
        .bind(record.discount)
        .bind(record.stock)
        .bind(record.status)
        .bind(updated_at)
        .bind(uid)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        fetch_by_uid(&self.pool, uid).await
    }

    async fn delete_by_uid(&self, uid: &str) -> DbResult<bool> {
        debug!(uid = %uid, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE uid = ?1")
            .bind(uid)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestContext;
    use pasar_core::ProductStatus;

    fn page(n: i64) -> PageLimit {
        PageLimit::new(n).unwrap()
    }

    fn names(products: &[Product]) -> Vec<String> {
        products.iter().map(|p| p.name.clone()).collect()
    }

    #[tokio::test]
    async fn test_create_and_get_by_uid() {
        let ctx = TestContext::new().await;
        let product = ctx.product("Teh Melati Wangi", 10000, 10, 500.0).await;

        assert_eq!(product.slug, "teh-melati-wangi");
        assert_eq!(product.offer_price_value, 9000);
        assert_eq!(product.offer_price, "Rp 9.000");
        assert_eq!(product.weight, "500.00gr");
        assert_eq!(product.images.len(), 1);
        assert_eq!(product.status, ProductStatus::Active);

        let repo = ctx.db.products();
        assert!(repo.get_by_uid("missing").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_unique_violation() {
        let ctx = TestContext::new().await;
        let repo = ctx.db.products();

        let mut record = TestContext::record("Kopi Toraja Sapan", 90000, 0, 250.0);
        record.sku = Some("KOPI-TORAJA".to_string());
        repo.create(&Metadata::generate(), &record).await.unwrap();

        let err = repo.create(&Metadata::generate(), &record).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "sku");
                assert_eq!(value, "KOPI-TORAJA");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_walks_forward_and_back() {
        let ctx = TestContext::new().await;
        let mut ids = Vec::new();
        for i in 1..=12 {
            ids.push(ctx.product(&format!("Produk Nomor {i}"), 10000, 0, 100.0).await.id);
        }
        let repo = ctx.db.products();

        let first = repo.list(page(5), 0, PageDirection::First).await.unwrap();
        assert_eq!(first.iter().map(|p| p.id).collect::<Vec<_>>(), ids[0..5]);

        let second = repo.list(page(5), ids[4], PageDirection::Next).await.unwrap();
        assert_eq!(second.iter().map(|p| p.id).collect::<Vec<_>>(), ids[5..10]);

        let last = repo.list(page(5), ids[9], PageDirection::Next).await.unwrap();
        assert_eq!(names(&last), vec!["Produk Nomor 11", "Produk Nomor 12"]);

        let back = repo.list(page(5), ids[10], PageDirection::Prev).await.unwrap();
        assert_eq!(back.iter().map(|p| p.id).collect::<Vec<_>>(), ids[5..10]);

        let past_end = repo.list(page(5), ids[11], PageDirection::Next).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_first_page_ignores_cursor() {
        let ctx = TestContext::new().await;
        for i in 1..=3 {
            ctx.product(&format!("Produk Nomor {i}"), 10000, 0, 100.0).await;
        }

        let rows = ctx
            .db
            .products()
            .list(page(2), 999, PageDirection::First)
            .await
            .unwrap();
        assert_eq!(names(&rows), vec!["Produk Nomor 1", "Produk Nomor 2"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_by_uid() {
        let ctx = TestContext::new().await;
        let product = ctx.product("Gula Aren Cair", 20000, 0, 500.0).await;
        let repo = ctx.db.products();

        let mut record = TestContext::record("Gula Aren Bubuk", 30000, 20, 1500.0);
        record.status = ProductStatus::Inactive;
        let updated = repo
            .update_by_uid(&product.uid, &record, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, product.id);
        assert_eq!(updated.name, "Gula Aren Bubuk");
        assert_eq!(updated.offer_price_value, 24000);
        assert_eq!(updated.weight, "1.50kg");
        assert!(!updated.is_active());

        assert!(repo
            .update_by_uid("missing", &record, Utc::now())
            .await
            .unwrap()
            .is_none());

        assert!(repo.delete_by_uid(&product.uid).await.unwrap());
        assert!(!repo.delete_by_uid(&product.uid).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
