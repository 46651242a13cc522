//! # Cart Repository
//!
//! Storage for carts and cart lines. Every write is a pair: the line row
//! and the cart aggregate, committed together.
//!
//! ## Write Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   One cart write, one transaction                       │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE carts SET <aggregate>, version = version + 1                  │
//! │     WHERE uid = ? AND version = ?                                       │
//! │       │                                                                 │
//! │       ├── 0 rows, cart exists  → StaleAggregate   (rollback)            │
//! │       ├── 0 rows, no cart      → NotFound         (rollback)            │
//! │       ▼                                                                 │
//! │    INSERT / UPDATE / DELETE cart_items                                  │
//! │     (update/delete scoped to the same cart)                             │
//! │       │                                                                 │
//! │       ├── 0 rows               → NotFound         (rollback)            │
//! │       ▼                                                                 │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Early returns drop the transaction, which rolls it back.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Writing the aggregate first takes SQLite's write lock before anything
//! else happens, so two writers on one cart serialize and the loser sees a
//! bumped version.

use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use pasar_core::{Cart, CartItem, Product};

use crate::error::{DbError, DbResult};
use crate::gateway::{CartAggregateUpdate, CartGateway, CartItemUpdate, NewCartItemRecord};
use crate::repository::product;

macro_rules! cart_columns {
    () => {
        "id, uid, quantity, total_price, total_price_value, total_weight, \
         total_weight_value, user_id, version, created_at, updated_at"
    };
}

macro_rules! cart_item_columns {
    () => {
        "id, uid, quantity, total_price, total_price_value, total_weight, \
         total_weight_value, product_name, product_slug, product_image, \
         product_weight, product_weight_value, base_price, base_price_value, \
         offer_price, offer_price_value, discount, cart_id, product_id, \
         created_at, updated_at"
    };
}

const CART_BY_USER_SQL: &str = concat!("SELECT ", cart_columns!(), " FROM carts WHERE user_id = ?1");
const CART_BY_UID_SQL: &str = concat!("SELECT ", cart_columns!(), " FROM carts WHERE uid = ?1");

const ITEMS_BY_CART_SQL: &str = concat!(
    "SELECT ",
    cart_item_columns!(),
    " FROM cart_items WHERE cart_id = ?1 ORDER BY id ASC"
);
const ITEM_BY_UID_SQL: &str = concat!("SELECT ", cart_item_columns!(), " FROM cart_items WHERE uid = ?1");
const ITEM_BY_PRODUCT_SQL: &str = concat!(
    "SELECT ",
    cart_item_columns!(),
    " FROM cart_items WHERE cart_id = ?1 AND product_id = ?2"
);

/// Repository for carts and cart lines.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Reads a cart and its items in one transaction so the aggregate and
    /// the lines come from the same snapshot.
    async fn load_cart(&self, sql: &'static str, key: CartKey<'_>) -> DbResult<Option<Cart>> {
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let query = sqlx::query_as::<_, Cart>(sql);
        let query = match key {
            CartKey::UserId(user_id) => query.bind(user_id),
            CartKey::Uid(uid) => query.bind(uid),
        };

        let Some(mut cart) = query.fetch_optional(&mut *tx).await? else {
            return Ok(None);
        };

        cart.items = sqlx::query_as::<_, CartItem>(ITEMS_BY_CART_SQL)
            .bind(cart.id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await.map_err(DbError::transaction)?;

        Ok(Some(cart))
    }
}

enum CartKey<'a> {
    UserId(i64),
    Uid(&'a str),
}

/// Writes the aggregate if the cart is still at the expected version.
async fn write_aggregate(conn: &mut SqliteConnection, update: &CartAggregateUpdate) -> DbResult<()> {
    let aggregate = &update.aggregate;

    let result = sqlx::query(
        r#"
        UPDATE carts SET
            quantity = ?1,
            total_price = ?2,
            total_price_value = ?3,
            total_weight = ?4,
            total_weight_value = ?5,
            version = version + 1,
            updated_at = ?6
        WHERE uid = ?7 AND version = ?8
        "#,
    )
    .bind(aggregate.quantity)
    .bind(&aggregate.total_price)
    .bind(aggregate.total_price_value)
    .bind(&aggregate.total_weight)
    .bind(aggregate.total_weight_value)
    .bind(update.updated_at)
    .bind(&update.cart_uid)
    .bind(update.expected_version)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    let current: Option<i64> = sqlx::query_scalar("SELECT version FROM carts WHERE uid = ?1")
        .bind(&update.cart_uid)
        .fetch_optional(&mut *conn)
        .await?;

    match current {
        Some(version) => {
            warn!(
                cart_uid = %update.cart_uid,
                expected = update.expected_version,
                actual = version,
                "Rejected stale cart aggregate"
            );
            Err(DbError::StaleAggregate {
                cart_uid: update.cart_uid.clone(),
                expected_version: update.expected_version,
            })
        }
        None => Err(DbError::not_found("Cart", update.cart_uid.clone())),
    }
}

impl CartGateway for CartRepository {
    async fn get_cart_by_user_id(&self, user_id: i64) -> DbResult<Option<Cart>> {
        self.load_cart(CART_BY_USER_SQL, CartKey::UserId(user_id)).await
    }

    async fn get_cart_by_uid(&self, uid: &str) -> DbResult<Option<Cart>> {
        self.load_cart(CART_BY_UID_SQL, CartKey::Uid(uid)).await
    }

    async fn get_cart_item_by_uid(&self, uid: &str) -> DbResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(ITEM_BY_UID_SQL)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn get_cart_item_by_product_id(
        &self,
        cart_id: i64,
        product_id: i64,
    ) -> DbResult<Option<CartItem>> {
        let item = sqlx::query_as::<_, CartItem>(ITEM_BY_PRODUCT_SQL)
            .bind(cart_id)
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    async fn get_product_by_uid(&self, uid: &str) -> DbResult<Option<Product>> {
        product::fetch_by_uid(&self.pool, uid).await
    }

    async fn create_cart_item(
        &self,
        item: &NewCartItemRecord,
        aggregate: &CartAggregateUpdate,
    ) -> DbResult<String> {
        debug!(
            cart_uid = %aggregate.cart_uid,
            product_id = item.product_id,
            quantity = item.totals.quantity,
            "Creating cart item"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        write_aggregate(&mut tx, aggregate).await?;

        let totals = &item.totals;
        sqlx::query(
            r#"
            INSERT INTO cart_items (
                uid, quantity,
                total_price, total_price_value, total_weight, total_weight_value,
                product_name, product_slug, product_image,
                product_weight, product_weight_value,
                base_price, base_price_value, offer_price, offer_price_value, discount,
                cart_id, product_id,
                created_at, updated_at
            ) VALUES (
                ?1, ?2,
                ?3, ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11,
                ?12, ?13, ?14, ?15, ?16,
                ?17, ?18,
                ?19, ?20
            )
            "#,
        )
        .bind(&item.metadata.uid)
        .bind(totals.quantity)
        .bind(&totals.total_price)
        .bind(totals.total_price_value)
        .bind(&totals.total_weight)
        .bind(totals.total_weight_value)
        .bind(&item.product_name)
        .bind(&item.product_slug)
        .bind(&item.product_image)
        .bind(&item.product_weight)
        .bind(item.product_weight_value)
        .bind(&item.base_price)
        .bind(item.base_price_value)
        .bind(&item.offer_price)
        .bind(item.offer_price_value)
        .bind(item.discount)
        .bind(item.cart_id)
        .bind(item.product_id)
        .bind(item.metadata.created_at)
        .bind(item.metadata.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(DbError::transaction)?;

        debug!(uid = %item.metadata.uid, "Cart item created");
        Ok(item.metadata.uid.clone())
    }

    async fn update_cart_item(
        &self,
        item: &CartItemUpdate,
        aggregate: &CartAggregateUpdate,
    ) -> DbResult<()> {
        debug!(
            cart_uid = %aggregate.cart_uid,
            uid = %item.uid,
            quantity = item.totals.quantity,
            "Updating cart item"
        );

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        write_aggregate(&mut tx, aggregate).await?;

        let totals = &item.totals;
        let result = sqlx::query(
            r#"
            UPDATE cart_items SET
                quantity = ?1,
                total_price = ?2,
                total_price_value = ?3,
                total_weight = ?4,
                total_weight_value = ?5,
                updated_at = ?6
            WHERE uid = ?7
              AND cart_id = (SELECT id FROM carts WHERE uid = ?8)
            "#,
        )
        .bind(totals.quantity)
        .bind(&totals.total_price)
        .bind(totals.total_price_value)
        .bind(&totals.total_weight)
        .bind(totals.total_weight_value)
        .bind(item.updated_at)
        .bind(&item.uid)
        .bind(&aggregate.cart_uid)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CartItem", item.uid.clone()));
        }

        tx.commit().await.map_err(DbError::transaction)?;
        Ok(())
    }

    async fn delete_cart_item_by_uid(
        &self,
        uid: &str,
        aggregate: &CartAggregateUpdate,
    ) -> DbResult<()> {
        debug!(cart_uid = %aggregate.cart_uid, uid = %uid, "Deleting cart item");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        write_aggregate(&mut tx, aggregate).await?;

        let result = sqlx::query(
            r#"
            DELETE FROM cart_items
            WHERE uid = ?1
              AND cart_id = (SELECT id FROM carts WHERE uid = ?2)
            "#,
        )
        .bind(uid)
        .bind(&aggregate.cart_uid)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CartItem", uid));
        }

        tx.commit().await.map_err(DbError::transaction)?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
