//! # User Repository
//!
//! Users, admins and sign-up.
//!
//! Sign-up writes up to three rows in one transaction: the user, the admin
//! marker (when requested) and the user's empty cart. A user without a cart
//! never becomes visible.

use sqlx::SqlitePool;
use tracing::{debug, info};

use pasar_core::metadata::Metadata;
use pasar_core::{Admin, CartAggregate, NewUser, User};

use crate::error::{DbError, DbResult};
use crate::gateway::UserGateway;

macro_rules! user_columns {
    () => {
        "id, uid, auth_uid, email, name, phone, profile_image, created_at, updated_at"
    };
}

const USER_BY_UID_SQL: &str = concat!("SELECT ", user_columns!(), " FROM users WHERE uid = ?1");
const USER_BY_AUTH_UID_SQL: &str = concat!("SELECT ", user_columns!(), " FROM users WHERE auth_uid = ?1");
const USER_BY_EMAIL_SQL: &str = concat!("SELECT ", user_columns!(), " FROM users WHERE email = ?1");

/// Repository for users and admins.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    async fn fetch_user(&self, sql: &'static str, key: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }
}

impl UserGateway for UserRepository {
    async fn create_user(&self, user: &NewUser, is_admin: bool) -> DbResult<User> {
        debug!(email = %user.email, is_admin, "Creating user");

        let empty = CartAggregate::empty().map_err(|e| DbError::Internal(e.to_string()))?;
        let user_meta = Metadata::generate();

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                uid, auth_uid, email, name, phone, profile_image,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&user_meta.uid)
        .bind(&user.auth_uid)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.profile_image)
        .bind(user_meta.created_at)
        .bind(user_meta.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.ends_with("email") => {
                DbError::duplicate("email", user.email.clone())
            }
            DbError::UniqueViolation { field, .. } if field.ends_with("auth_uid") => {
                DbError::duplicate("auth_uid", user.auth_uid.clone())
            }
            other => other,
        })?;

        let user_id = result.last_insert_rowid();

        if is_admin {
            let admin_meta = Metadata::generate();
            sqlx::query(
                r#"
                INSERT INTO admins (uid, email, user_id, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&admin_meta.uid)
            .bind(&user.email)
            .bind(user_id)
            .bind(admin_meta.created_at)
            .bind(admin_meta.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        let cart_meta = Metadata::generate();
        sqlx::query(
            r#"
            INSERT INTO carts (
                uid, quantity, total_price, total_price_value,
                total_weight, total_weight_value, user_id, version,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?9)
            "#,
        )
        .bind(&cart_meta.uid)
        .bind(empty.quantity)
        .bind(&empty.total_price)
        .bind(empty.total_price_value)
        .bind(&empty.total_weight)
        .bind(empty.total_weight_value)
        .bind(user_id)
        .bind(cart_meta.created_at)
        .bind(cart_meta.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(uid = %user_meta.uid, is_admin, "User registered");

        Ok(User {
            id: user_id,
            uid: user_meta.uid,
            auth_uid: user.auth_uid.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            phone: user.phone.clone(),
            profile_image: user.profile_image.clone(),
            created_at: user_meta.created_at,
            updated_at: user_meta.updated_at,
        })
    }

    async fn get_user_by_uid(&self, uid: &str) -> DbResult<Option<User>> {
        self.fetch_user(USER_BY_UID_SQL, uid).await
    }

    async fn get_user_by_auth_uid(&self, auth_uid: &str) -> DbResult<Option<User>> {
        self.fetch_user(USER_BY_AUTH_UID_SQL, auth_uid).await
    }

    async fn get_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        self.fetch_user(USER_BY_EMAIL_SQL, &email.trim().to_lowercase()).await
    }

    async fn get_admin_by_user_id(&self, user_id: i64) -> DbResult<Option<Admin>> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, uid, email, user_id, created_at, updated_at FROM admins WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(admin)
    }
}
