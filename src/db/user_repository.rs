// src/db/user_repository.rs
// DOCUMENTATION: Database access for user_table
// PURPOSE: Account creation, lookups and profile mutation

use crate::errors::DbError;
use crate::models::User;
use sqlx::PgPool;

pub const USERNAME_KEY: &str = "user_table_username_key";
pub const EMAIL_KEY: &str = "user_table_email_key";

pub struct UserRepository;

impl UserRepository {
    pub async fn get_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, avatar_url FROM user_table WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, avatar_url
            FROM user_table
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DbError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, avatar_url
            FROM user_table
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    pub async fn insert(
        pool: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, DbError> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO user_table (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, avatar_url
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::warn!("Failed to create user {}: {}", username, e);
            DbError::from(e)
        })?;

        tx.commit().await?;

        log::info!("Created user: {} (id {})", user.username, user.id);
        Ok(user)
    }

    /// Rewrites username/email and, when given, the password hash
    pub async fn update_profile(
        pool: &PgPool,
        id: i32,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<Option<User>, DbError> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE user_table
            SET username = $1,
                email = $2,
                password_hash = COALESCE($3, password_hash)
            WHERE id = $4
            RETURNING id, username, email, password_hash, avatar_url
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            log::warn!("Profile update failed for user {}: {}", id, e);
            DbError::from(e)
        })?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn update_avatar(
        pool: &PgPool,
        id: i32,
        avatar_url: &str,
    ) -> Result<Option<User>, DbError> {
        let mut tx = pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE user_table
            SET avatar_url = $1
            WHERE id = $2
            RETURNING id, username, email, password_hash, avatar_url
            "#,
        )
        .bind(avatar_url)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }
}
