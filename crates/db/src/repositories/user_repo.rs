//! Repository for the `stream_users` table.

use sqlx::PgPool;
use studio_core::types::DbId;

use crate::models::user::StreamUser;

/// Column list for `stream_users` queries.
const COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> Result<StreamUser, sqlx::Error> {
        let query = format!(
            "INSERT INTO stream_users (username, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StreamUser>(&query)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<StreamUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stream_users WHERE username = $1");
        sqlx::query_as::<_, StreamUser>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<StreamUser>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stream_users WHERE id = $1");
        sqlx::query_as::<_, StreamUser>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
