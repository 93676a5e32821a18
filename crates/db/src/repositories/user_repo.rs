//! Repository for the `users` table.
//!
//! Usernames are matched exactly; `uq_users_username` and `uq_users_email`
//! surface as 409s through the API error mapping.

use maintrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

const COLUMNS: &str = "id, username, email, password_hash, name, role, is_active, \
                       created_at, updated_at";

fn select_where(condition: &str) -> String {
    format!("SELECT {COLUMNS} FROM users WHERE {condition}")
}

pub struct UserRepo;

impl UserRepo {
    /// Insert a user whose password is already hashed.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, name, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&select_where("id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Login lookup. Inactive users are returned so the caller can refuse
    /// them with a distinct error.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&select_where("username = $1"))
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Every user, alphabetical by username.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY username");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Partial update; `None` fields are left untouched. Returns `None` when
    /// no such user exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                name = COALESCE($3, name),
                role = COALESCE($4, role),
                is_active = COALESCE($5, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(input.email.as_deref())
            .bind(input.name.as_deref())
            .bind(input.role.as_deref())
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Returns `false` when no such user exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
