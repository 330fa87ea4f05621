use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::PgPool;

use super::UserStore;
use crate::models::user::User;

/// `UserStore` over the `users` table; the document is a JSONB column.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn next_user_id(&self) -> Result<i64> {
        let next: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(next)
    }

    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query("INSERT INTO users (id, username, email, document) VALUES ($1, $2, $3, $4)")
            .bind(user.id)
            .bind(user.username.as_deref())
            .bind(&user.email)
            .bind(Json(user))
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to insert user {}", user.id))?;
        Ok(())
    }

    async fn get(&self, id: i64) -> Result<Option<User>> {
        let doc: Option<Json<User>> =
            sqlx::query_scalar("SELECT document FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|Json(user)| user))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let doc: Option<Json<User>> =
            sqlx::query_scalar("SELECT document FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|Json(user)| user))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let doc: Option<Json<User>> =
            sqlx::query_scalar("SELECT document FROM users WHERE email = $1 ORDER BY id LIMIT 1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(doc.map(|Json(user)| user))
    }

    async fn save(&self, user: &User) -> Result<()> {
        sqlx::query("UPDATE users SET username = $2, email = $3, document = $4 WHERE id = $1")
            .bind(user.id)
            .bind(user.username.as_deref())
            .bind(&user.email)
            .bind(Json(user))
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to save user {}", user.id))?;
        Ok(())
    }

    async fn replace_fields(&self, id: i64, fields: Map<String, Value>) -> Result<()> {
        // jsonb `||` replaces each top-level key wholesale.
        sqlx::query("UPDATE users SET document = document || $2 WHERE id = $1")
            .bind(id)
            .bind(Json(Value::Object(fields)))
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to update fields of user {id}"))?;
        Ok(())
    }
}
