use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::{LATEST_LIMIT, SnippetRepository};
use crate::models::{ModelError, Snippet};

/// 片段存储库实现
#[derive(Clone)]
pub struct PgSnippetRepository {
    pool: PgPool,
}

impl PgSnippetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnippetRepository for PgSnippetRepository {
    async fn insert(&self, title: &str, content: &str, expires: i64) -> Result<i32, ModelError> {
        let days = i32::try_from(expires)
            .map_err(|e| sqlx::Error::Protocol(format!("invalid lifetime {expires}: {e}")))?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO snippets (title, content, created, expires)
            VALUES ($1, $2, NOW(), NOW() + make_interval(days => $3))
            RETURNING id
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(days)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created snippet: {}", id);
        Ok(id)
    }

    async fn get(&self, id: i32) -> Result<Snippet, ModelError> {
        sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > NOW() AND id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ModelError::NoRecord)
    }

    async fn latest(&self) -> Result<Vec<Snippet>, ModelError> {
        let snippets = sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, title, content, created, expires
            FROM snippets
            WHERE expires > NOW()
            ORDER BY id DESC
            LIMIT $1
            "#,
        )
        .bind(LATEST_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(snippets)
    }
}
