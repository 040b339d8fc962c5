use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::UserRepository;
use crate::models::ModelError;
use crate::utils::{hash_password, verify_password};

/// 邮箱唯一约束名
const EMAIL_UNIQUE_CONSTRAINT: &str = "users_uc_email";
const UNIQUE_VIOLATION: &str = "23505";

/// 用户存储库实现
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError> {
        // bcrypt 计算开销大，放到阻塞线程池中执行
        let password = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, hashed_password, created)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(hashed_password)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_email(&e) => Err(ModelError::DuplicateEmail),
            Err(e) => Err(e.into()),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<i32, ModelError> {
        let row: Option<(i32, String)> =
            sqlx::query_as("SELECT id, hashed_password FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        let Some((id, hashed_password)) = row else {
            return Err(ModelError::InvalidCredentials);
        };

        let password = password.to_owned();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &hashed_password))
                .await??;

        if matches {
            Ok(id)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: i32) -> Result<bool, ModelError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

fn is_duplicate_email(err: &sqlx::Error) -> bool {
    err.as_database_error().is_some_and(|db| {
        db.code().as_deref() == Some(UNIQUE_VIOLATION)
            && db.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
    })
}
