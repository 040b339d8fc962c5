// 数据库模块
// 仓储接口与 Postgres 实现

pub mod repositories;

use async_trait::async_trait;

use crate::models::{ModelError, Snippet};

pub use repositories::snippet::PgSnippetRepository;
pub use repositories::user::PgUserRepository;

/// 片段仓储
///
/// 过期片段对调用方来说等同于不存在：`get` 对两种情况都返回
/// [`ModelError::NoRecord`]。
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// 插入片段并返回新 ID，`expires` 为有效天数，调用前已完成校验
    async fn insert(&self, title: &str, content: &str, expires: i64) -> Result<i32, ModelError>;

    async fn get(&self, id: i32) -> Result<Snippet, ModelError>;

    /// 最近的未过期片段，按 ID 倒序，最多 10 条
    async fn latest(&self) -> Result<Vec<Snippet>, ModelError>;
}

/// 用户仓储
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户，密码在持久化前哈希；邮箱重复返回 [`ModelError::DuplicateEmail`]
    async fn insert(&self, name: &str, email: &str, password: &str) -> Result<(), ModelError>;

    /// 校验邮箱与密码，成功返回用户 ID
    ///
    /// 邮箱不存在与密码错误都返回 [`ModelError::InvalidCredentials`]。
    async fn authenticate(&self, email: &str, password: &str) -> Result<i32, ModelError>;

    async fn exists(&self, id: i32) -> Result<bool, ModelError>;
}

/// 最新片段列表的条数上限
pub const LATEST_LIMIT: i64 = 10;
