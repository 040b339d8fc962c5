use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// 允许的有效期（天）
pub const PERMITTED_LIFETIMES: [i64; 3] = [1, 7, 365];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Snippet {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub expires: DateTime<Utc>,
}

impl Snippet {
    /// 将内容中字面量的 `\n` 转换为真正的换行
    pub fn with_line_breaks(mut self) -> Self {
        self.content = self.content.replace("\\n", "\n");
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}
