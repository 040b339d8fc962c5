// 领域模型
// 包含片段实体以及持久层返回的领域错误

pub mod snippet;

pub use snippet::Snippet;

/// 持久层错误
///
/// `NoRecord`、`InvalidCredentials`、`DuplicateEmail` 属于领域结果，由处理器决定
/// 对外呈现方式；其余均为服务端故障。
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("no matching record found")]
    NoRecord,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("duplicate email")]
    DuplicateEmail,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
