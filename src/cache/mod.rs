// 缓存模块
// 基于 Redis 的会话存储

pub mod session;

pub use session::RedisSessionStore;
