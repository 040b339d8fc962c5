use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use time::OffsetDateTime;
use tower_sessions::SessionStore;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;

/// 基于 Redis 的会话存储
///
/// 每个会话保存为 `session:{id}` 键下的 JSON 记录，键的 TTL 与记录的过期时间一致。
#[derive(Debug, Clone)]
pub struct RedisSessionStore {
    redis: Arc<RedisClient>,
}

impl RedisSessionStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    async fn connection(&self) -> session_store::Result<redis::aio::MultiplexedConnection> {
        self.redis
            .get_multiplexed_async_connection()
            .await
            .map_err(backend)
    }
}

fn session_key(id: &Id) -> String {
    format!("session:{}", id)
}

fn backend(err: redis::RedisError) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

/// 记录剩余的存活秒数，已过期返回 None
fn remaining_ttl(record: &Record) -> Option<u64> {
    let secs = (record.expiry_date - OffsetDateTime::now_utc()).whole_seconds();
    u64::try_from(secs).ok().filter(|s| *s > 0)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        let mut conn = self.connection().await?;

        // 避免新生成的 ID 与已有会话冲突
        loop {
            let exists: bool = conn.exists(session_key(&record.id)).await.map_err(backend)?;
            if !exists {
                break;
            }
            record.id = Id::default();
        }

        self.save(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let mut conn = self.connection().await?;
        let key = session_key(&record.id);

        let Some(ttl) = remaining_ttl(record) else {
            let _: () = conn.del(key).await.map_err(backend)?;
            return Ok(());
        };

        let json = serde_json::to_string(record)
            .map_err(|e| session_store::Error::Encode(e.to_string()))?;
        let _: () = conn.set_ex(key, json, ttl).await.map_err(backend)?;

        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let mut conn = self.connection().await?;

        let result: Option<String> = conn.get(session_key(session_id)).await.map_err(backend)?;

        match result {
            Some(json) => {
                let record: Record = serde_json::from_str(&json)
                    .map_err(|e| session_store::Error::Decode(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        let mut conn = self.connection().await?;

        let _: () = conn.del(session_key(session_id)).await.map_err(backend)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use time::Duration;

    use super::*;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::new(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[test]
    fn ttl_follows_record_expiry() {
        let ttl = remaining_ttl(&record(Duration::hours(12))).unwrap();
        assert!(ttl > 11 * 3600 && ttl <= 12 * 3600);
    }

    #[test]
    fn expired_record_has_no_ttl() {
        assert!(remaining_ttl(&record(Duration::seconds(-5))).is_none());
    }

    #[test]
    fn keys_are_namespaced() {
        let id = Id::default();
        assert_eq!(session_key(&id), format!("session:{id}"));
    }
}
