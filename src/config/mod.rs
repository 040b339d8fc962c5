use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub database_max_connections: u32,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub session_lifetime_secs: u64,
    pub session_cookie_secure: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源构建配置，便于测试
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        // 会话有效期以小时计，允许 "12h" 这样的写法
        let session_lifetime_hours = lookup("SESSION_LIFETIME")
            .and_then(|v| v.trim_end_matches('h').parse::<u64>().ok())
            .unwrap_or(12);

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            server_port: lookup("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(4000),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            template_dir: lookup("TEMPLATE_DIR")
                .unwrap_or_else(|| "./ui/html".into())
                .into(),
            static_dir: lookup("STATIC_DIR")
                .unwrap_or_else(|| "./ui/static".into())
                .into(),
            session_lifetime_secs: session_lifetime_hours * 3600,
            session_cookie_secure: lookup("SESSION_COOKIE_SECURE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        })
    }

    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session_lifetime_secs)
    }
}
