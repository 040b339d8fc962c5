#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, header},
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use snippetbox::{
    AppState,
    config::Config,
    database::{LATEST_LIMIT, SnippetRepository, UserRepository},
    models::{ModelError, Snippet},
    routes,
    templates::TemplateCache,
};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

/// 测试用的低成本哈希
const TEST_COST: u32 = 4;

#[derive(Default)]
pub struct MemorySnippets {
    rows: Mutex<Vec<Snippet>>,
    fail_inserts: AtomicBool,
}

impl MemorySnippets {
    /// 之后的插入都返回数据库错误
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn insert_with_expiry(&self, title: &str, content: &str, expires: DateTime<Utc>) -> i32 {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i32 + 1;
        rows.push(Snippet {
            id,
            title: title.into(),
            content: content.into(),
            created: Utc::now(),
            expires,
        });
        id
    }

    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SnippetRepository for MemorySnippets {
    async fn insert(&self, title: &str, content: &str, expires: i64) -> Result<i32, ModelError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(ModelError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.insert_with_expiry(title, content, Utc::now() + Duration::days(expires)))
    }

    async fn get(&self, id: i32) -> Result<Snippet, ModelError> {
        let now = Utc::now();
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id && !s.is_expired_at(now))
            .cloned()
            .ok_or(ModelError::NoRecord)
    }

    async fn latest(&self) -> Result<Vec<Snippet>, ModelError> {
        let now = Utc::now();
        let mut rows: Vec<Snippet> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| !s.is_expired_at(now))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(LATEST_LIMIT as usize);
        Ok(rows)
    }
}

struct StoredUser {
    id: i32,
    email: String,
    hashed_password: String,
}

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<StoredUser>>,
}

impl MemoryUsers {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn remove_all(&self) {
        self.rows.lock().unwrap().clear();
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn insert(&self, _name: &str, email: &str, password: &str) -> Result<(), ModelError> {
        let hashed_password = bcrypt::hash(password, TEST_COST)?;
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|u| u.email == email) {
            return Err(ModelError::DuplicateEmail);
        }
        let id = rows.len() as i32 + 1;
        rows.push(StoredUser {
            id,
            email: email.into(),
            hashed_password,
        });
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<i32, ModelError> {
        let found = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .map(|u| (u.id, u.hashed_password.clone()));

        let Some((id, hashed_password)) = found else {
            return Err(ModelError::InvalidCredentials);
        };

        if bcrypt::verify(password, &hashed_password)? {
            Ok(id)
        } else {
            Err(ModelError::InvalidCredentials)
        }
    }

    async fn exists(&self, id: i32) -> Result<bool, ModelError> {
        Ok(self.rows.lock().unwrap().iter().any(|u| u.id == id))
    }
}

pub fn manifest_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

pub fn test_config(template_dir: PathBuf) -> Config {
    Config {
        database_url: String::new(),
        redis_url: String::new(),
        server_host: "127.0.0.1".into(),
        server_port: 0,
        database_max_connections: 1,
        template_dir,
        static_dir: manifest_path("ui/static"),
        session_lifetime_secs: 12 * 3600,
        session_cookie_secure: false,
    }
}

pub struct TestApp {
    pub state: AppState,
    pub snippets: Arc<MemorySnippets>,
    pub users: Arc<MemoryUsers>,
    pub store: MemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_templates(&manifest_path("ui/html"))
    }

    pub fn with_templates(dir: &Path) -> Self {
        let snippets = Arc::new(MemorySnippets::default());
        let users = Arc::new(MemoryUsers::default());
        let state = AppState {
            snippets: snippets.clone(),
            users: users.clone(),
            templates: Arc::new(TemplateCache::new(dir).unwrap()),
            config: Arc::new(test_config(dir.to_path_buf())),
        };

        Self {
            state,
            snippets,
            users,
            store: MemoryStore::default(),
        }
    }

    pub fn router(&self) -> Router {
        routes::app(self.state.clone(), self.store.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_owned())).unwrap())
            .await
    }

    /// 注册并登录，返回会话 cookie
    pub async fn signed_in(&self, email: &str, password: &str) -> String {
        self.users.insert("Test User", email, password).await.unwrap();

        let body = format!("email={}&password={}", encode(email), encode(password));
        let response = self.post_form("/user/login", &body, None).await;
        assert_eq!(response.status(), 303);
        session_cookie(&response).expect("login sets a session cookie")
    }
}

/// 取出 Set-Cookie 中的 `name=value` 部分
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .map(str::to_owned)
        .last()
}

pub fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// 简单的表单值编码，测试数据只含这几类特殊字符
pub fn encode(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('@', "%40")
        .replace('$', "%24")
        .replace('&', "%26")
        .replace('+', "%2B")
        .replace(' ', "+")
        .replace('\\', "%5C")
}
