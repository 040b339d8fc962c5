use std::sync::Arc;

use config::Config;
use database::{SnippetRepository, UserRepository};
use templates::TemplateCache;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod session;
pub mod templates;
pub mod utils;

/// 启动时构建一次、之后只读的共享依赖
#[derive(Clone)]
pub struct AppState {
    pub snippets: Arc<dyn SnippetRepository>,
    pub users: Arc<dyn UserRepository>,
    pub templates: Arc<TemplateCache>,
    pub config: Arc<Config>,
}
