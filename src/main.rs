use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use snippetbox::{
    AppState,
    cache::RedisSessionStore,
    config::Config,
    database::{PgSnippetRepository, PgUserRepository},
    middleware::install_panic_hook,
    routes,
    templates::TemplateCache,
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    install_panic_hook();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 模板缓存构建失败时不启动服务
    let templates = TemplateCache::new(&config.template_dir).expect("Failed to build template cache");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'snippetbox';").await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // 设置 Redis 客户端，用于保存会话
    let redis_client =
        redis::Client::open(config.redis_url.clone()).expect("Failed to create Redis client");
    let session_store = RedisSessionStore::new(Arc::new(redis_client));

    // 设置应用状态
    let state = AppState {
        snippets: Arc::new(PgSnippetRepository::new(pool.clone())),
        users: Arc::new(PgUserRepository::new(pool)),
        templates: Arc::new(templates),
        config: Arc::new(config),
    };

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );

    let app = routes::app(state, session_store);

    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}
