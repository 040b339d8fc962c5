//! 路由与中间件组装
//!
//! 中间件由外到内依次为：panic 捕获、请求日志、安全响应头、会话、登录校验（仅受保护路由）。

pub mod snippet;
pub mod user;

use axum::{
    Router,
    http::StatusCode,
    middleware::{from_fn, from_fn_with_state},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_sessions::{Session, SessionManagerLayer, SessionStore};

use crate::{
    AppState,
    error::{AppError, status_response},
    middleware::{
        fixed_lifetime, log_request, recover_panic, require_authentication, secure_headers,
    },
    session,
    templates::TemplateData,
};

/// 构建完整的应用
pub fn app<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    with_standard_middleware(routes(state, session_store))
}

/// 应用路由，不含外层通用中间件
pub fn routes<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer =
        SessionManagerLayer::new(session_store).with_secure(state.config.session_cookie_secure);

    // 需要登录的路由
    let protected = Router::new()
        .route(
            "/snippet/create",
            get(snippet::create).post(snippet::create_post),
        )
        .route("/user/logout", post(user::logout_post))
        .route_layer(from_fn_with_state(state.clone(), require_authentication));

    let dynamic = Router::new()
        .route("/", get(snippet::home))
        .route("/snippet/view/{id}", get(snippet::view))
        .route("/user/signup", get(user::signup).post(user::signup_post))
        .route("/user/login", get(user::login).post(user::login_post))
        .merge(protected)
        .layer(from_fn_with_state(state.clone(), fixed_lifetime))
        .layer(session_layer);

    Router::new()
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .merge(dynamic)
        .with_state(state)
}

/// 未匹配的路径和方法统一返回 404，并套上外层中间件
pub fn with_standard_middleware(router: Router) -> Router {
    router
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(recover_panic))
                .layer(from_fn(log_request))
                .layer(from_fn(secure_headers)),
        )
}

pub async fn not_found() -> Response {
    status_response(StatusCode::NOT_FOUND)
}

/// 每个页面共用的视图数据，读取闪现消息会同时将其清除
pub async fn template_data<F>(session: &Session) -> Result<TemplateData<F>, AppError> {
    let flash = session::pop_flash(session).await?;
    let is_authenticated = session::is_authenticated(session).await?;

    Ok(TemplateData::new(Utc::now().year(), flash, is_authenticated))
}

/// 渲染页面；渲染完全成功后才写出状态码和内容
pub fn render<F: Serialize>(
    state: &AppState,
    status: StatusCode,
    page: &str,
    data: &TemplateData<F>,
) -> Result<Response, AppError> {
    let body = state.templates.render(page, data)?;

    Ok((status, Html(body)).into_response())
}
