use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::{AppState, error::AppError, session};

pub const LOGIN_PATH: &str = "/user/login";

/// 未登录的请求重定向到登录页；已登录的响应禁止缓存
///
/// 会话中的用户若已不存在，则清除登录标记后同样重定向。
pub async fn require_authentication(
    State(state): State<AppState>,
    session: Session,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user_id) = session::authenticated_user(&session).await? else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    if !state.users.exists(user_id).await? {
        tracing::warn!("Session references missing user {}", user_id);
        session.remove::<i32>(session::AUTH_USER_KEY).await?;
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }

    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    Ok(response)
}
