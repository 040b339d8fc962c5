use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use time::OffsetDateTime;
use tower_sessions::{Expiry, Session};

use crate::{AppState, error::AppError};

const DEADLINE_KEY: &str = "deadline";

/// 会话有效期从首次写入状态时开始计算，之后的请求不会延长
pub async fn fixed_lifetime(
    State(state): State<AppState>,
    session: Session,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(deadline) = session.get::<i64>(DEADLINE_KEY).await? {
        let deadline = OffsetDateTime::from_unix_timestamp(deadline).map_err(AppError::server)?;
        session.set_expiry(Some(Expiry::AtDateTime(deadline)));
        return Ok(next.run(req).await);
    }

    let response = next.run(req).await;

    if !session.is_empty().await {
        let deadline = OffsetDateTime::now_utc() + state.config.session_lifetime();
        session
            .insert(DEADLINE_KEY, deadline.unix_timestamp())
            .await?;
        session.set_expiry(Some(Expiry::AtDateTime(deadline)));
    }

    Ok(response)
}
