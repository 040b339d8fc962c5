use std::backtrace::Backtrace;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::forms::FormError;
use crate::models::ModelError;
use crate::templates::TemplateError;

/// 处理器统一返回的错误
///
/// 客户端错误只返回状态码与标准说明；服务端错误在转换处记录堆栈，响应中不暴露任何细节。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("client error: {0}")]
    Client(StatusCode),
    #[error("server error: {0}")]
    Server(ServerError),
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ServerError {
    message: String,
    trace: String,
}

impl ServerError {
    pub fn new(err: impl std::fmt::Display) -> Self {
        Self {
            message: err.to_string(),
            trace: Backtrace::force_capture().to_string(),
        }
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }
}

impl AppError {
    pub fn server(err: impl std::fmt::Display) -> Self {
        AppError::Server(ServerError::new(err))
    }

    pub fn not_found() -> Self {
        AppError::Client(StatusCode::NOT_FOUND)
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::server(err)
    }
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::server(err)
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AppError::server(err)
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::Malformed { .. } => AppError::Client(StatusCode::BAD_REQUEST),
            FormError::InvalidTarget(_) => AppError::server(err),
        }
    }
}

/// 以纯文本返回状态码对应的标准说明
pub fn status_response(status: StatusCode) -> Response {
    let reason = status.canonical_reason().unwrap_or("Unknown Error");
    (status, reason.to_string()).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Client(status) => status_response(status),
            AppError::Server(err) => {
                tracing::error!("{}\n{}", err, err.trace());
                status_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn client_error_renders_reason_phrase() {
        let response = AppError::not_found().into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Not Found");
    }

    #[tokio::test]
    async fn server_error_hides_details() {
        let response = AppError::from(ModelError::Database(sqlx::Error::PoolTimedOut)).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert_eq!(body, "Internal Server Error");
    }

    #[test]
    fn malformed_form_is_a_bad_request() {
        let err = AppError::from(FormError::Malformed {
            field: "expires",
            value: "soon".into(),
        });

        assert!(matches!(err, AppError::Client(StatusCode::BAD_REQUEST)));
    }

    #[test]
    fn invalid_decode_target_is_a_defect() {
        let err = AppError::from(FormError::InvalidTarget("no fields".into()));

        assert!(matches!(err, AppError::Server(_)));
    }

    #[test]
    fn server_error_captures_a_trace() {
        let err = ServerError::new("boom");

        assert_eq!(err.to_string(), "boom");
        assert!(!err.trace().is_empty());
    }
}
