use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::info;

/// 记录每个请求的来源地址、协议、方法和目标
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.to_string())
        .unwrap_or_else(|| "unknown".into());
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    info!(
        "{} - {:?} {} {}",
        remote,
        req.version(),
        req.method(),
        target
    );

    next.run(req).await
}
