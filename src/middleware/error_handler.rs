use axum::{
    body::{Body, to_bytes},
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{debug, error};

// 错误响应体都很短，超过上限的部分不记录
const MAX_LOGGED_BODY: usize = 4096;

pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    let status = response.status();

    if status.is_client_error() {
        debug!("{} {} -> {}", method, uri, status);
        return response;
    }

    if !status.is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(b) => b,
        Err(e) => {
            error!("{} {} -> {}, unreadable body: {}", method, uri, status, e);
            return Response::from_parts(parts, Body::empty());
        }
    };

    error!(
        "{} {} -> {}, body: {}",
        method,
        uri,
        status,
        String::from_utf8_lossy(&bytes)
    );

    // 重新构建响应体
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
