use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};

use cache::SearchCache;
use config::Config;
use database::ExcuseStore;
use middleware::{RateLimiter, log_errors, rate_limit};

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub store: ExcuseStore,
    pub cache: SearchCache,
    pub config: Config,
}

/// 组装全部路由；限流在最外层，被拒绝的请求不会进入任何处理器
pub fn build_router(state: AppState, limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        .route("/", get(routes::home::home_page))
        .route("/api/generate", get(routes::excuse::generate_excuse))
        .route("/api/search", get(routes::excuse::search_excuses))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(CatchPanicLayer::new())
        .layer(axum::middleware::from_fn(log_errors))
        .layer(axum::middleware::from_fn_with_state(limiter, rate_limit))
        .with_state(state)
}
