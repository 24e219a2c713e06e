use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use excuses::{
    AppState, build_router,
    cache::SearchCache,
    config::Config,
    database::ExcuseStore,
    middleware::RateLimiter,
    routes::excuse::warm_search_cache,
};
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

    // 加载配置
    let config = Config::from_env();

    // 打开数据库，建表和示例数据失败都直接退出
    let store = ExcuseStore::connect(&config.database_url)
        .await
        .expect("Failed to initialize excuse store");

    // 搜索缓存及后台清理
    let cache = SearchCache::new(config.cache_ttl());
    let cache_sweeper = cache.spawn_sweeper(config.cache_sweep_interval());
    if let Err(e) = warm_search_cache(&store, &cache, &config.cache_warm_queries).await {
        tracing::warn!("Cache warm-up failed: {}", e);
    }

    // 设置限流器
    let rate_limiter = Arc::new(RateLimiter::from_config(&config));
    let limiter_sweeper = rate_limiter.spawn_sweeper();

    let state = AppState {
        store: store.clone(),
        cache,
        config: config.clone(),
    };

    let router = build_router(state, rate_limiter);

    // 根据编译模式决定是否添加CORS
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    cache_sweeper.abort();
    limiter_sweeper.abort();
    store.close().await;
    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
