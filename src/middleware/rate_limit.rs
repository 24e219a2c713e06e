use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota};
use tokio::task::JoinHandle;

use crate::config::Config;

/// 按客户端地址限流：同一地址两次被接受的请求之间至少间隔 cooldown
///
/// 每个地址的配额为“每个 cooldown 一次、突发 1 次”，被拒绝的请求不消耗配额。
/// cooldown 为零时不限流。
#[derive(Clone, Debug)]
pub struct RateLimiter {
    limiter: Option<Arc<DefaultKeyedRateLimiter<String>>>,
    sweep_interval: Duration,
    trust_proxy_headers: bool,
}

impl RateLimiter {
    pub fn new(cooldown: Duration, sweep_interval: Duration) -> Self {
        let limiter = Quota::with_period(cooldown)
            .map(|quota| Arc::new(governor::RateLimiter::keyed(quota.allow_burst(NonZeroU32::MIN))));

        Self {
            limiter,
            sweep_interval,
            trust_proxy_headers: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rate_limit_cooldown(), config.rate_limit_sweep_interval())
            .trust_proxy_headers(config.trust_proxy_headers)
    }

    /// 是否使用 X-Real-IP / X-Forwarded-For 识别客户端
    pub fn trust_proxy_headers(mut self, trust: bool) -> Self {
        self.trust_proxy_headers = trust;
        self
    }

    /// 请求被接受时返回 true；冷却期内返回 false，不更新记录
    pub fn check(&self, client: &str) -> bool {
        match &self.limiter {
            Some(limiter) => limiter.check_key(&client.to_string()).is_ok(),
            None => true,
        }
    }

    /// 清理已恢复满配额的客户端记录，这些记录与新客户端没有区别
    pub fn sweep_stale(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.as_ref().map_or(0, |limiter| limiter.len())
    }

    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            // interval 不接受零周期
            let period = limiter.sweep_interval.max(Duration::from_secs(1));
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.sweep_stale();
                tracing::debug!(
                    "Rate limiter swept, {} clients tracked",
                    limiter.tracked_clients()
                );
            }
        })
    }

    /// 获取客户端地址：信任代理头时优先代理头，其次连接地址
    ///
    /// 代理头可被客户端任意伪造，只有部署在会覆盖这些头的可信反向代理之后
    /// 才应开启 trust_proxy_headers。
    pub fn client_ip(&self, req: &Request<Body>) -> String {
        let remote_ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string());

        let forwarded = if self.trust_proxy_headers {
            req.headers()
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .or_else(|| {
                    req.headers()
                        .get("x-forwarded-for")
                        .and_then(|h| h.to_str().ok())
                        .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
                })
        } else {
            None
        };

        forwarded
            .or(remote_ip.as_deref())
            .unwrap_or("unknown")
            .trim()
            .to_string()
    }
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = limiter.client_ip(&req);

    if !limiter.check(&ip) {
        tracing::warn!("Rate limit exceeded for {}", ip);
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    next.run(req).await
}
