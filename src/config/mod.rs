use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub static_dir: String,
    pub cache_ttl_secs: u64,
    pub cache_sweep_secs: u64,
    pub rate_limit_cooldown_ms: u64,
    /// 清理已恢复配额的限流记录的周期
    pub rate_limit_sweep_secs: u64,
    /// 是否信任 X-Real-IP / X-Forwarded-For，仅在可信反向代理之后开启
    pub trust_proxy_headers: bool,
    /// 启动时预热缓存的搜索词
    pub cache_warm_queries: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".into(),
            server_port: 8080,
            database_url: "sqlite://excuses.db".into(),
            static_dir: "./static".into(),
            cache_ttl_secs: 300,
            cache_sweep_secs: 600,
            rate_limit_cooldown_ms: 1000,
            rate_limit_sweep_secs: 60,
            trust_proxy_headers: true,
            cache_warm_queries: vec!["party".into()],
        }
    }
}

// 读取环境变量，缺失或无法解析时使用默认值
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        let cache_warm_queries = match env::var("CACHE_WARM_QUERIES") {
            Ok(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(String::from)
                .collect(),
            Err(_) => defaults.cache_warm_queries,
        };

        Config {
            server_host: env_or("SERVER_HOST", defaults.server_host),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            database_url: env_or("DATABASE_URL", defaults.database_url),
            static_dir: env_or("STATIC_DIR", defaults.static_dir),
            cache_ttl_secs: env_or("CACHE_TTL_SECS", defaults.cache_ttl_secs),
            cache_sweep_secs: env_or("CACHE_SWEEP_SECS", defaults.cache_sweep_secs),
            rate_limit_cooldown_ms: env_or("RATE_LIMIT_COOLDOWN_MS", defaults.rate_limit_cooldown_ms),
            rate_limit_sweep_secs: env_or("RATE_LIMIT_SWEEP_SECS", defaults.rate_limit_sweep_secs),
            trust_proxy_headers: env_or("TRUST_PROXY_HEADERS", defaults.trust_proxy_headers),
            cache_warm_queries,
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_secs)
    }

    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_millis(self.rate_limit_cooldown_ms)
    }

    pub fn rate_limit_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations() {
        let config = Config::default();
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.cache_sweep_interval(), Duration::from_secs(600));
        assert_eq!(config.rate_limit_cooldown(), Duration::from_secs(1));
        assert_eq!(config.rate_limit_sweep_interval(), Duration::from_secs(60));
        assert!(config.trust_proxy_headers);
    }
}
