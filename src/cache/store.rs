use std::time::Duration;

use moka::sync::Cache;
use tokio::task::JoinHandle;

/// 搜索结果缓存：键为 search_key，值为按顺序排列的借口文本
///
/// 条目写入后固定时间过期，过期条目读取时不可见，并由
/// [`SearchCache::spawn_sweeper`] 周期性回收。没有容量上限。
#[derive(Clone, Debug)]
pub struct SearchCache {
    results: Cache<String, Vec<String>>,
}

impl SearchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            results: Cache::builder().time_to_live(ttl).build(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        self.results.get(key)
    }

    /// 以默认过期时间写入，覆盖已有条目
    pub fn set(&self, key: impl Into<String>, results: Vec<String>) {
        self.results.insert(key.into(), results);
    }

    /// 当前条目数（包含尚未回收的过期条目）
    pub fn entry_count(&self) -> u64 {
        self.results.run_pending_tasks();
        self.results.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// 启动后台清理任务，按 interval 周期回收过期条目
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let results = self.results.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            // 第一次 tick 立即返回
            ticker.tick().await;
            loop {
                ticker.tick().await;
                results.run_pending_tasks();
                tracing::trace!("Search cache swept, {} entries", results.entry_count());
            }
        })
    }
}
