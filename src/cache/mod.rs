// 缓存模块
// 进程内带过期时间的键值缓存，用于搜索结果

pub mod keys;
pub mod store;

pub use keys::search_key;
pub use store::SearchCache;
