use rand::Rng;
use serde::Serialize;

use crate::{
    cache::{SearchCache, search_key},
    database::ExcuseStore,
    error::{AppError, MAX_CATEGORY_LEN},
    utils::{parse_page, sanitize},
};

pub const DEFAULT_CATEGORY: &str = "party";
pub const PAGE_SIZE: i64 = 10;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub excuse: String,
}

/// 借口生成器：从三组固定词表中各随机取一个词
pub struct ExcuseGenerator;

impl ExcuseGenerator {
    pub const SUBJECTS: [&'static str; 4] = ["cat", "dog", "bird", "fish"];
    pub const ACTIONS: [&'static str; 4] = ["ate", "hid", "broke", "stole"];
    pub const OBJECTS: [&'static str; 4] = ["shoes", "phone", "car keys", "homework"];

    pub fn compose<R: Rng + ?Sized>(rng: &mut R) -> String {
        let subject = Self::SUBJECTS[rng.random_range(0..Self::SUBJECTS.len())];
        let action = Self::ACTIONS[rng.random_range(0..Self::ACTIONS.len())];
        let object = Self::OBJECTS[rng.random_range(0..Self::OBJECTS.len())];
        format!("My {} {} my {}!", subject, action, object)
    }

    /// 使用线程本地随机源（进程内只从系统熵播种一次）
    pub fn random() -> String {
        Self::compose(&mut rand::rng())
    }
}

/// 生成借口并写入数据库，返回生成的文本
pub async fn generate(store: &ExcuseStore, category: Option<&str>) -> Result<String, AppError> {
    let raw = category.unwrap_or_default();
    if raw.chars().count() > MAX_CATEGORY_LEN {
        return Err(AppError::CategoryTooLong);
    }

    let category = match sanitize(raw) {
        c if c.is_empty() => DEFAULT_CATEGORY.to_string(),
        c => c,
    };

    let excuse = ExcuseGenerator::random();
    let id = store
        .insert(&excuse, Some(&category))
        .await
        .map_err(AppError::SaveFailed)?;

    tracing::debug!("Stored excuse {} in category {:?}", id, category);
    Ok(excuse)
}

/// 分页搜索；同一查询和页码在缓存有效期内直接返回缓存结果
pub async fn search(
    store: &ExcuseStore,
    cache: &SearchCache,
    query: Option<&str>,
    page: Option<&str>,
) -> Result<Vec<String>, AppError> {
    let query = sanitize(query.unwrap_or_default());
    if query.is_empty() {
        return Err(AppError::NoQuery);
    }

    let page = parse_page(page);
    let key = search_key(&query, page);

    if let Some(cached) = cache.get(&key) {
        tracing::debug!("Search cache hit: {}", key);
        return Ok(cached);
    }

    let offset = (i64::from(page) - 1) * PAGE_SIZE;
    let results = store
        .search_by_text(&query, PAGE_SIZE, offset)
        .await
        .map_err(AppError::SearchFailed)?;

    tracing::debug!("Search cache miss: {}, {} rows", key, results.len());
    cache.set(key, results.clone());
    Ok(results)
}

/// 预热缓存：每个查询词的第一页
pub async fn warm_search_cache(
    store: &ExcuseStore,
    cache: &SearchCache,
    queries: &[String],
) -> Result<usize, AppError> {
    let mut warmed = 0;
    for query in queries {
        let results = search(store, cache, Some(query), None).await?;
        tracing::info!("Warmed search cache for {:?} ({} results)", query, results.len());
        warmed += 1;
    }
    Ok(warmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn create_test_store() -> (ExcuseStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("excuses.db").display());
        (ExcuseStore::connect(&url).await.unwrap(), dir)
    }

    fn is_template_sentence(text: &str) -> bool {
        ExcuseGenerator::SUBJECTS.iter().any(|s| {
            ExcuseGenerator::ACTIONS.iter().any(|a| {
                ExcuseGenerator::OBJECTS
                    .iter()
                    .any(|o| text == format!("My {} {} my {}!", s, a, o))
            })
        })
    }

    #[test]
    fn compose_follows_template() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert!(is_template_sentence(&ExcuseGenerator::compose(&mut rng)));
        }
    }

    #[test]
    fn compose_covers_every_subject() {
        let mut rng = StdRng::seed_from_u64(42);
        let texts: Vec<String> = (0..400).map(|_| ExcuseGenerator::compose(&mut rng)).collect();
        for subject in ExcuseGenerator::SUBJECTS {
            let prefix = format!("My {} ", subject);
            assert!(texts.iter().any(|t| t.starts_with(&prefix)));
        }
    }

    #[tokio::test]
    async fn generate_defaults_category() {
        let (store, _dir) = create_test_store().await;
        let excuse = generate(&store, None).await.unwrap();
        assert!(is_template_sentence(&excuse));

        let row = store.find_by_id(4).await.unwrap().unwrap();
        assert_eq!(row.excuse_text, excuse);
        assert_eq!(row.category.as_deref(), Some(DEFAULT_CATEGORY));
    }

    #[tokio::test]
    async fn generate_sanitizes_category() {
        let (store, _dir) = create_test_store().await;
        generate(&store, Some("  <wedding>  ")).await.unwrap();
        let row = store.find_by_id(4).await.unwrap().unwrap();
        assert_eq!(row.category.as_deref(), Some("&lt;wedding&gt;"));
    }

    #[tokio::test]
    async fn generate_rejects_long_category_without_insert() {
        let (store, _dir) = create_test_store().await;
        let long = "a".repeat(51);
        let err = generate(&store, Some(&long)).await.unwrap_err();
        assert!(matches!(err, AppError::CategoryTooLong));
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn search_requires_query() {
        let (store, _dir) = create_test_store().await;
        let cache = SearchCache::new(Duration::from_secs(60));
        assert!(matches!(
            search(&store, &cache, None, None).await,
            Err(AppError::NoQuery)
        ));
        assert!(matches!(
            search(&store, &cache, Some(""), None).await,
            Err(AppError::NoQuery)
        ));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn search_results_are_cached_per_page() {
        let (store, _dir) = create_test_store().await;
        let cache = SearchCache::new(Duration::from_secs(60));

        let first = search(&store, &cache, Some("cat"), Some("x")).await.unwrap();
        assert_eq!(first, vec!["My cat ate my homework".to_string()]);
        assert_eq!(cache.get("search_cat_page_1"), Some(first.clone()));

        store.insert("My cat hid my phone!", Some("party")).await.unwrap();
        let again = search(&store, &cache, Some("cat"), Some("1")).await.unwrap();
        assert_eq!(again, first);
    }

    #[tokio::test]
    async fn warm_up_populates_first_page() {
        let (store, _dir) = create_test_store().await;
        let cache = SearchCache::new(Duration::from_secs(60));
        let warmed = warm_search_cache(&store, &cache, &["party".to_string()])
            .await
            .unwrap();
        assert_eq!(warmed, 1);
        assert!(cache.get(&search_key("party", 1)).is_some());
    }
}
