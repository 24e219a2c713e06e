/// 搜索缓存键前缀
const SEARCH_PREFIX: &str = "search_";

/// 生成搜索结果缓存键，query 应为已清洗的查询词
pub fn search_key(query: &str, page: u32) -> String {
    format!("{}{}_page_{}", SEARCH_PREFIX, query, page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_includes_query_and_page() {
        assert_eq!(search_key("cat", 1), "search_cat_page_1");
        assert_ne!(search_key("cat", 1), search_key("cat", 2));
    }
}
