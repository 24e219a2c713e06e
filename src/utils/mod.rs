/// 去除首尾空白并转义 HTML 特殊字符
pub fn sanitize(input: &str) -> String {
    escape_html(input.trim())
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 解析页码，非法或小于 1 时返回 1
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .map(|p| p.min(u32::MAX as i64) as u32)
        .unwrap_or(1)
}

/// 取查询参数中某个键的第一个值，重复出现的键只认第一个
pub fn first_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_trims_and_escapes() {
        assert_eq!(sanitize("  cat  "), "cat");
        assert_eq!(
            sanitize(" <b>\"Tom\" & 'Jerry'</b> "),
            "&lt;b&gt;&#34;Tom&#34; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn page_normalization() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-4")), 1);
        assert_eq!(parse_page(Some("3")), 3);
    }

    #[test]
    fn first_param_ignores_repeats() {
        let params = vec![
            ("q".to_string(), "cat".to_string()),
            ("page".to_string(), "2".to_string()),
            ("page".to_string(), "5".to_string()),
        ];
        assert_eq!(first_param(&params, "page"), Some("2"));
        assert_eq!(first_param(&params, "q"), Some("cat"));
        assert_eq!(first_param(&params, "category"), None);
    }
}
