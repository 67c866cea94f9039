//! 分页 URL 改写与链接参数提取

use indexmap::IndexMap;
use url::Url;

use crate::core::error::{ConvertError, Result};
use crate::sites::Dialect;

/// 目录链接中的书籍标识参数
const BOOK_ID_KEY: &str = "mb";
/// 目录链接中的页码参数
const PAGE_NUM_KEY: &str = "part";

/// 将用户 URL 改写为指定页码的 URL
///
/// `scheme://host/path` 部分原样保留，fragment 被丢弃；查询参数保持首次出现的
/// 顺序 (重复键只保留第一个值)，仅覆盖或追加方言对应的页码参数。
pub fn resolve_page_url(base_url: &str, dialect: Dialect, page_num: u32) -> Result<String> {
    let parsed = Url::parse(base_url).map_err(|e| ConvertError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if !parsed.has_host() {
        return Err(ConvertError::InvalidUrl {
            url: base_url.to_string(),
            reason: "missing host".into(),
        });
    }

    let without_fragment = base_url.split('#').next().unwrap_or(base_url);
    let (prefix, query) = match without_fragment.split_once('?') {
        Some((prefix, query)) => (prefix, query),
        None => (without_fragment, ""),
    };

    let mut params = decode_query(query).map_err(|reason| ConvertError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    })?;
    params.insert(dialect.page_param().to_string(), page_num.to_string());

    let pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let query = serde_urlencoded::to_string(pairs).map_err(|e| ConvertError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;

    Ok(format!("{}?{}", prefix, query))
}

/// 从目录/导航链接中提取 (书籍 ID, 页码)
///
/// 链接可以是绝对地址，也可以是仅包含查询串的相对地址。
pub fn extract_book_and_page_ids(href: &str) -> Result<(u64, u32)> {
    let params = query_params(href)?;

    let book_id = numeric_param(&params, BOOK_ID_KEY, href)?;
    let page_num = numeric_param(&params, PAGE_NUM_KEY, href)?;

    Ok((book_id, page_num))
}

/// 读取单个数字查询参数
pub fn query_number<T: std::str::FromStr>(href: &str, key: &str) -> Result<T> {
    let params = query_params(href)?;
    numeric_param(&params, key, href)
}

fn query_params(href: &str) -> Result<IndexMap<String, String>> {
    let without_fragment = href.split('#').next().unwrap_or(href);
    let query = without_fragment
        .split_once('?')
        .map(|(_, q)| q)
        .ok_or_else(|| ConvertError::malformed(href, "no query string"))?;

    decode_query(query).map_err(|reason| ConvertError::malformed(href, reason))
}

fn numeric_param<T: std::str::FromStr>(
    params: &IndexMap<String, String>,
    key: &str,
    href: &str,
) -> Result<T> {
    let raw = params
        .get(key)
        .ok_or_else(|| ConvertError::malformed(href, format!("missing `{}`", key)))?;

    raw.trim()
        .parse()
        .map_err(|_| ConvertError::malformed(href, format!("`{}={}` is not a number", key, raw)))
}

/// 解码查询串，重复键保留首个值及其位置
fn decode_query(query: &str) -> std::result::Result<IndexMap<String, String>, String> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(query).map_err(|e| e.to_string())?;

    let mut params = IndexMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        params.entry(key).or_insert(value);
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_part_for_kbk() {
        let url = resolve_page_url("http://siteA/read.php?mb=5&part=3", Dialect::Kbk, 7).unwrap();
        assert_eq!(url, "http://siteA/read.php?mb=5&part=7");
    }

    #[test]
    fn rewrites_p_for_loveread() {
        let url = resolve_page_url(
            "http://loveread.ec/read_book.php?id=12345&p=1",
            Dialect::Loveread,
            42,
        )
        .unwrap();
        assert_eq!(url, "http://loveread.ec/read_book.php?id=12345&p=42");
    }

    #[test]
    fn appends_missing_page_param() {
        let url = resolve_page_url("https://kbk.example/book.php?mb=9", Dialect::Kbk, 2).unwrap();
        assert_eq!(url, "https://kbk.example/book.php?mb=9&part=2");

        let url = resolve_page_url("https://kbk.example/book.php", Dialect::Kbk, 2).unwrap();
        assert_eq!(url, "https://kbk.example/book.php?part=2");
    }

    #[test]
    fn preserves_unrelated_params_and_order() {
        let base = "https://kbk.example/read.php?z=1&part=3&a=hello&m=2";
        let url = resolve_page_url(base, Dialect::Kbk, 11).unwrap();
        assert_eq!(url, "https://kbk.example/read.php?z=1&part=11&a=hello&m=2");
    }

    #[test]
    fn duplicate_keys_keep_first_value() {
        let url = resolve_page_url("http://h/r.php?a=1&a=2&part=5", Dialect::Kbk, 6).unwrap();
        assert_eq!(url, "http://h/r.php?a=1&part=6");
    }

    #[test]
    fn drops_fragment() {
        let url = resolve_page_url("http://h/r.php?mb=1&part=1#top", Dialect::Kbk, 3).unwrap();
        assert_eq!(url, "http://h/r.php?mb=1&part=3");
    }

    #[test]
    fn resolve_is_idempotent() {
        let base = "http://loveread.ec/read_book.php?id=7&p=3&x=y";
        let first = resolve_page_url(base, Dialect::Loveread, 9).unwrap();
        let second = resolve_page_url(base, Dialect::Loveread, 9).unwrap();
        assert_eq!(first, second);
        assert_eq!(resolve_page_url(&first, Dialect::Loveread, 9).unwrap(), first);
    }

    #[test]
    fn rejects_url_without_scheme() {
        let err = resolve_page_url("kbk.example/read.php?part=1", Dialect::Kbk, 2).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidUrl { .. }));
    }

    #[test]
    fn extracts_ids_from_relative_and_absolute_links() {
        assert_eq!(extract_book_and_page_ids("?mb=12&part=4").unwrap(), (12, 4));
        assert_eq!(
            extract_book_and_page_ids("http://kbk.example/read.php?part=8&mb=3#x").unwrap(),
            (3, 8)
        );
    }

    #[test]
    fn missing_or_non_numeric_ids_are_malformed() {
        for href in ["?mb=12", "?part=2", "/read.php", "?mb=abc&part=1", "?mb=1&part="] {
            let err = extract_book_and_page_ids(href).unwrap_err();
            assert!(
                matches!(err, ConvertError::MalformedLink { .. }),
                "{} should be malformed",
                href
            );
        }
    }

    #[test]
    fn query_number_reads_single_param() {
        assert_eq!(query_number::<u64>("view_global.php?id=4821", "id").unwrap(), 4821);
        assert!(query_number::<u32>("read_book.php?id=1", "p").is_err());
    }
}
