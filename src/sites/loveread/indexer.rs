//! Loveread 索引器
//!
//! 负责解析书名、书籍 ID 与总页数

use scraper::Html;
use tracing::debug;

use crate::core::error::{ConvertError, Result};
use crate::core::model::{BookInfo, TableOfContents};
use crate::interfaces::Indexer;
use crate::utils::markup::text_of;
use crate::utils::query_number;

use super::SiteSelectors;

/// Loveread 索引器
pub struct LovereadIndexer;

impl Indexer for LovereadIndexer {
    fn parse_book_info(&self, html: &str) -> Result<BookInfo> {
        let doc = Html::parse_document(html);
        let s = SiteSelectors::get();

        let link = doc
            .select(&s.global_view_link)
            .next()
            .ok_or_else(|| ConvertError::parse("Title heading with `view_global.php` link not found"))?;

        let title = text_of(&link).trim().to_string();
        let href = link.value().attr("href").unwrap_or_default();
        let id = query_number::<u64>(href, "id")?;

        let navigation = doc
            .select(&s.navigation)
            .next()
            .ok_or_else(|| ConvertError::parse("Pagination region `div.navigation` not found"))?;

        let last_page_num = navigation
            .select(&s.page_link)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| match query_number::<u32>(href, "p") {
                Ok(page) => Some(page),
                Err(e) => {
                    debug!("跳过无页码的分页链接: {}", e);
                    None
                }
            })
            .max()
            .unwrap_or(1)
            .max(1);

        Ok(BookInfo {
            title,
            id,
            last_page_num,
            table_of_contents: TableOfContents::flat(last_page_num),
        })
    }
}
