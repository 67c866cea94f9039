//! Loveread 正文提取器
//!
//! 正文即全部 `p.MsoNormal` 段落，按文档顺序拼接，不做结构调整。

use scraper::Html;

use crate::core::error::Result;
use crate::interfaces::ContentExtractor;
use crate::utils::markup::serialize;

use super::SiteSelectors;

pub struct LovereadExtractor;

impl ContentExtractor for LovereadExtractor {
    fn extract_page_content(&self, html: &str) -> Result<String> {
        let doc = Html::parse_document(html);
        let s = SiteSelectors::get();

        Ok(doc.select(&s.paragraph).map(serialize).collect())
    }
}
