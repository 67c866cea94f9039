//! 站点定义
//!
//! 定义了站点方言需要实现的核心接口：索引器 (书籍信息) 与正文提取器。

use crate::core::error::Result;
use crate::core::model::BookInfo;

/// 索引器 Trait - 负责从首页解析书籍元数据、页数与目录
pub trait Indexer: Send + Sync {
    fn parse_book_info(&self, html: &str) -> Result<BookInfo>;
}

/// 正文提取器 Trait - 负责将单页 HTML 清洗为正文片段
pub trait ContentExtractor: Send + Sync {
    fn extract_page_content(&self, html: &str) -> Result<String>;
}

/// 站点定义 Trait
///
/// 每个方言实现此 Trait，提供索引器和正文提取器。
pub trait Site: Send + Sync {
    fn indexer(&self) -> &dyn Indexer;

    fn extractor(&self) -> &dyn ContentExtractor;
}
