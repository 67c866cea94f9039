//! Kbk 站点模块
//!
//! 分页参数 `part`，首页 `div#toc` 内含有带页码链接的章节目录。

mod extractor;
mod indexer;
mod selectors;

use crate::interfaces::{ContentExtractor, Indexer, Site};

pub use self::extractor::KbkExtractor;
pub use self::indexer::KbkIndexer;
pub use self::selectors::SiteSelectors;

/// Kbk 站点实现
pub struct Kbk {
    indexer: KbkIndexer,
    extractor: KbkExtractor,
}

impl Kbk {
    pub const fn new() -> Self {
        Self {
            indexer: KbkIndexer,
            extractor: KbkExtractor,
        }
    }
}

impl Site for Kbk {
    fn indexer(&self) -> &dyn Indexer {
        &self.indexer
    }

    fn extractor(&self) -> &dyn ContentExtractor {
        &self.extractor
    }
}
