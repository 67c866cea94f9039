//! Loveread 站点模块
//!
//! 单页阅读器，分页参数 `p`，无可解析的章节结构。

mod extractor;
mod indexer;
mod selectors;

use crate::interfaces::{ContentExtractor, Indexer, Site};

pub use self::extractor::LovereadExtractor;
pub use self::indexer::LovereadIndexer;
pub use self::selectors::SiteSelectors;

/// Loveread 站点实现
pub struct Loveread {
    indexer: LovereadIndexer,
    extractor: LovereadExtractor,
}

impl Loveread {
    pub const fn new() -> Self {
        Self {
            indexer: LovereadIndexer,
            extractor: LovereadExtractor,
        }
    }
}

impl Site for Loveread {
    fn indexer(&self) -> &dyn Indexer {
        &self.indexer
    }

    fn extractor(&self) -> &dyn ContentExtractor {
        &self.extractor
    }
}
