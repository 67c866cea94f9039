//! 站点方言注册
//!
//! 方言在入口处由用户 URL 一次性判定，此后作为显式参数贯穿各组件。

use strum::{AsRefStr, Display};

use crate::core::error::Result;
use crate::core::model::BookInfo;
use crate::interfaces::Site;

pub mod kbk;
pub mod loveread;

static LOVEREAD: loveread::Loveread = loveread::Loveread::new();
static KBK: kbk::Kbk = kbk::Kbk::new();

/// 站点方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Dialect {
    /// 分页参数 `p`，整本书无章节结构
    Loveread,
    /// 分页参数 `part`，首页带有目录
    Kbk,
}

impl Dialect {
    /// 根据 URL 中的站点标记判定方言，未识别的一律按 Kbk 处理
    pub fn detect(url: &str) -> Self {
        if url.contains("loveread") {
            Dialect::Loveread
        } else {
            Dialect::Kbk
        }
    }

    /// 分页查询参数名
    pub fn page_param(self) -> &'static str {
        match self {
            Dialect::Loveread => "p",
            Dialect::Kbk => "part",
        }
    }

    pub fn site(self) -> &'static dyn Site {
        match self {
            Dialect::Loveread => &LOVEREAD,
            Dialect::Kbk => &KBK,
        }
    }
}

pub fn parse_book_info(html: &str, dialect: Dialect) -> Result<BookInfo> {
    dialect.site().indexer().parse_book_info(html)
}

pub fn extract_page_content(html: &str, dialect: Dialect) -> Result<String> {
    dialect.site().extractor().extract_page_content(html)
}
