//! Loveread 选择器
//!
//! 预编译的 CSS 选择器

use std::sync::OnceLock;

use scraper::Selector;

/// 站点选择器集合
pub struct SiteSelectors {
    /// 书名所在的 h2 内指向书籍总览页的链接
    pub global_view_link: Selector,
    pub navigation: Selector,
    pub page_link: Selector,
    pub paragraph: Selector,
}

static SELECTORS: OnceLock<SiteSelectors> = OnceLock::new();

impl SiteSelectors {
    /// 获取全局选择器实例
    pub fn get() -> &'static SiteSelectors {
        SELECTORS.get_or_init(|| SiteSelectors {
            global_view_link: Selector::parse("h2 a[href*='view_global.php']").unwrap(),
            navigation: Selector::parse("div.navigation").unwrap(),
            page_link: Selector::parse("a[href*='read_book.php']").unwrap(),
            paragraph: Selector::parse("p.MsoNormal").unwrap(),
        })
    }
}
