//! Kbk 选择器
//!
//! 预编译的 CSS 选择器

use std::sync::OnceLock;

use scraper::Selector;

/// 站点选择器集合
pub struct SiteSelectors {
    /// 正文与目录的公共容器
    pub toc: Selector,
    pub nav_link: Selector,
    pub series_title: Selector,
    pub title: Selector,
    pub chapter_list: Selector,
}

static SELECTORS: OnceLock<SiteSelectors> = OnceLock::new();

impl SiteSelectors {
    /// 获取全局选择器实例
    pub fn get() -> &'static SiteSelectors {
        SELECTORS.get_or_init(|| SiteSelectors {
            toc: Selector::parse("div#toc").unwrap(),
            nav_link: Selector::parse("div.ngg-navigation a[href]").unwrap(),
            series_title: Selector::parse("h1.series").unwrap(),
            title: Selector::parse("h1.title").unwrap(),
            chapter_list: Selector::parse("ol").unwrap(),
        })
    }
}

/// 分页导航区的 class
pub const NAVIGATION_CLASS: &str = "ngg-navigation";
/// 书系标题的 class
pub const SERIES_CLASS: &str = "series";
