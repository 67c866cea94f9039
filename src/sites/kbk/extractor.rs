//! Kbk 正文提取器
//!
//! 在 `div#toc` 容器上执行纯函数式重写：剔除分页导航、换行与页内嵌入的目录，
//! 并将 h1/h2 改写为行内粗体与居中段落。

use scraper::{ElementRef, Html};

use crate::core::error::{ConvertError, Result};
use crate::interfaces::ContentExtractor;
use crate::utils::markup::{NodeKind, Rewrite, Visitor, escape, render_children, text_of};

use super::SiteSelectors;
use super::selectors::{NAVIGATION_CLASS, SERIES_CLASS};

/// 需整体丢弃的样板标题
const BOILERPLATE_HEADINGS: &[&str] = &["СОДЕРЖАНИЕ", "ПРЕДИСЛОВИЕ"];
/// 不适用短标题双换行规则的标题
const PLAN_HEADING: &str = "ПЛАН";
/// 短标题阈值 (字符数)
const SHORT_HEADING_CHARS: usize = 30;

pub struct KbkExtractor;

impl ContentExtractor for KbkExtractor {
    fn extract_page_content(&self, html: &str) -> Result<String> {
        let doc = Html::parse_document(html);
        let s = SiteSelectors::get();

        let content = doc
            .select(&s.toc)
            .next()
            .ok_or_else(|| ConvertError::parse("Content container `div#toc` not found"))?;

        Ok(render_children(content, &mut PageCleaner).join("\n"))
    }
}

/// 页面清洗访问者
struct PageCleaner;

impl Visitor for PageCleaner {
    fn visit(&mut self, kind: NodeKind, el: ElementRef<'_>) -> Rewrite {
        match kind {
            NodeKind::LineBreak => Rewrite::Drop,
            NodeKind::List if is_embedded_contents(&el) => Rewrite::Drop,
            NodeKind::Heading1 => rewrite_heading(&el),
            NodeKind::Heading2 => Rewrite::Replace(format!(
                r#"<p align="center"><b>{}</b></p>"#,
                escape(&text_of(&el))
            )),
            NodeKind::Other if is_navigation(&el) => Rewrite::Drop,
            _ => Rewrite::Keep,
        }
    }
}

fn is_navigation(el: &ElementRef<'_>) -> bool {
    el.value().name() == "div" && el.value().classes().any(|c| c == NAVIGATION_CLASS)
}

/// 首个直接 `li` 含有直接 `a` 的有序列表视为页内目录
fn is_embedded_contents(el: &ElementRef<'_>) -> bool {
    if el.value().name() != "ol" {
        return false;
    }

    el.children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == "li")
        .is_some_and(|li| {
            li.children()
                .filter_map(ElementRef::wrap)
                .any(|child| child.value().name() == "a")
        })
}

/// h1 改写规则
///
/// 样板标题与书系标题整体丢弃；其余改为 `<b>`，非空时前置一个 `<br/>`，
/// 短标题 (除 "ПЛАН" 外) 再多一个。
fn rewrite_heading(el: &ElementRef<'_>) -> Rewrite {
    let text = text_of(el);

    let is_series = el
        .value()
        .attr("class")
        .and_then(|c| c.split_whitespace().next())
        == Some(SERIES_CLASS);

    if is_series || BOILERPLATE_HEADINGS.contains(&text.as_str()) {
        return Rewrite::Drop;
    }

    let mut run = String::from("<b>");
    if !text.is_empty() {
        run.push_str("<br/>");
        if text.chars().count() <= SHORT_HEADING_CHARS && text != PLAN_HEADING {
            run.push_str("<br/>");
        }
    }
    run.push_str(&escape(&text));
    run.push_str("</b>");

    Rewrite::Replace(run)
}
