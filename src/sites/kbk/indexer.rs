//! Kbk 索引器
//!
//! 负责解析书名、书籍 ID、总页数与章节目录

use scraper::{ElementRef, Html};
use tracing::warn;

use crate::core::error::{ConvertError, Result};
use crate::core::model::{BookInfo, TableOfContents, TocBuilder};
use crate::interfaces::Indexer;
use crate::utils::extract_book_and_page_ids;
use crate::utils::markup::text_of;

use super::SiteSelectors;

/// Kbk 索引器
pub struct KbkIndexer;

impl Indexer for KbkIndexer {
    fn parse_book_info(&self, html: &str) -> Result<BookInfo> {
        let doc = Html::parse_document(html);
        let s = SiteSelectors::get();

        let content = doc
            .select(&s.toc)
            .next()
            .ok_or_else(|| ConvertError::parse("Content container `div#toc` not found"))?;

        let mut book_id = None;
        let mut nav_last: u32 = 0;

        // 分页导航: 最大页码即总页数
        for a in content.select(&s.nav_link) {
            let href = a.value().attr("href").unwrap_or_default();
            let (id, page) = extract_book_and_page_ids(href)?;
            book_id.get_or_insert(id);
            nav_last = nav_last.max(page);
        }

        let title = content
            .select(&s.series_title)
            .next()
            .or_else(|| doc.select(&s.title).next())
            .map(|h| text_of(&h).trim().to_string())
            .ok_or_else(|| ConvertError::parse("Title heading `h1.series` / `h1.title` not found"))?;

        let list = content
            .select(&s.chapter_list)
            .next()
            .ok_or_else(|| ConvertError::parse("Chapter list `ol` not found in `div#toc`"))?;

        let mut toc = TocBuilder::new();
        let mut chapter_last: u32 = 0;
        for item in child_elements(list, "li") {
            let Some(a) = child_elements(item, "a").next() else {
                warn!("目录项缺少链接，已跳过: {}", text_of(&item).trim());
                continue;
            };
            let href = a.value().attr("href").unwrap_or_default();
            let (id, start_page) = extract_book_and_page_ids(href)?;
            book_id.get_or_insert(id);
            chapter_last = chapter_last.max(start_page);

            toc.push(text_of(&a).trim(), start_page);
        }

        let id = book_id.ok_or_else(|| ConvertError::parse("Book identifier not found in any link"))?;
        // 无分页导航时才以目录中的最大起始页兜底
        let last_page_num = if nav_last > 0 { nav_last } else { chapter_last }.max(1);

        let table_of_contents = if toc.is_empty() {
            TableOfContents::Flat {
                title: title.clone(),
                last_page: last_page_num,
            }
        } else {
            toc.finish(last_page_num)
        };

        Ok(BookInfo {
            title,
            id,
            last_page_num,
            table_of_contents,
        })
    }
}

/// 指定名称的直接子元素 (不递归)
fn child_elements<'a>(parent: ElementRef<'a>, name: &'a str) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::PageRange;

    const FIRST_PAGE: &str = r#"
<html><body>
<h1 class="title">Запасной заголовок</h1>
<div id="toc">
  <h1 class="series">Краткий курс политэкономии</h1>
  <h1>СОДЕРЖАНИЕ</h1>
  <ol>
    <li><a href="?mb=77&part=1">Предисловие</a></li>
    <li><a href="?mb=77&part=3">Глава 1. Товар</a>
      <ol>
        <li><a href="?mb=77&part=4">§1. Вложенный пункт</a></li>
      </ol>
    </li>
    <li><a href="?mb=77&part=9">Глава 2. Деньги</a></li>
  </ol>
  <div class="ngg-navigation">
    <a href="?mb=77&part=1">1</a>
    <a href="?mb=77&part=2">2</a>
    <a href="?mb=77&part=12">12</a>
  </div>
</div>
</body></html>
"#;

    #[test]
    fn parses_title_id_and_last_page() {
        let info = KbkIndexer.parse_book_info(FIRST_PAGE).unwrap();
        assert_eq!(info.title, "Краткий курс политэкономии");
        assert_eq!(info.id, 77);
        assert_eq!(info.last_page_num, 12);
    }

    #[test]
    fn toc_uses_direct_items_and_resolves_ranges() {
        let info = KbkIndexer.parse_book_info(FIRST_PAGE).unwrap();
        assert_eq!(
            info.table_of_contents.entries(),
            vec![
                ("Предисловие", PageRange::closed(1, 2)),
                ("Глава 1. Товар", PageRange::closed(3, 8)),
                ("Глава 2. Деньги", PageRange::closed(9, 12)),
            ]
        );
    }

    #[test]
    fn falls_back_to_generic_title_heading() {
        let html = FIRST_PAGE.replace(r#"<h1 class="series">Краткий курс политэкономии</h1>"#, "");
        let info = KbkIndexer.parse_book_info(&html).unwrap();
        assert_eq!(info.title, "Запасной заголовок");
    }

    #[test]
    fn missing_container_is_fatal() {
        let err = KbkIndexer.parse_book_info("<div id=\"other\"></div>").unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn missing_chapter_list_is_fatal() {
        let html = r#"<div id="toc"><h1 class="series">Книга</h1>
            <div class="ngg-navigation"><a href="?mb=1&part=2">2</a></div></div>"#;
        let err = KbkIndexer.parse_book_info(html).unwrap_err();
        assert!(matches!(err, ConvertError::Parse(_)));
    }

    #[test]
    fn malformed_navigation_link_is_fatal() {
        let html = r#"<div id="toc"><h1 class="series">Книга</h1>
            <div class="ngg-navigation"><a href="?mb=1&part=next">»</a></div>
            <ol><li><a href="?mb=1&part=1">Глава</a></li></ol></div>"#;
        let err = KbkIndexer.parse_book_info(html).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedLink { .. }));
    }

    #[test]
    fn single_page_book_without_navigation() {
        let html = r#"<div id="toc"><h1 class="series">Памятка</h1>
            <ol><li><a href="?mb=4&part=1">Текст</a></li></ol></div>"#;
        let info = KbkIndexer.parse_book_info(html).unwrap();
        assert_eq!(info.id, 4);
        assert_eq!(info.last_page_num, 1);
        assert_eq!(
            info.table_of_contents.entries(),
            vec![("Текст", PageRange::closed(1, 1))]
        );
    }

    #[test]
    fn navigation_bounds_last_page_over_chapter_links() {
        let html = r#"<div id="toc"><h1 class="series">Очерки</h1>
            <ol>
              <li><a href="?mb=5&part=1">Начало</a></li>
              <li><a href="?mb=5&part=5">Опечатка в ссылке</a></li>
            </ol>
            <div class="ngg-navigation"><a href="?mb=5&part=1">1</a><a href="?mb=5&part=2">2</a></div></div>"#;
        let info = KbkIndexer.parse_book_info(html).unwrap();
        assert_eq!(info.last_page_num, 2);
    }

    #[test]
    fn chapter_links_bound_last_page_without_navigation() {
        let html = r#"<div id="toc"><h1 class="series">Очерки</h1>
            <ol>
              <li><a href="?mb=5&part=1">Начало</a></li>
              <li><a href="?mb=5&part=3">Продолжение</a></li>
            </ol></div>"#;
        let info = KbkIndexer.parse_book_info(html).unwrap();
        assert_eq!(info.last_page_num, 3);
        assert_eq!(
            info.table_of_contents.entries(),
            vec![
                ("Начало", PageRange::closed(1, 2)),
                ("Продолжение", PageRange::closed(3, 3)),
            ]
        );
    }
}
