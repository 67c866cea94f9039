//! 章节装配器 (Chapter Assembler)
//!
//! 按页序累积正文片段，并依据目录页码区间切分为章节。

use tracing::warn;

use crate::core::model::{ChapterMap, TableOfContents, WHOLE_BOOK_TITLE};

/// 全书正文缓冲区
///
/// 页面片段依页码升序追加进同一缓冲区，只记录每页结束处的字节偏移，
/// 不单独保留片段。
#[derive(Debug, Default)]
pub struct AccumulatedContent {
    buf: String,
    /// `page_ends[i]` 为第 `i + 1` 页结束处的偏移
    page_ends: Vec<usize>,
}

impl AccumulatedContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加下一页的片段，页码必须连续
    pub fn push(&mut self, page_num: u32, fragment: &str) {
        debug_assert_eq!(page_num as usize, self.page_ends.len() + 1, "pages must arrive in order");
        self.buf.push_str(fragment);
        self.page_ends.push(self.buf.len());
    }

    pub fn page_count(&self) -> u32 {
        self.page_ends.len() as u32
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// 取出闭区间 `[first, last]` 页的内容，超出范围的部分被截断
    pub fn pages(&self, first: u32, last: u32) -> &str {
        let count = self.page_count();
        let first = first.max(1);
        let last = last.min(count);
        if count == 0 || first > last {
            return "";
        }

        let start = self.offset_before(first);
        let end = self.page_ends[last as usize - 1];
        &self.buf[start..end]
    }

    fn offset_before(&self, page: u32) -> usize {
        match page {
            0 | 1 => 0,
            p => self.page_ends[p as usize - 2],
        }
    }
}

/// 将累积的正文切分为章节
pub fn assemble_chapters(content: &AccumulatedContent, toc: &TableOfContents) -> ChapterMap {
    let mut chapters = ChapterMap::new();

    let entries = match toc {
        TableOfContents::Flat { title, .. } => {
            chapters.insert(title.clone(), content.as_str().to_string());
            return chapters;
        }
        TableOfContents::Structured(entries) => entries,
    };

    let last_page = content.page_count();
    let Some(min_start) = entries.values().map(|r| r.start_page).min() else {
        chapters.insert(WHOLE_BOOK_TITLE.to_string(), content.as_str().to_string());
        return chapters;
    };

    let mut covered = vec![false; last_page as usize];

    for (index, (title, range)) in entries.iter().enumerate() {
        // 首章之前的页面 (封面、前言等) 并入首章
        let first = if index == 0 && range.start_page == min_start {
            1
        } else {
            range.start_page
        };
        let last = range.end_page.unwrap_or(last_page);

        for page in first.max(1)..=last.min(last_page) {
            covered[page as usize - 1] = true;
        }
        chapters.insert(title.clone(), content.pages(first, last).to_string());
    }

    let orphaned: Vec<u32> = covered
        .iter()
        .enumerate()
        .filter(|(_, c)| !**c)
        .map(|(i, _)| i as u32 + 1)
        .collect();
    if !orphaned.is_empty() {
        warn!(
            "以下页面不属于任何章节，已被忽略 (目录最早起始于第 {} 页): {:?}",
            min_start, orphaned
        );
    }

    chapters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{PageRange, TocBuilder};

    fn content(pages: &[&str]) -> AccumulatedContent {
        let mut acc = AccumulatedContent::new();
        for (i, page) in pages.iter().enumerate() {
            acc.push(i as u32 + 1, page);
        }
        acc
    }

    #[test]
    fn flat_toc_keeps_whole_book_as_one_chapter() {
        let acc = content(&["<p>1</p>", "<p>2</p>", "<p>3</p>"]);
        let chapters = assemble_chapters(&acc, &TableOfContents::flat(3));

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters["Книга"], "<p>1</p><p>2</p><p>3</p>");
    }

    #[test]
    fn structured_toc_slices_by_page_ranges() {
        let acc = content(&["a", "b", "c", "d", "e", "f"]);
        let mut toc = TocBuilder::new();
        toc.push("Ch1", 1);
        toc.push("Ch2", 3);
        toc.push("Ch3", 6);

        let chapters = assemble_chapters(&acc, &toc.finish(6));
        let got: Vec<_> = chapters.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(got, vec![("Ch1", "ab"), ("Ch2", "cde"), ("Ch3", "f")]);
    }

    #[test]
    fn open_last_chapter_runs_to_last_page() {
        let acc = content(&["a", "b", "c", "d"]);
        let mut entries = indexmap::IndexMap::new();
        entries.insert("Ch1".to_string(), PageRange::closed(1, 1));
        entries.insert("Ch2".to_string(), PageRange::open(2));

        let chapters = assemble_chapters(&acc, &TableOfContents::Structured(entries));
        assert_eq!(chapters["Ch2"], "bcd");
    }

    #[test]
    fn leading_pages_fold_into_first_chapter() {
        let acc = content(&["cover", "foreword", "one", "two"]);
        let mut toc = TocBuilder::new();
        toc.push("Ch1", 3);
        toc.push("Ch2", 4);

        let chapters = assemble_chapters(&acc, &toc.finish(4));
        assert_eq!(chapters["Ch1"], "coverforewordone");
        assert_eq!(chapters["Ch2"], "two");
    }

    #[test]
    fn ranges_beyond_fetched_pages_are_clamped() {
        let acc = content(&["a", "b"]);
        let mut toc = TocBuilder::new();
        toc.push("Ch1", 1);
        toc.push("Ch2", 2);
        toc.push("Ch3", 5);

        let chapters = assemble_chapters(&acc, &toc.finish(9));
        assert_eq!(chapters["Ch1"], "a");
        assert_eq!(chapters["Ch2"], "b");
        assert_eq!(chapters["Ch3"], "");
    }

    #[test]
    fn chapters_sharing_a_start_page() {
        let acc = content(&["a", "b", "c"]);
        let mut toc = TocBuilder::new();
        toc.push("Ch1", 1);
        toc.push("Ch1.1", 2);
        toc.push("Ch2", 2);

        let chapters = assemble_chapters(&acc, &toc.finish(3));
        assert_eq!(chapters["Ch1"], "a");
        assert_eq!(chapters["Ch1.1"], "");
        assert_eq!(chapters["Ch2"], "bc");
    }

    #[test]
    fn empty_structured_toc_degrades_to_whole_book() {
        let acc = content(&["a", "b"]);
        let toc = TableOfContents::Structured(indexmap::IndexMap::new());

        let chapters = assemble_chapters(&acc, &toc);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[WHOLE_BOOK_TITLE], "ab");
    }

    #[test]
    fn page_slicing_respects_multibyte_boundaries() {
        let acc = content(&["Глава", "Текст"]);
        assert_eq!(acc.pages(2, 2), "Текст");
        assert_eq!(acc.pages(1, 2), "ГлаваТекст");
        assert_eq!(acc.pages(3, 4), "");
    }
}
