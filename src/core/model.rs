use bon::Builder;
use indexmap::IndexMap;
use tracing::warn;

/// 单一合成章节的默认标题 (整本书作为一章)
pub const WHOLE_BOOK_TITLE: &str = "Книга";

/// 章节页码区间 (1-based, 闭区间)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start_page: u32,
    /// `None` 表示尚未闭合
    pub end_page: Option<u32>,
}

impl PageRange {
    pub fn open(start_page: u32) -> Self {
        Self {
            start_page,
            end_page: None,
        }
    }

    pub fn closed(start_page: u32, end_page: u32) -> Self {
        Self {
            start_page,
            end_page: Some(end_page),
        }
    }
}

/// 目录结构
///
/// `Flat` 表示无法得到章节结构，整本书为一章；`Structured` 为按插入顺序排列的
/// 章节标题到页码区间的映射。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOfContents {
    Flat { title: String, last_page: u32 },
    Structured(IndexMap<String, PageRange>),
}

impl TableOfContents {
    pub fn flat(last_page: u32) -> Self {
        Self::Flat {
            title: WHOLE_BOOK_TITLE.to_string(),
            last_page,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TableOfContents::Flat { .. } => 1,
            TableOfContents::Structured(map) => map.len(),
        }
    }

    /// 以 (标题, 区间) 形式迭代
    pub fn entries(&self) -> Vec<(&str, PageRange)> {
        match self {
            TableOfContents::Flat { title, last_page } => {
                vec![(title.as_str(), PageRange::closed(1, *last_page))]
            }
            TableOfContents::Structured(map) => {
                map.iter().map(|(k, v)| (k.as_str(), *v)).collect()
            }
        }
    }
}

/// 目录构建器
///
/// 每追加一个章节，上一个被插入的章节的 `end_page` 即被闭合为 `start - 1`。
/// 重名章节覆盖旧条目的值，但保留其原有位置。
#[derive(Debug, Default)]
pub struct TocBuilder {
    entries: IndexMap<String, PageRange>,
    last_title: Option<String>,
}

impl TocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, title: impl Into<String>, start_page: u32) {
        let title = title.into();

        if let Some(prev) = self.last_title.as_ref().and_then(|t| self.entries.get_mut(t)) {
            if start_page < prev.start_page {
                warn!(
                    "目录页码非单调: '{}' 起始于 {}，早于上一章的 {}",
                    title, start_page, prev.start_page
                );
            }
            prev.end_page = Some(start_page.saturating_sub(1));
        }

        if self.entries.contains_key(&title) {
            warn!("目录中存在重名章节，后者覆盖前者: {}", title);
        }

        self.entries.insert(title.clone(), PageRange::open(start_page));
        self.last_title = Some(title);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 以 `last_page` 闭合最后一个仍然开放的章节
    pub fn finish(mut self, last_page: u32) -> TableOfContents {
        if let Some(last) = self.last_title.as_ref().and_then(|t| self.entries.get_mut(t))
            && last.end_page.is_none()
        {
            last.end_page = Some(last_page);
        }
        TableOfContents::Structured(self.entries)
    }

    /// 保持最后一章开放
    #[cfg(test)]
    pub fn into_open(self) -> TableOfContents {
        TableOfContents::Structured(self.entries)
    }
}

/// 书籍基本信息 (由第一页解析，一次性构造)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInfo {
    pub title: String,
    pub id: u64,
    pub last_page_num: u32,
    pub table_of_contents: TableOfContents,
}

/// 章节标题到章节正文的有序映射
pub type ChapterMap = IndexMap<String, String>;

/// 电子书元数据
#[derive(Debug, Clone, Builder)]
pub struct EBookMetadata {
    #[builder(into)]
    pub identifier: String,
    #[builder(into)]
    pub title: String,
    #[builder(into)]
    pub language: String,
    #[builder(into)]
    pub author: String,
}

impl EBookMetadata {
    /// 输出文件名: 标题中的空格替换为下划线
    pub fn file_name(&self) -> String {
        let stem: String = self
            .title
            .chars()
            .map(|c| match c {
                ' ' | '/' | '\\' => '_',
                c => c,
            })
            .collect();
        format!("{}.epub", stem)
    }
}
