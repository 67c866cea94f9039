//! 转换引擎调度器
//!
//! 负责协调一次转换的生命周期：方言判定 -> 书籍发现 -> 逐页抓取 -> 章节装配 -> EPUB 生成。
//! 全程顺序执行，任一错误立即终止。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::config::AppConfig;
use crate::core::epub::build_ebook;
use crate::core::error::Result;
use crate::core::model::{BookInfo, EBookMetadata};
use crate::network::Fetcher;
use crate::sites::{Dialect, extract_page_content, parse_book_info};
use crate::ui::PageProgress;
use crate::utils::resolve_page_url;

use super::{AccumulatedContent, assemble_chapters};

/// 转换引擎
pub struct ConvertEngine {
    fetcher: Arc<dyn Fetcher>,
    config: Arc<AppConfig>,
}

impl ConvertEngine {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: Arc<AppConfig>) -> Self {
        Self { fetcher, config }
    }

    /// 执行转换流程，返回生成的 EPUB 路径
    pub async fn run(&self, user_url: &str) -> Result<PathBuf> {
        // 1. 方言判定 (Resolve)
        let dialect = Dialect::detect(user_url);
        info!("站点方言: {}", dialect);

        // 2. 书籍发现 (Discover)
        let first_html = self.fetcher.fetch(user_url).await?;
        let book = parse_book_info(&first_html, dialect)?;
        info!(
            "《{}》(id={}) 共 {} 页，{} 个章节",
            book.title,
            book.id,
            book.last_page_num,
            book.table_of_contents.len()
        );
        for (title, range) in book.table_of_contents.entries() {
            debug!("目录: {} [{}..{:?}]", title, range.start_page, range.end_page);
        }

        // 3. 逐页抓取 (Loop)
        let progress = PageProgress::start(&book.title, book.last_page_num);
        let content = match self
            .collect_pages(dialect, user_url, &book, first_html, &progress)
            .await
        {
            Ok(content) => content,
            Err(e) => {
                progress.abandon(&e.to_string());
                return Err(e);
            }
        };

        // 4. 章节装配与生成 (Assemble & Build)
        let chapters = assemble_chapters(&content, &book.table_of_contents);
        let metadata = self.metadata(&book);
        let output = Path::new(&self.config.output_dir).join(metadata.file_name());

        progress.set_message("📖 COMPILING: Generating artifact...");
        match build_ebook(&metadata, &chapters, &output, self.config.include_toc) {
            Ok(path) => {
                progress.finish(&path.display().to_string());
                info!("EPUB 生成成功: {:?}", path);
                Ok(path)
            }
            Err(e) => {
                progress.abandon(&e.to_string());
                Err(e)
            }
        }
    }

    /// 按页码升序抓取并清洗全部页面
    ///
    /// 若第 1 页的 URL 与用户 URL 相同，则复用已获取的首页内容。
    async fn collect_pages(
        &self,
        dialect: Dialect,
        user_url: &str,
        book: &BookInfo,
        first_html: String,
        progress: &PageProgress,
    ) -> Result<AccumulatedContent> {
        let mut content = AccumulatedContent::new();
        let mut first_html = Some(first_html);

        for page_num in 1..=book.last_page_num {
            let page_url = resolve_page_url(user_url, dialect, page_num)?;

            let html = match first_html.take() {
                Some(html) if page_num == 1 && page_url == user_url => html,
                _ => self.fetcher.fetch(&page_url).await?,
            };

            let fragment = extract_page_content(&html, dialect)?;
            debug!("第 {}/{} 页: {} 字节", page_num, book.last_page_num, fragment.len());

            content.push(page_num, &fragment);
            progress.advance(page_num);
        }

        Ok(content)
    }

    fn metadata(&self, book: &BookInfo) -> EBookMetadata {
        EBookMetadata::builder()
            .identifier(book.id.to_string())
            .title(book.title.as_str())
            .language(self.config.language.as_str())
            .author(self.config.author.as_str())
            .build()
    }
}
