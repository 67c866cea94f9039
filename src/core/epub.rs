//! EPUB 编译引擎 (EPUB Compilation Engine)
//!
//! 负责将章节映射序列化为符合 IDPF 规范的 EPUB 容器 (OCF 结构)。

use std::fs::File;
use std::path::{Path, PathBuf};

use epub_builder::{EpubBuilder, EpubContent, EpubVersion, MetadataOpfV3, ReferenceType, ZipLibrary};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::{ConvertError, Result};
use crate::core::model::{ChapterMap, EBookMetadata};

/// 合并模式下的单一文档名
const MERGED_FILE_NAME: &str = "book.xhtml";

/// EPUB 文档生成器
pub struct EpubGenerator<'a> {
    metadata: &'a EBookMetadata,
    chapters: &'a ChapterMap,
    /// 是否按章节拆分文档并生成内联目录
    include_toc: bool,
}

impl<'a> EpubGenerator<'a> {
    pub fn new(metadata: &'a EBookMetadata, chapters: &'a ChapterMap) -> Self {
        Self {
            metadata,
            chapters,
            include_toc: true,
        }
    }

    pub fn include_toc(mut self, include_toc: bool) -> Self {
        self.include_toc = include_toc;
        self
    }

    /// 执行文档编译流水线
    ///
    /// 先写入 `<output>.part`，成功后原子重命名；失败时清理临时文件。
    pub fn run<P: AsRef<Path>>(&self, output_path: P) -> Result<PathBuf> {
        let final_path = output_path.as_ref().to_path_buf();
        let mut part_path = final_path.clone().into_os_string();
        part_path.push(".part");
        let part_path = PathBuf::from(part_path);

        let result = self
            .write_to(&part_path)
            .and_then(|_| std::fs::rename(&part_path, &final_path).map_err(ConvertError::Io));

        if let Err(e) = result {
            if part_path.exists()
                && let Err(cleanup) = std::fs::remove_file(&part_path)
            {
                warn!("无法清理临时文件 {:?}: {}", part_path, cleanup);
            }
            return Err(e);
        }

        Ok(final_path)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        let mut builder = EpubBuilder::new(ZipLibrary::new().map_err(build_error)?)
            .map_err(build_error)?;
        builder.epub_version(EpubVersion::V30);

        self.configure_metadata(&mut builder);

        if self.include_toc {
            self.add_chapters(&mut builder)?;
        } else {
            self.add_merged(&mut builder)?;
        }

        let file = File::create(path)?;
        builder.generate(file).map_err(build_error)?;
        Ok(())
    }

    /// 注入书籍元数据 (Dublin Core Metadata)
    fn configure_metadata(&self, builder: &mut EpubBuilder<ZipLibrary>) {
        let meta = self.metadata;

        builder.set_uuid(Uuid::new_v5(&Uuid::NAMESPACE_URL, meta.identifier.as_bytes()));
        // 站点书籍 ID 原样保留
        builder.add_metadata_opf(Box::new(MetadataOpfV3::new(
            "dcterms:identifier".to_string(),
            crate::utils::markup::escape(&meta.identifier),
        )));
        builder.set_title(&meta.title);
        builder.add_author(&meta.author);
        builder.set_lang(&meta.language);
    }

    /// 每章一个文档，导航页位于阅读顺序首位
    fn add_chapters(&self, builder: &mut EpubBuilder<ZipLibrary>) -> Result<()> {
        builder.inline_toc();

        for (i, (title, body)) in self.chapters.iter().enumerate() {
            let file_name = format!("{}.xhtml", i + 1);
            debug!("写入章节 {} -> {}", title, file_name);

            let xhtml = self.wrap_html(title, body);
            let mut content = EpubContent::new(&file_name, xhtml.as_bytes()).title(title);
            if i == 0 {
                content = content.reftype(ReferenceType::Text);
            }

            builder.add_content(content).map_err(build_error)?;
        }
        Ok(())
    }

    /// 所有章节合并为单一文档
    fn add_merged(&self, builder: &mut EpubBuilder<ZipLibrary>) -> Result<()> {
        let body = self
            .chapters
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n");
        let xhtml = self.wrap_html(&self.metadata.title, &body);

        builder
            .add_content(
                EpubContent::new(MERGED_FILE_NAME, xhtml.as_bytes())
                    .title(&self.metadata.title)
                    .reftype(ReferenceType::Text),
            )
            .map_err(build_error)?;
        Ok(())
    }

    /// 应用 XHTML 1.1 标准模板包装
    fn wrap_html(&self, title: &str, body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{}">
<head>
    <meta http-equiv="Content-Type" content="application/xhtml+xml; charset=utf-8" />
    <title>{}</title>
</head>
<body>
{}
</body>
</html>"#,
            self.metadata.language,
            crate::utils::markup::escape(title),
            body
        )
    }
}

fn build_error<E: std::fmt::Display>(e: E) -> ConvertError {
    ConvertError::Build(e.to_string())
}

/// 以给定章节生成电子书
pub fn build_ebook(
    metadata: &EBookMetadata,
    chapters: &ChapterMap,
    output_path: &Path,
    include_toc: bool,
) -> Result<PathBuf> {
    EpubGenerator::new(metadata, chapters)
        .include_toc(include_toc)
        .run(output_path)
}
