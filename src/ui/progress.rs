//! 终端进度渲染 (Terminal UI Progress)
//!
//! 基于 `indicatif` 渲染逐页抓取进度。日志通过 [`get_multi`] 输出，避免撕裂进度条。

use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// 全局 TUI 容器 (Singleton)
static MULTI: OnceLock<MultiProgress> = OnceLock::new();

/// 获取全局进度容器实例
pub fn get_multi() -> &'static MultiProgress {
    MULTI.get_or_init(MultiProgress::new)
}

/// 逐页抓取进度条
pub struct PageProgress {
    bar: ProgressBar,
}

impl PageProgress {
    /// 总页数确定后创建进度条
    pub fn start(title: &str, total_pages: u32) -> Self {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ");

        let bar = get_multi().add(ProgressBar::new(total_pages as u64));
        bar.set_style(style);
        bar.set_message(format!("📚 {}", truncate_string(title, 30)));
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    pub fn advance(&self, page_num: u32) {
        self.bar.set_position(page_num as u64);
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.bar.set_message(msg.into());
    }

    pub fn finish(&self, path: &str) {
        self.bar.finish_with_message(format!("✅ {}", path));
    }

    pub fn abandon(&self, error: &str) {
        self.bar.abandon_with_message(format!("❌ FAILED: {}", error));
    }
}

/// 执行语义化字符串截断
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
