//! 应用程序入口 (Application Entrypoint)
//!
//! 负责 CLI 指令解析、遥测层初始化、依赖注入，并作为唯一的错误报告边界。

mod core;
mod engine;
mod interfaces;
mod network;
mod sites;
mod ui;
mod utils;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

use crate::core::config::AppConfig;
use crate::core::error::Result;
use crate::engine::ConvertEngine;
use crate::network::HttpClient;
use crate::ui::get_multi;

/// 进度条感知的日志写入器 (TUI-aware Log Writer)
///
/// 确保日志输出不会破坏终端进度条的渲染布局。
struct IndicatifWriter;

impl io::Write for IndicatifWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let _ = get_multi().println(s.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for IndicatifWriter {
    type Writer = IndicatifWriter;

    fn make_writer(&self) -> Self::Writer {
        IndicatifWriter
    }
}

/// 将分页的网络书籍转换为带目录的 EPUB
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 书籍页面 URL (loveread 或 kbk)
    #[arg(short, long)]
    url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 遥测层初始化 (Telemetry Layer Initialization)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(IndicatifWriter)
        .with_target(false)
        .with_ansi(true)
        .init();

    match convert(&cli.url).await {
        Ok(path) => {
            tracing::info!("Done: {}", path.display());
            Ok(())
        }
        // 唯一的错误报告出口
        Err(e) => Err(anyhow!("[{}] {}", e.category(), e)),
    }
}

async fn convert(url: &str) -> Result<PathBuf> {
    // 依赖项初始化与注入 (Dependency Injection)
    let config = Arc::new(AppConfig::load()?);
    let fetcher = Arc::new(HttpClient::new(&config.http)?);
    ConvertEngine::new(fetcher, config).run(url).await
}
