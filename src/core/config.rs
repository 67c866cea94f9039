//! 配置管理系统 (Configuration Management)
//!
//! 负责 `config.toml` 的反序列化及其层级结构映射，文件缺失时回退到默认值。

use std::path::Path;

use bon::Builder;
use config::{Config, File};
use serde::Deserialize;

use crate::core::error::{ConvertError, Result};

/// 全局应用配置
#[derive(Debug, Deserialize, Builder, Clone)]
pub struct AppConfig {
    /// 产物输出目录
    #[serde(default = "default_output_dir")]
    #[builder(default = default_output_dir())]
    pub output_dir: String,

    /// 是否按章节拆分并生成可导航目录
    #[serde(default = "default_include_toc")]
    #[builder(default = default_include_toc())]
    pub include_toc: bool,

    /// 书籍语言 (Dublin Core `language`)
    #[serde(default = "default_language")]
    #[builder(default = default_language())]
    pub language: String,

    /// 书籍作者 (Dublin Core `creator`)
    #[serde(default = "default_author")]
    #[builder(default = default_author())]
    pub author: String,

    /// HTTP 客户端参数
    #[serde(default)]
    #[builder(default)]
    pub http: HttpConfig,
}

/// HTTP 客户端参数
#[derive(Debug, Deserialize, Builder, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    #[builder(default = default_user_agent())]
    pub user_agent: String,
    /// 单次请求总超时 (秒)
    #[serde(default = "default_timeout_secs")]
    #[builder(default = default_timeout_secs())]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    #[builder(default = default_connect_timeout_secs())]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}
fn default_include_toc() -> bool {
    true
}
fn default_language() -> String {
    "ru".to_string()
}
fn default_author() -> String {
    "КБК".to_string()
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// 从工作目录加载 `config.toml`
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let builder = Config::builder();

        let builder = if config_path.exists() {
            builder.add_source(File::from(config_path))
        } else {
            builder
        };

        let settings = builder.build().map_err(ConvertError::Config)?;
        settings.try_deserialize().map_err(ConvertError::Config)
    }
}
