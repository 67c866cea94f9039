//! 错误处理体系 (Error Handling System)
//!
//! 定义转换流水线中的领域错误类型以及全局 Result 别名。
//! 所有错误均为终止性错误，由 `main` 统一报告。

use reqwest::StatusCode;
use thiserror::Error;

/// 全局错误定义 (Conversion Domain Errors)
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 网络层失败 (DNS / 连接 / 超时 / 读取响应体)
    #[error("Fetch error: {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 客户端初始化失败
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 非 200 响应
    #[error("Fetch error: {url} returned status {status}")]
    Status { url: String, status: StatusCode },

    /// 站点结构缺失 (必要元素不存在)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// 目录/导航链接缺少数字参数
    #[error("Malformed link {href}: {reason}")]
    MalformedLink { href: String, reason: String },

    /// 用户输入的 URL 无法解析
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Build error: {0}")]
    Build(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// 全局 Result 别名
pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn malformed(href: &str, reason: impl Into<String>) -> Self {
        Self::MalformedLink {
            href: href.to_string(),
            reason: reason.into(),
        }
    }

    /// 错误类别名称，用于终端诊断输出
    pub fn category(&self) -> &'static str {
        match self {
            ConvertError::Fetch { .. } | ConvertError::Status { .. } | ConvertError::Network(_) => {
                "FetchError"
            }
            ConvertError::Parse(_) => "ParseError",
            ConvertError::MalformedLink { .. } => "MalformedLinkError",
            ConvertError::InvalidUrl { .. } => "InvalidUrl",
            ConvertError::Build(_) | ConvertError::Io(_) => "BuildError",
            ConvertError::Config(_) => "ConfigError",
        }
    }
}
