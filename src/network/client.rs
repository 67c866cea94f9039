//! HTTP 抓取协作者 (Fetch Collaborator)
//!
//! 单次 GET，非 200 即失败，不做重试。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::core::config::HttpConfig;
use crate::core::error::{ConvertError, Result};

/// 页面抓取接口
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// 获取响应体文本
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// 基于 reqwest 的 HTTP 客户端
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .tcp_nodelay(true)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ConvertError::Network)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ConvertError::Fetch {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ConvertError::Status {
                url: url.to_string(),
                status,
            });
        }

        resp.text().await.map_err(|source| ConvertError::Fetch {
            url: url.to_string(),
            source,
        })
    }
}
