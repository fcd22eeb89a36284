//! 网站后端元数据客户端

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::core::metadata::{MetadataSource, SiteMetadata};
use crate::errors::{GemiError, Result};

/// 元数据接口路径
pub const METADATA_PATH: &str = "/api/ai/metadata";

/// 默认超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// 元数据客户端
///
/// 任何失败（网络、超时、非 200、解析）都退化为空元数据
#[derive(Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    url: String,
}

impl MetadataClient {
    pub fn new(backend_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GemiError::ConfigError(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            http,
            url: format!("{}{}", backend_url.trim_end_matches('/'), METADATA_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn try_fetch(&self) -> Result<SiteMetadata> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GemiError::NetworkError(format!(
                "metadata endpoint returned {}",
                status
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MetadataSource for MetadataClient {
    async fn fetch(&self) -> SiteMetadata {
        match self.try_fetch().await {
            Ok(metadata) => {
                debug!(
                    "Fetched site metadata: {} tags",
                    metadata.available_tags.len()
                );
                metadata
            }
            Err(e) => {
                warn!("Site metadata unavailable, continuing without it: {}", e);
                SiteMetadata::default()
            }
        }
    }
}
