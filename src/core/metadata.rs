//! 站点元数据
//!
//! 网站后端提供的标签等信息，用于丰富新会话的系统提示词

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 站点元数据
///
/// 来自网站后端 `/api/ai/metadata`，获取失败时为空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    #[serde(rename = "availableTags", default)]
    pub available_tags: Vec<String>,

    /// 其余字段原样保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteMetadata {
    pub fn is_empty(&self) -> bool {
        self.available_tags.is_empty() && self.extra.is_empty()
    }
}

/// 元数据来源
///
/// 实现方自行吞掉错误，失败时返回空元数据
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self) -> SiteMetadata;
}
