//! 标准化错误处理
//!
//! 定义项目专用的错误类型

use thiserror::Error;

/// 项目主要错误类型
#[derive(Error, Debug)]
pub enum GemiError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// LLM 服务错误
    #[error("LLM service error: {0}")]
    LlmError(String),

    /// 网络请求错误
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Web 服务错误
    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<anyhow::Error> for GemiError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} 保留完整的 context 链
        GemiError::LlmError(format!("{:#}", err))
    }
}

impl From<reqwest::Error> for GemiError {
    fn from(err: reqwest::Error) -> Self {
        GemiError::NetworkError(err.to_string())
    }
}

impl From<std::io::Error> for GemiError {
    fn from(err: std::io::Error) -> Self {
        GemiError::ServerError(err.to_string())
    }
}

/// 项目结果类型别名
pub type Result<T> = std::result::Result<T, GemiError>;
