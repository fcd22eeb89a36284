//! 配置管理
//!
//! 命令行参数与环境变量（支持 `.env`）共用一套定义

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::core::prompt::DEFAULT_TAG_LIMIT;
use crate::core::session::SessionLimits;
use crate::errors::{GemiError, Result};

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Gemi chat relay: forwards site chat to Gemini and extracts UI commands"
)]
pub struct AppConfig {
    // LLM 配置
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-2.0-flash")]
    pub gemini_model: String,

    /// Gemini 的 OpenAI 兼容端点
    #[arg(
        long,
        env = "GEMINI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta/openai"
    )]
    pub gemini_base_url: String,

    // 网站后端
    #[arg(long, env = "WEBSITE_BACKEND_URL", default_value = "http://localhost:3000")]
    pub website_backend_url: String,

    /// 元数据请求超时（秒）
    #[arg(long, env = "METADATA_TIMEOUT_SECS", default_value_t = 2)]
    pub metadata_timeout_secs: u64,

    /// 注入系统提示词的标签数量
    #[arg(long, env = "CONTEXT_TAG_LIMIT", default_value_t = DEFAULT_TAG_LIMIT)]
    pub context_tag_limit: usize,

    // 服务监听
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    // 会话
    /// 最大会话数
    #[arg(long, env = "SESSION_CAPACITY", default_value_t = 1000)]
    pub session_capacity: usize,

    /// 会话空闲过期时间（秒），0 表示永不过期
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 3600)]
    pub session_ttl_secs: u64,
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(GemiError::ConfigError(
                "GEMINI_API_KEY not found in .env".to_string(),
            ));
        }

        if self.session_capacity == 0 {
            return Err(GemiError::ConfigError(
                "SESSION_CAPACITY must be greater than 0".to_string(),
            ));
        }

        self.bind_addr()?;

        Ok(())
    }

    /// 监听地址
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| GemiError::ConfigError(format!("Invalid HOST/PORT: {}", e)))
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            capacity: self.session_capacity,
            ttl: (self.session_ttl_secs > 0).then(|| Duration::from_secs(self.session_ttl_secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> AppConfig {
        let mut argv = vec!["gemi", "--gemini-api-key", "test-key"];
        argv.extend_from_slice(args);
        AppConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = parse(&["--host", "0.0.0.0"]);
        assert_eq!(cfg.gemini_model, "gemini-2.0-flash");
        assert_eq!(cfg.context_tag_limit, 10);
        assert_eq!(cfg.metadata_timeout(), Duration::from_secs(2));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let cfg = AppConfig::try_parse_from(["gemi", "--gemini-api-key", "  "]).unwrap();
        assert!(matches!(cfg.validate(), Err(GemiError::ConfigError(_))));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let cfg = parse(&["--session-capacity", "0"]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_invalid_host_rejected() {
        let cfg = parse(&["--host", "not a host"]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_session_limits() {
        let cfg = parse(&["--session-ttl-secs", "0", "--session-capacity", "7"]);
        let limits = cfg.session_limits();
        assert_eq!(limits.capacity, 7);
        assert_eq!(limits.ttl, None);

        let cfg = parse(&[]);
        assert_eq!(cfg.session_limits().ttl, Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_bind_addr() {
        let cfg = parse(&["--host", "127.0.0.1", "--port", "8080"]);
        assert_eq!(cfg.bind_addr().unwrap().to_string(), "127.0.0.1:8080");
    }
}
