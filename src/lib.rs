//! Gemi 聊天中继
//!
//! 把网站前端的聊天消息转发给 Gemini，并从模型回复中拆出站点控制命令：
//! - 会话注册表（每个会话 ID 对应一个对话句柄）
//! - 命令解析（`|||JSON_START|||` ... `|||JSON_END|||`）
//! - 站点元数据注入（标签上下文）
//!
//! # 架构分层
//!
//! - `core`: 核心层，命令、提示词、会话抽象和配置
//! - `infrastructure`: 基础设施层，Gemini、网站后端、日志、HTTP 服务
//! - `application`: 应用层，请求编排

// 核心层
pub mod core;

// 基础设施层
pub mod infrastructure;

// 应用层
pub mod application;

pub mod errors;

pub use crate::core::command::{extract, Action, Command, JSON_END, JSON_START};
pub use crate::core::config::AppConfig;
pub use crate::core::metadata::{MetadataSource, SiteMetadata};
pub use crate::core::session::{
    ChatSession, MemorySessionStore, SessionFactory, SessionLimits, SessionStore,
    DEFAULT_SESSION_ID,
};

pub use crate::infrastructure::llm::{LlmChat, LlmClient, LlmSessionFactory};
pub use crate::infrastructure::logger;
pub use crate::infrastructure::metadata::MetadataClient;
pub use crate::infrastructure::web::{create_router, start_web_server, AppState};

pub use crate::application::chat::{ChatReply, ChatService, APOLOGY_REPLY, EMPTY_MESSAGE_REPLY};

pub use crate::errors::{GemiError, Result};

/// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
