//! 核心层：领域模型和通用能力
//!
//! 包含命令解析、提示词、会话注册表和配置等核心概念

pub mod command;
pub mod config;
pub mod metadata;
pub mod prompt;
pub mod session;
