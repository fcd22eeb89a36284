//! 会话接口定义
//!
//! - [`ChatSession`]: 与 LLM 提供方的一段持续对话（句柄）
//! - [`SessionFactory`]: 按系统指令创建新句柄
//! - [`SessionStore`]: 会话 ID 到句柄的注册表

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;

mod memory;

pub use memory::{MemorySessionStore, SessionLimits};

/// 未提供会话 ID 时使用的默认值
pub const DEFAULT_SESSION_ID: &str = "default";

/// 对话句柄
///
/// 句柄自己维护上下文，调用方只负责发送新消息
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// 发送一条用户消息，返回模型的原始回复文本
    async fn send_message(&self, message: &str) -> Result<String>;
}

/// 句柄工厂
///
/// 创建必须是纯本地操作，注册表会在持有键锁时调用它
pub trait SessionFactory: Send + Sync {
    fn create(&self, system_instruction: &str) -> Arc<dyn ChatSession>;
}

/// 会话注册表
///
/// 同一 ID 至多对应一个存活句柄
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 查找存活的句柄
    async fn get(&self, session_id: &str) -> Option<Arc<dyn ChatSession>>;

    /// 查找或创建句柄
    ///
    /// ID 已存在时忽略 `system_instruction`，原样返回已有句柄
    async fn get_or_create(
        &self,
        session_id: &str,
        system_instruction: &str,
    ) -> Arc<dyn ChatSession>;

    /// 当前会话数
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
