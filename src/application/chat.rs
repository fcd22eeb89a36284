//! 聊天服务
//!
//! 一次请求的完整流程：查找或创建会话 → 转发消息 → 拆分命令

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::core::command::{extract, Command};
use crate::core::metadata::MetadataSource;
use crate::core::prompt::{system_instructions, DEFAULT_TAG_LIMIT};
use crate::core::session::SessionStore;

/// 空消息时的提示
pub const EMPTY_MESSAGE_REPLY: &str = "Kuch bolo toh sahi yaar! 😅";

/// 调用 LLM 失败时的回复
pub const APOLOGY_REPLY: &str = "Oops! Mera server thoda down lag raha hai. Wapis try karo.";

/// 返回给前端的结果
///
/// 三种形态的 JSON 字段各不相同，序列化时不带标签
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatReply {
    /// 空消息：`{ "reply" }`
    Prompt { reply: String },
    /// 正常回复：`{ "reply", "command" }`，没有命令时 command 为 null
    Answer {
        reply: String,
        command: Option<Command>,
    },
    /// 调用失败：`{ "reply", "error" }`
    Failure { reply: String, error: String },
}

impl ChatReply {
    pub fn reply(&self) -> &str {
        match self {
            ChatReply::Prompt { reply }
            | ChatReply::Answer { reply, .. }
            | ChatReply::Failure { reply, .. } => reply,
        }
    }

    pub fn command(&self) -> Option<&Command> {
        match self {
            ChatReply::Answer { command, .. } => command.as_ref(),
            _ => None,
        }
    }
}

/// 聊天服务
pub struct ChatService {
    sessions: Arc<dyn SessionStore>,
    metadata: Arc<dyn MetadataSource>,
    tag_limit: usize,
}

impl ChatService {
    pub fn new(sessions: Arc<dyn SessionStore>, metadata: Arc<dyn MetadataSource>) -> Self {
        Self {
            sessions,
            metadata,
            tag_limit: DEFAULT_TAG_LIMIT,
        }
    }

    /// 设置注入提示词的标签数量
    pub fn with_tag_limit(mut self, limit: usize) -> Self {
        self.tag_limit = limit;
        self
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// 处理一条用户消息
    pub async fn handle(&self, message: &str, session_id: &str) -> ChatReply {
        if message.is_empty() {
            return ChatReply::Prompt {
                reply: EMPTY_MESSAGE_REPLY.to_string(),
            };
        }

        let session = match self.sessions.get(session_id).await {
            Some(session) => session,
            None => {
                // 只有新会话才需要站点上下文
                let metadata = self.metadata.fetch().await;
                let instructions = system_instructions(&metadata, self.tag_limit);
                info!("Starting session: {}", session_id);
                self.sessions.get_or_create(session_id, &instructions).await
            }
        };

        let raw_text = match session.send_message(message).await {
            Ok(text) => text,
            Err(e) => {
                error!("Error: {}", e);
                return ChatReply::Failure {
                    reply: APOLOGY_REPLY.to_string(),
                    error: e.to_string(),
                };
            }
        };

        let (reply, command) = extract(&raw_text);
        if let Some(command) = &command {
            if command.known_action().is_none() {
                warn!(
                    "Unknown action forwarded to frontend: {:?}",
                    command.get("action")
                );
            }
        }

        ChatReply::Answer { reply, command }
    }
}
