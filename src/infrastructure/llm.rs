//! LLM 客户端
//!
//! 使用 async-openai 通过 Gemini 的 OpenAI 兼容端点对话。
//! [`LlmChat`] 是一个会话句柄，自己保存对话历史。

use std::sync::Arc;

use anyhow::{Context, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::session::{ChatSession, SessionFactory};

/// Gemini 客户端
#[derive(Clone)]
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl LlmClient {
    /// 创建新的客户端
    pub fn new_with_base_url(api_key: String, model: String, base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();

        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);

        let client = Client::with_config(config);

        Self { client, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// 调用聊天 API
    pub async fn chat(&self, messages: Vec<Message>) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = messages
            .into_iter()
            .map(|msg| match msg.role {
                Role::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(msg.content)
                    .build()
                    .map(ChatCompletionRequestMessage::System),
                Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                    .content(msg.content)
                    .build()
                    .map(ChatCompletionRequestMessage::Assistant),
                Role::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(msg.content)
                    .build()
                    .map(ChatCompletionRequestMessage::User),
            })
            .collect::<Result<Vec<_>, _>>()
            .context("构建消息失败")?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .build()
            .context("构建请求失败")?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("调用 LLM API 失败")?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}

/// 消息角色
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// 消息结构
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// 会话句柄
///
/// 系统指令在创建时固定。同一会话的多轮请求串行执行，
/// 只有调用成功时才把这一轮写入历史。
pub struct LlmChat {
    client: LlmClient,
    system_instruction: String,
    history: Mutex<Vec<Message>>,
}

impl LlmChat {
    pub fn new(client: LlmClient, system_instruction: impl Into<String>) -> Self {
        Self {
            client,
            system_instruction: system_instruction.into(),
            history: Mutex::new(Vec::new()),
        }
    }

    /// 已完成的轮数
    pub async fn turns(&self) -> usize {
        self.history.lock().await.len() / 2
    }
}

#[async_trait]
impl ChatSession for LlmChat {
    async fn send_message(&self, message: &str) -> crate::errors::Result<String> {
        let mut history = self.history.lock().await;

        let user = Message::user(message);
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(self.system_instruction.as_str()));
        messages.extend(history.iter().cloned());
        messages.push(user.clone());

        debug!(
            "Sending {} messages to {}",
            messages.len(),
            self.client.model()
        );
        let reply = self.client.chat(messages).await?;

        history.push(user);
        history.push(Message::assistant(reply.as_str()));

        Ok(reply)
    }
}

/// 基于 [`LlmClient`] 的句柄工厂，所有会话共享同一个客户端
#[derive(Clone)]
pub struct LlmSessionFactory {
    client: LlmClient,
}

impl LlmSessionFactory {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

impl SessionFactory for LlmSessionFactory {
    fn create(&self, system_instruction: &str) -> Arc<dyn ChatSession> {
        Arc::new(LlmChat::new(self.client.clone(), system_instruction))
    }
}
