//! 测试 Fixtures
//!
//! 提供模拟的会话、句柄工厂和元数据来源

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use gemi::{
    ChatService, ChatSession, GemiError, MemorySessionStore, MetadataSource, SessionFactory,
    SiteMetadata,
};

/// 固定回复的会话
pub struct StubSession {
    reply: Result<String, String>,
    received: Mutex<Vec<String>>,
}

impl StubSession {
    pub fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatSession for StubSession {
    async fn send_message(&self, message: &str) -> gemi::Result<String> {
        self.received.lock().unwrap().push(message.to_string());
        self.reply.clone().map_err(GemiError::LlmError)
    }
}

/// 记录创建次数的句柄工厂
pub struct StubFactory {
    reply: Result<String, String>,
    created: AtomicUsize,
    instructions: Mutex<Vec<String>>,
    sessions: Mutex<Vec<Arc<StubSession>>>,
}

impl StubFactory {
    /// 所有会话都返回 `reply`
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self::with_reply(Ok(reply.to_string())))
    }

    /// 所有会话调用都失败
    pub fn failing(error: &str) -> Arc<Self> {
        Arc::new(Self::with_reply(Err(error.to_string())))
    }

    fn with_reply(reply: Result<String, String>) -> Self {
        Self {
            reply,
            created: AtomicUsize::new(0),
            instructions: Mutex::new(Vec::new()),
            sessions: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }

    /// 所有会话收到的消息，按会话创建顺序排列
    pub fn received(&self) -> Vec<String> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .flat_map(|s| s.received())
            .collect()
    }

    /// 所有会话收到的消息总数
    pub fn total_calls(&self) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.received().len())
            .sum()
    }
}

impl SessionFactory for StubFactory {
    fn create(&self, system_instruction: &str) -> Arc<dyn ChatSession> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.instructions
            .lock()
            .unwrap()
            .push(system_instruction.to_string());

        let session = Arc::new(StubSession {
            reply: self.reply.clone(),
            received: Mutex::new(Vec::new()),
        });
        self.sessions.lock().unwrap().push(Arc::clone(&session));
        session
    }
}

/// 固定元数据，记录调用次数
pub struct StubMetadata {
    metadata: SiteMetadata,
    fetches: AtomicUsize,
}

impl StubMetadata {
    pub fn with_tags(tags: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            metadata: SiteMetadata {
                available_tags: tags.iter().map(|t| t.to_string()).collect(),
                extra: serde_json::Map::new(),
            },
            fetches: AtomicUsize::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::with_tags(&[])
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for StubMetadata {
    async fn fetch(&self) -> SiteMetadata {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.metadata.clone()
    }
}

/// 基于模拟对象的聊天服务
pub fn chat_service(factory: Arc<StubFactory>, metadata: Arc<StubMetadata>) -> ChatService {
    let sessions = Arc::new(MemorySessionStore::new(factory));
    ChatService::new(sessions, metadata)
}

/// 在随机端口启动路由，返回监听地址
pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // 等待服务器启动
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    addr
}
