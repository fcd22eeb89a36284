//! Web 服务器模块
//!
//! 提供 `GET /` 状态检查和 `POST /chat` 聊天接口

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, info_span, Instrument};

use crate::application::chat::ChatService;
use crate::core::session::DEFAULT_SESSION_ID;
use crate::errors::Result;

/// 状态接口返回的文本
pub const STATUS_TEXT: &str = "Gemi AI Brain is Active 🧠";

// ==================== 状态 ====================

pub struct AppState {
    pub chat: ChatService,
}

impl AppState {
    pub fn new(chat: ChatService) -> Self {
        Self { chat }
    }
}

// ==================== 请求/响应类型 ====================

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

// ==================== 处理器 ====================

/// 状态检查
async fn status() -> impl IntoResponse {
    Json(StatusResponse {
        status: STATUS_TEXT,
    })
}

/// 聊天
async fn chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> impl IntoResponse {
    let message = req.message.unwrap_or_default();
    let session_id = req
        .session_id
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    let request_id = uuid::Uuid::new_v4();
    let span = info_span!("chat", %request_id, session_id = %session_id);

    let reply = state
        .chat
        .handle(&message, &session_id)
        .instrument(span)
        .await;

    Json(reply)
}

// ==================== 路由 ====================

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(status))
        .route("/chat", post(chat))
        .layer(cors)
        .with_state(state)
}

// ==================== 服务器启动 ====================

/// 绑定端口并开始服务，绑定或运行失败时返回 `ServerError`
pub async fn start_web_server(bind_addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!("Web server started on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
