//! 网站元数据客户端测试
//!
//! 用本地 axum 服务模拟网站后端

mod fixtures;

use std::time::Duration;

use axum::{http::StatusCode, routing::get, Json, Router};
use fixtures::spawn_router;
use gemi::{MetadataClient, MetadataSource};
use serde_json::json;

const PATH: &str = "/api/ai/metadata";

#[tokio::test]
async fn test_fetch_success() {
    let app = Router::new().route(
        PATH,
        get(|| async { Json(json!({ "availableTags": ["action", "romance"], "total": 2 })) }),
    );
    let addr = spawn_router(app).await;

    let client = MetadataClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let metadata = client.fetch().await;

    assert_eq!(metadata.available_tags, vec!["action", "romance"]);
    assert_eq!(metadata.extra["total"], 2);
}

#[tokio::test]
async fn test_non_200_yields_empty() {
    let app = Router::new().route(
        PATH,
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "availableTags": ["x"] }))) }),
    );
    let addr = spawn_router(app).await;

    let client = MetadataClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    assert!(client.fetch().await.is_empty());
}

#[tokio::test]
async fn test_invalid_body_yields_empty() {
    let app = Router::new().route(PATH, get(|| async { "definitely not json" }));
    let addr = spawn_router(app).await;

    let client = MetadataClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    assert!(client.fetch().await.is_empty());
}

#[tokio::test]
async fn test_timeout_yields_empty() {
    let app = Router::new().route(
        PATH,
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "availableTags": ["late"] }))
        }),
    );
    let addr = spawn_router(app).await;

    let client =
        MetadataClient::new(&format!("http://{}", addr), Duration::from_millis(100)).unwrap();
    assert!(client.fetch().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_yields_empty() {
    // 绑定后立即释放，得到一个没有监听者的端口
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = MetadataClient::new(&format!("http://{}", addr), Duration::from_secs(1)).unwrap();
    assert!(client.fetch().await.is_empty());
}
