use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use gemi::{
    logger, start_web_server, AppConfig, AppState, ChatService, LlmClient, LlmSessionFactory,
    MemorySessionStore, MetadataClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logger::init();

    let cfg = AppConfig::parse();
    cfg.validate().context("invalid configuration")?;
    let bind_addr = cfg.bind_addr()?;

    let llm = LlmClient::new_with_base_url(
        cfg.gemini_api_key.clone(),
        cfg.gemini_model.clone(),
        cfg.gemini_base_url.clone(),
    );
    let sessions = MemorySessionStore::with_limits(
        Arc::new(LlmSessionFactory::new(llm)),
        cfg.session_limits(),
    );
    let metadata = MetadataClient::new(&cfg.website_backend_url, cfg.metadata_timeout())?;

    info!(
        "Gemi v{} starting: model={}, backend={}",
        gemi::VERSION,
        cfg.gemini_model,
        metadata.url()
    );

    let chat = ChatService::new(Arc::new(sessions), Arc::new(metadata))
        .with_tag_limit(cfg.context_tag_limit);

    start_web_server(bind_addr, Arc::new(AppState::new(chat)))
        .await
        .context("web server failed")?;

    Ok(())
}
