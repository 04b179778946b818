mod config;
mod identity;
mod kv;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{KvBackend, ServerConfig};
use crate::kv::{KvStore, MemoryKv, RestKv};

fn build_store(backend: &KvBackend) -> Result<Option<Arc<dyn KvStore>>, kv::KvError> {
    Ok(match backend {
        KvBackend::Disabled => None,
        KvBackend::Memory => Some(Arc::new(MemoryKv::new())),
        KvBackend::Rest { url, token, timeout_secs } => Some(Arc::new(RestKv::new(url, token.clone(), *timeout_secs)?)),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let kv = build_store(&config.kv)?;
    match &config.kv {
        KvBackend::Disabled => tracing::warn!("like store not configured; serving mock like counts"),
        KvBackend::Memory => tracing::info!("like store: in-memory (not persisted)"),
        KvBackend::Rest { url, .. } => tracing::info!(%url, "like store: REST"),
    }

    let state = state::AppState::new(kv);
    let app = routes::app(state, &config.website_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    tracing::info!(port = config.port, website_dir = %config.website_dir.display(), "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
