use anyhow::Result;
use clap::Parser;
use duet_server::{ServerConfig, SignalingService, router};
use std::net::Ipv4Addr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    let service = SignalingService::new(config.ice_config());
    let app = router(service);

    let listener = tokio::net::TcpListener::bind((Ipv4Addr::UNSPECIFIED, config.port)).await?;
    info!("signaling server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
