use defi_dashboard::gateway::{self, AppState};
use defi_dashboard::Config;
use tracing::info;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    info!("Starting DeFi dashboard gateway...");

    // Load configuration from environment
    let config = Config::from_env().unwrap_or_else(|_| {
        info!("Using default configuration (UPSTREAM_MCP_URL environment variable not found)");
        Config::from_url("http://localhost:8000/mcp/".to_string())
    });

    let state = AppState::new(&config)?;
    let app = gateway::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!("Gateway listening on http://{}", config.bind_addr);
    info!(
        "Forwarding POST {} to {}",
        gateway::PROXY_PATH,
        config.upstream_url
    );

    axum::serve(listener, app).await?;

    Ok(())
}
