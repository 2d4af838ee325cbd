use recipe_client::{ClientConfig, RecipeMcpServer};
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!("Using recipe backend at {}", config.base_url);

    if config.auth_token.is_none() {
        tracing::warn!("RECIPE_AUTH_TOKEN is not set; create, delete and logout will be refused");
    }
    if config.update_sends_auth {
        tracing::info!("Updates will carry the bearer token");
    }

    let server = RecipeMcpServer::from_config(&config)?;

    // Page load: the initial list fetch doubles as a connectivity check
    match server.start().await {
        Ok(count) => {
            tracing::info!("Initial recipe list loaded ({} recipes)", count);
        }
        Err(e) => {
            tracing::warn!("Initial recipe list failed: {}", e);
            tracing::warn!("Please verify:");
            tracing::warn!("  - RECIPE_BASE_URL is correct: {}", config.base_url);
            tracing::warn!("  - the recipe backend is running and accessible");
            tracing::warn!("The server will continue; each command contacts the backend again.");
        }
    }

    let sse_config = SseServerConfig {
        bind: config.bind_addr,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: tokio_util::sync::CancellationToken::new(),
        sse_keep_alive: None,
    };

    tracing::info!("Recipe MCP Server listening on {}", sse_config.bind);

    // serve_with_config handles binding, axum server setup, and graceful shutdown internally
    let sse_server = SseServer::serve_with_config(sse_config).await?;

    // Every connection drives the same page
    let shared = server.clone();
    let ct = sse_server.with_service(move || shared.clone());

    tracing::info!("Recipe MCP Server started successfully");

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    server.shutdown();
    ct.cancel();

    Ok(())
}
