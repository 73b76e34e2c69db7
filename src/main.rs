use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_sessions::MemoryStore;
use tracing_subscriber::EnvFilter;

use pocket_gateway::backend::PocketBaseClient;
use pocket_gateway::config::AppConfig;
use pocket_gateway::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "pocket-gateway")]
#[command(about = "Session-gated CRUD gateway in front of a PocketBase backend")]
#[command(version)]
struct Args {
    #[arg(long, help = "Interface to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Backend base URL (overrides POCKETHOST_BASE_URL)")]
    backend_url: Option<String>,

    #[arg(long, help = "Directory of static assets (overrides STATIC_DIR)")]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up POCKETHOST_BASE_URL, SESSION_SECRET, etc.
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    let config = apply_args(AppConfig::from_env(), args);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    tracing::info!("Starting Pocket Gateway in {:?} mode", config.environment);
    if config.uses_default_secret() {
        if config.environment.is_production() {
            anyhow::bail!("SESSION_SECRET must be set in production");
        }
        tracing::warn!("SESSION_SECRET not set, signing session cookies with the default secret");
    }

    let backend = PocketBaseClient::new(&config.backend).context("failed to build backend client")?;
    tracing::info!(backend = %backend.base_url(), "Backend client ready");

    let bind_addr = config.bind_addr();
    let state = AppState::new(Arc::new(backend), config);
    let router = app(state, MemoryStore::default());

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Server is running on http://{}", bind_addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn apply_args(mut config: AppConfig, args: Args) -> AppConfig {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(url) = args.backend_url {
        config.backend.base_url = url;
    }
    if let Some(dir) = args.static_dir {
        config.server.static_dir = dir;
    }
    config
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
