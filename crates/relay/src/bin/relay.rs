//! Relay service binary.
//!
//! Standalone HTTP service receiving Railway deployment webhooks.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use relay::{build_router, AppState, Config, NotificationStore, OperatingMode};
use remedy::{CursorLauncher, RailwayClient, RailwayConfig, RemediationRunner};

/// Webhook relay for Railway deployment notifications
#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Webhook relay for Railway deployment notifications")]
#[command(version)]
struct Cli {
    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("relay=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = Config::default();
    if let Some(port) = cli.port {
        config.port = port;
    }

    // Auto-fix without an API token cannot fetch deployment logs; refuse
    // to start half-configured rather than fail on the first event.
    if config.mode == OperatingMode::AutoFix && config.railway_token.is_none() {
        bail!("AUTO_FIX_ENABLED is set but RAILWAY_TOKEN is missing");
    }

    if config.auth_token.is_none() {
        warn!("WEBHOOK_AUTH_TOKEN not set - endpoints are unauthenticated");
    }

    let railway = config
        .railway_token
        .as_ref()
        .map(|token| RailwayClient::new(RailwayConfig::new(token)));

    let launcher = CursorLauncher::new(&config.repo_path);
    let runner = RemediationRunner::new(railway.clone(), launcher, config.github_repo.clone());

    let state = AppState {
        store: Arc::new(NotificationStore::new(config.max_notifications)),
        trigger: Arc::new(runner),
        railway,
        config: config.clone(),
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(
        port = config.port,
        auto_fix = config.mode.is_auto_fix(),
        "Relay listening"
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
