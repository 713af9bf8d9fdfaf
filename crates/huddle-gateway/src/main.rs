//! Huddle gateway binary.

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use huddle_gateway::{create_router, AppState, GatewayConfig};

/// Huddle gateway - public entry point for the Huddle backend
#[derive(Parser, Debug)]
#[command(name = "huddle-gateway")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listen address (overrides GATEWAY_ADDR)
    #[arg(long)]
    addr: Option<SocketAddr>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("huddle={}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = GatewayConfig::from_env();
    if let Some(addr) = args.addr {
        config.addr = addr;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.addr,
        projects = %config.upstreams.projects,
        tasks = %config.upstreams.tasks,
        notifications = %config.upstreams.notifications,
        "starting gateway"
    );

    let state = AppState::new(config.upstreams.clone());
    let app = create_router(state, &config.client_origin);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
