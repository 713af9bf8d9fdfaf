//! Huddle notifications service binary.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use huddle_notify::{create_router, AppState, NotifyConfig, RoomBridge};
use huddle_pubsub::PubSubConfig;
use huddle_realtime::RoomHub;
use huddle_store::StoreConfig;

/// Huddle notifications service - chat and realtime notifications
#[derive(Parser, Debug)]
#[command(name = "huddle-notify")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listen address (overrides NOTIFY_ADDR)
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

    let mut config = NotifyConfig::from_env();
    if let Some(addr) = args.addr {
        config.addr = addr;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.addr,
        broker = config.redis_url.is_some(),
        durable = config.store_path.is_some(),
        "starting notifications service"
    );

    let pubsub = huddle_pubsub::connect(&PubSubConfig {
        redis_url: config.redis_url.clone(),
    })
    .await?;
    let store = huddle_store::open(&StoreConfig {
        path: config.store_path.clone(),
    })?;
    let hub = Arc::new(RoomHub::new());
    let bridge = Arc::new(RoomBridge::new(pubsub, Arc::clone(&hub)));

    let state = AppState { hub, store, bridge };
    let app = create_router(state.clone(), &config.client_origin);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "notifications service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.bridge.shutdown().await;
    tracing::info!("notifications service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
