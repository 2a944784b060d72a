//! Mini Cache - An in-memory cache server speaking a line-oriented TCP protocol
//!
//! Stores opaque byte payloads under string keys, with TTL expiration and
//! LRU eviction.

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_cache::{serve, spawn_cleanup_task, Config, ServerState};

/// Main entry point for the Mini Cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create cache store with configured parameters
/// 4. Start background expiration sweep
/// 5. Accept TCP clients until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: host={}, port={}, max_message_size={}, max_entries={}, cleanup_interval={}s",
        config.server_host,
        config.server_port,
        config.max_message_size,
        config.max_entries,
        config.cleanup_interval
    );

    let state = ServerState::from_config(&config);
    info!(
        "Cache store initialized with capacity {}",
        state.cache.read().await.max_entries()
    );

    let cleanup_handle = (config.cleanup_interval > 0).then(|| {
        spawn_cleanup_task(
            state.cache.clone(),
            Duration::from_secs(config.cleanup_interval),
        )
    });

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!("Serving on {}", listener.local_addr()?);

    serve(listener, state.clone(), shutdown_signal()).await;

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Expiration sweep aborted");
    }

    let stats = state.cache.read().await.stats();
    info!("Final cache stats: {}", stats);
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
