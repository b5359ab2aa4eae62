//! HTTP server for the `serve` subcommand.
//!
//! Binds the API router to localhost and runs the expiry sweeper alongside
//! it until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::tasks::spawn_sweep_task;

/// Serves the cache over HTTP until a shutdown signal arrives.
///
/// # Startup Sequence
/// 1. Create the cache store from configuration
/// 2. Start the background expiry sweeper
/// 3. Bind the router on 127.0.0.1 at the configured port
/// 4. Abort the sweeper on graceful shutdown
pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!(
        "Configuration loaded: cache_root={}, ttl={}s, context_lines={}, port={}, sweep_interval={}s",
        config.cache_root.display(),
        config.ttl,
        config.context_lines,
        config.server_port,
        config.sweep_interval
    );

    let state = AppState::from_config(&config);
    let sweep_handle = spawn_sweep_task(state.cache.clone(), config.sweep_interval);

    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the sweeper.
async fn shutdown_signal(sweep_handle: JoinHandle<()>) {
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

    sweep_handle.abort();
    warn!("Sweep task aborted");
}
