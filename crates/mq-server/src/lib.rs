//! mq-server: HTTP front end for the marquee media core.
//!
//! This crate wires the synchronous streaming and subtitle components of
//! `mq-media` into an Axum application. It provides:
//!
//! - Range-aware video streaming with bounded memory per request
//! - Subtitle serving with on-the-fly SubRip to WebVTT conversion
//! - A catalog endpoint backed by a fresh library scan per request
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod middleware;
pub mod paths;
pub mod router;
pub mod routes;
pub mod scanner;

use std::net::SocketAddr;

use mq_core::config::Config;
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;

/// Start the marquee server.
///
/// Validates the configuration, prepares the library root, and serves HTTP
/// until a shutdown signal is received or `cancel` is triggered.
pub async fn start(config: Config, cancel: CancellationToken) -> mq_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    ensure_library_root(&config)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| mq_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::new(config);
    let app = router::build_router(ctx, static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| mq_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await
        .map_err(|e| mq_core::Error::Internal(format!("Server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Report on the library root, creating it when allowed.
///
/// A root that cannot be created is logged, not fatal: the catalog is simply
/// empty until the directory appears.
fn ensure_library_root(config: &Config) -> mq_core::Result<()> {
    let root = &config.library.root;
    if root.is_dir() {
        tracing::info!("Library root found at {}", root.display());
        return Ok(());
    }
    if root.exists() {
        return Err(mq_core::Error::Validation(format!(
            "library root {} is not a directory",
            root.display()
        )));
    }
    if !config.library.create_root {
        tracing::warn!("Library root {} does not exist", root.display());
        return Ok(());
    }

    match std::fs::create_dir_all(root) {
        Ok(()) => tracing::info!("Library root created at {}", root.display()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            tracing::error!(
                "Permission denied creating library root at {}; check directory permissions",
                root.display()
            );
        }
        Err(e) => {
            tracing::error!("Error creating library root {}: {e}", root.display());
        }
    }
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or cancellation.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }

    tracing::info!("Shutdown signal received");
}
