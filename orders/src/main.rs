//! Custom orders HTTP server.

use anyhow::Context;
use custom_orders::bootstrap::{
    build_identity_provider, build_notifier, build_repositories, build_session_store,
    build_state, init_tracing,
};
use custom_orders::metrics::install_prometheus;
use custom_orders::{build_router, Config};
use custom_orders_auth::AdminAllowList;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();
    init_tracing();

    info!("Starting custom orders server");

    let config = Config::from_env();
    if config.sessions.secret.is_none() {
        warn!("SESSION_SECRET not set; set it in production");
    }

    let metrics = match install_prometheus() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Metrics exporter unavailable");
            None
        }
    };

    let repositories = build_repositories(&config).await?;
    let sessions = build_session_store(&config).await?;
    let identity = build_identity_provider(&config);
    let admins = AdminAllowList::parse(&config.admin_emails);
    info!(admins = admins.len(), "Admin allow-list loaded");
    let notifier = build_notifier(&config, &admins)?;

    let state = build_state(&config, repositories, sessions, identity, notifier, metrics);
    let store = Arc::clone(&state.store);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("HTTP server stopped, draining in-flight effects");
    if let Err(e) = store.shutdown(config.shutdown_timeout()).await {
        error!(error = %e, "Store shutdown incomplete");
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C signal"),
        () = terminate => info!("Received SIGTERM signal"),
    }
}
