// ABOUTME: Library root for plastic-slack-rs.
// ABOUTME: Exports config, error, server, and slack modules and the run() entry point.

pub mod config;
pub mod error;
pub mod server;
pub mod slack;

pub use config::Config;
pub use error::{RelayError, Result};
pub use server::{build_router, AppState};
pub use slack::SlackPoster;

use anyhow::Context;
use plastic_relay_core::Dispatcher;
use std::sync::Arc;
use tracing::info;

/// Run the relay with an already loaded configuration.
pub async fn run(config: Config) -> anyhow::Result<()> {
    info!("plastic-slack-relay starting");
    info!(
        bind = %config.server.bind,
        default_channel = ?config.default_channel(),
        max_message_chars = config.dispatch.max_message_chars,
        "Configuration loaded"
    );

    let slack = SlackPoster::new(&config.slack).await?;
    info!(bot_user_id = %slack.bot_user_id(), "Slack client ready");

    let state = AppState {
        dispatcher: Dispatcher::new(Arc::new(slack), config.dispatch_config()),
        default_channel: config.default_channel().map(str::to_string),
    };
    let app = build_router(state, config.server.body_limit_bytes);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "Server is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running HTTP server")?;

    info!("plastic-slack-relay stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
