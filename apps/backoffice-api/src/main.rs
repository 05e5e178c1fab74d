//! # Back-Office API Server
//!
//! ```bash
//! backoffice-api [--config <PATH>]
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use fogon_backoffice_api::notifier::{LogNotifier, WebhookNotifier};
use fogon_backoffice_api::worker::spawn_reminder_worker;
use fogon_backoffice_api::{create_router, AppState, BackofficeConfig};
use fogon_db::{Database, DbConfig, Notifier, ReminderService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fogon=debug,sqlx=warn")),
        )
        .with_target(true)
        .init();

    info!("Starting Fogón back-office API...");

    let config = BackofficeConfig::load(config_path_arg()).context("loading configuration")?;
    let addr = config.socket_addr()?;
    info!(
        %addr,
        db = %config.database_path.display(),
        reminder_every = config.reminder_interval_secs,
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(config.database_path.clone()))
        .await
        .context("opening database")?;

    let notifier: Arc<dyn Notifier> = match config.reminder_webhook_url {
        Some(ref url) => {
            info!(url = %url, "Reminders go to webhook");
            Arc::new(WebhookNotifier::new(url.clone())?)
        }
        None => {
            info!("No reminder webhook configured; reminders are only logged");
            Arc::new(LogNotifier)
        }
    };
    let reminders = ReminderService::new(
        db.clone(),
        notifier,
        chrono::Duration::minutes(config.reminder_lead_minutes),
    );
    let worker = spawn_reminder_worker(reminders, Duration::from_secs(config.reminder_interval_secs));

    let app = create_router(AppState::new(db.clone()));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    worker.abort();
    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// `--config <PATH>` from the command line, if given.
fn config_path_arg() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
