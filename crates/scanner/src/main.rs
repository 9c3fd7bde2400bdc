//! `tokenprint-scanner` -- kiosk camera daemon.
//!
//! Captures frames with `CAPTURE_COMMAND`, decodes job tokens from QR
//! codes, and calls `POST {SERVER_URL}/api/v1/print/{token}`. See
//! [`ScannerConfig::from_env`] for the environment variables.

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokenprint_scanner::camera::CaptureCommand;
use tokenprint_scanner::client::PrintClient;
use tokenprint_scanner::config::ScannerConfig;
use tokenprint_scanner::scanner::Scanner;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tokenprint_scanner=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ScannerConfig::from_env();
    tracing::info!(
        server_url = %config.server_url,
        capture_command = %config.capture_command,
        cooldown_secs = config.cooldown.as_secs(),
        "Starting tokenprint-scanner",
    );

    let source = CaptureCommand::from_command_line(&config.capture_command).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid CAPTURE_COMMAND");
        std::process::exit(1);
    });
    let client = PrintClient::new(config.server_url.clone());
    let mut scanner = Scanner::new(source, client, config.scan_interval, config.cooldown);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    scanner.run(cancel).await;
    tracing::info!("Scanner stopped");
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT (Ctrl-C), stopping"),
        () = terminate => tracing::info!("Received SIGTERM, stopping"),
    }
}
