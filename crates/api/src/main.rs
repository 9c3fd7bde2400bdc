use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Utc;
use tokenprint_core::printing::LpPrintCommand;
use tokenprint_db::repositories::{JobRepo, SessionRepo};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokenprint_api::config::ServerConfig;
use tokenprint_api::engine::dispatcher::INTERRUPTED_PRINT_MESSAGE;
use tokenprint_api::router::build_app_router;
use tokenprint_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tokenprint_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        payment_required = config.payment_required,
        simulate_payment = config.simulate_payment,
        "Loaded server configuration",
    );

    // --- Database ---
    let pool = tokenprint_db::create_pool(&config.database_url)
        .await
        .expect("Failed to open database");
    tracing::info!("Database connection pool created");

    tokenprint_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    tokenprint_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    let purged = SessionRepo::cleanup_expired(&pool, Utc::now())
        .await
        .expect("Failed to purge expired admin sessions");
    tracing::info!(purged, "Expired admin sessions purged");

    let interrupted = JobRepo::fail_interrupted(&pool, INTERRUPTED_PRINT_MESSAGE)
        .await
        .expect("Failed to recover interrupted print jobs");
    if interrupted > 0 {
        tracing::warn!(interrupted, "Jobs left in printing were marked failed");
    }

    // --- Upload directory ---
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    // --- Printer ---
    let printer = LpPrintCommand::from_command_line(&config.print_command, config.printer_name.clone())
        .expect("PRINT_COMMAND must not be empty");
    tracing::info!(command = %config.print_command, printer = ?config.printer_name, "Print command configured");

    // --- App state ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState {
        pool,
        config: Arc::new(config),
        printer: Arc::new(printer),
    };

    let app = build_app_router(state);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM to initiate graceful shutdown.
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
