//! Lead Pipeline Service
//!
//! HTTP API for sales leads, agents, comments and pipeline reports.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `in_memory` (default) | `postgres`
//! - `DATABASE_URL`: `PostgreSQL` connection URL (required when `STORAGE_MODE=postgres`)
//! - `RUST_LOG`: Logging level (e.g., `debug`, `info`, `lead_pipeline=debug`)
//! - `HOST`: Server host address (default: `0.0.0.0`)
//! - `PORT`: Server port (default: `3000`)
//! - `WORKER_THREADS`: Number of tokio worker threads (default: logical CPU count)

use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lead_pipeline::api::{AppState, router};
use lead_pipeline::config::{ServerConfig, parse_worker_threads};
use lead_pipeline::infrastructure::RepositoryFactory;

fn main() {
    dotenvy::dotenv().ok();

    let available = std::thread::available_parallelism().map_or(16, std::num::NonZero::get);
    let worker_threads = parse_worker_threads(
        std::env::var("WORKER_THREADS").ok().as_deref(),
        available,
    );

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();

    if let Some(warning) = &worker_threads.warning {
        eprintln!("Warning: {warning}");
    }
    if let Some(threads) = worker_threads.threads {
        builder.worker_threads(threads);
        if worker_threads.warning.is_none() {
            eprintln!("Tokio worker_threads set to: {threads}");
        }
    } else if worker_threads.warning.is_none() {
        eprintln!("Tokio worker_threads: using default (logical CPU count)");
    }

    let runtime = builder.build().expect("Failed to create tokio runtime");
    runtime.block_on(async_main());
}

async fn async_main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lead_pipeline=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Lead Pipeline Service");

    let factory = match RepositoryFactory::from_env() {
        Ok(factory) => factory,
        Err(error) => {
            tracing::error!("Configuration error: {}", error);
            std::process::exit(1);
        }
    };

    tracing::info!(
        storage_mode = ?factory.config().storage_mode,
        "Repository configuration loaded"
    );

    let repositories = match factory.create().await {
        Ok(repositories) => {
            tracing::info!("Repositories initialized successfully");
            repositories
        }
        Err(error) => {
            tracing::error!("Failed to initialize repositories: {}", error);
            std::process::exit(1);
        }
    };

    let address = match ServerConfig::from_env().and_then(|config| config.socket_address()) {
        Ok(address) => address,
        Err(error) => {
            tracing::error!(%error, "Invalid server address");
            std::process::exit(1);
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let application = router(AppState::from_repositories(&repositories))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = match TcpListener::bind(address).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%error, "Failed to bind to address {}", address);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(address) => tracing::info!("Listening on {}", address),
        Err(error) => tracing::warn!(%error, "Could not determine local address"),
    }

    let served = axum::serve(listener, application)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    repositories.close().await;

    if let Err(error) = served {
        tracing::error!(%error, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Server shutdown complete");
}

/// Completes on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
