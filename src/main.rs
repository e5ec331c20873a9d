//! Course bot backend
//!
//! Serves the bot's commands over HTTP with an expiring record cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursebot::api::{create_router, AppState};
use coursebot::auth::BcryptVerifier;
use coursebot::cache::ExpiringCache;
use coursebot::db::{MemoryStore, Seed};
use coursebot::tasks::CleanupTask;
use coursebot::{spawn_cleanup_task, AccessCoordinator, Config};

/// Main entry point for the course bot backend.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create and seed the record store
/// 4. Create the expiring cache and start its sweep task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Stop the sweeper on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coursebot=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting course bot backend");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_expiration={}s, cleanup_interval={}s, port={}",
        config.default_expiration, config.cleanup_interval, config.server_port
    );

    let store = Arc::new(MemoryStore::new());
    let passwords = Arc::new(BcryptVerifier::default());
    if let Some(path) = &config.seed_file {
        let seed = Seed::from_file(path)?;
        seed.apply(store.as_ref(), passwords.as_ref())
            .await
            .context("applying seed data")?;
    }

    let settings = config.cache_settings();
    let cache = ExpiringCache::new(settings);
    let cleanup = spawn_cleanup_task(cache.clone(), settings.cleanup_interval);
    info!("Record cache initialized");

    let coordinator = AccessCoordinator::new(cache, store, passwords);
    let app = create_router(AppState::new(coordinator));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup))
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper.
async fn shutdown_signal(cleanup: Option<CleanupTask>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    if let Some(task) = cleanup {
        task.shutdown().await;
    }
}
