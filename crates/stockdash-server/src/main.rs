mod api;
mod middleware;
mod refresh;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use stockdash_store::SnapshotStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(stockdash_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = Arc::new(SnapshotStore::new());

    // Warm the store before serving. Failure is not fatal: the scraper may
    // simply not have produced its first batch yet, and the health endpoint
    // reports degraded until a cycle succeeds.
    {
        let config = Arc::clone(&config);
        let store = Arc::clone(&store);
        let warmed =
            tokio::task::spawn_blocking(move || refresh::run_refresh_cycle(&config, &store)).await;
        if let Ok(Err(error)) = warmed {
            tracing::warn!(%error, "startup refresh failed; serving degraded until next cycle");
        }
    }

    let _scheduler = scheduler::build_scheduler(Arc::clone(&config), Arc::clone(&store)).await?;

    let app = build_app(AppState {
        store,
        config: Arc::clone(&config),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "stockdash-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
