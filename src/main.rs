// oddscache - Quota-aware caching gateway for The Odds API
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use oddscache::cache::{spawn_cleanup_task, AdaptiveCache};
use oddscache::cli::Args;
use oddscache::config::AppConfig;
use oddscache::odds::{OddsClient, OddsService};
use oddscache::server::create_router;
use oddscache::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting oddscache v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the cache and its cleanup sweep
    let cache_config = config.cache.to_cache_config();
    let cleanup_interval = cache_config.cleanup_interval;
    let cache = Arc::new(AdaptiveCache::new(cache_config));
    let sweeper = spawn_cleanup_task(cache.clone(), cleanup_interval);

    // Phase 4: Upstream client
    let client = OddsClient::new(&config.upstream)?
        .with_sanitized_logging(config.logging.sanitize_secrets);
    info!("Upstream: {}", client.base_url());
    let odds_service = Arc::new(OddsService::new(cache, client));

    // Phase 5: Build and start HTTP server
    let app = create_router(config.clone(), odds_service);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 6: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
