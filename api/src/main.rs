mod config;
mod db;
mod errors;
mod metrics;
mod model;
mod rest;
mod timestamp;
mod validate;

use axum::{routing::get, Router};
use config::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Startup aborted: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting temperature ingestion API");
    info!("HTTP server: {}", config.http_addr);
    info!("Database: {}", config.database_endpoint());

    // Initialize metrics
    metrics::init_metrics();

    // Connect to database and bring the schema up before accepting writes
    let pool = match db::make_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    // Build HTTP app with the API routes and metrics endpoint
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(pool.clone()));

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", config.http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    // Drain checked-out connections before exiting
    pool.close().await;

    info!("Shutting down");
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}
