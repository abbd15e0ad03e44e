//! Roster HTTP Server Binary
//!
//! This is the main entry point for the roster REST API server.
//! It initializes the repository, loads the planner configuration, sets up
//! the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin roster-server --features "local-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `ROSTER_CONFIG`: Path to a roster.toml planner configuration file
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use roster_rust::config::PlannerConfig;
use roster_rust::db;
use roster_rust::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .init();

    info!("Starting roster HTTP server");

    // Initialize global repository once and reuse it across the app
    db::init_repository()?;
    let repository = std::sync::Arc::clone(db::get_repository()?);
    info!("Repository initialized successfully");

    // Planner configuration: explicit path wins, then default locations.
    let config = match env::var("ROSTER_CONFIG") {
        Ok(path) => PlannerConfig::from_file(&path)?,
        Err(_) => PlannerConfig::from_default_location()?,
    };
    info!(
        "Planner config: min_rest={}h lookback={}d tolerance={}m",
        config.min_rest_hours, config.lookback_days, config.rest_tolerance_minutes
    );

    // Create application state and router
    let state = AppState::new(repository, config);
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
