mod app;
mod flash;
mod handlers;
mod views;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use log::{LevelFilter, error, info};
use pttracker::Tracker;
use pttracker::config::{Config, Environment};
use pttracker::logging::{init_logger, parse_level};
use std::sync::Arc;

use crate::app::AppState;

#[derive(Parser, Debug)]
#[command(version, about = "PT Tracker - physical therapy exercise log", long_about = None)]
struct Args {
    /// development, production or test
    #[arg(long, env = "APP_ENV", default_value = "development")]
    env: Environment,

    /// Required in production; other environments use a local database
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "PTTRACKER_BIND")]
    bind: Option<String>,

    #[arg(long, env = "PTTRACKER_LOG", default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutting down");
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();
    init_logger(args.log_level).context("failed to install logger")?;

    let config = Config::resolve(args.env, args.database_url, args.bind)?;
    info!("Starting PT tracker in {} mode", config.environment);

    let tracker = Tracker::open(&config).await?;
    let state = Arc::new(AppState::new(tracker));

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("Listening on http://{}", config.bind);

    axum::serve(listener, app::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
