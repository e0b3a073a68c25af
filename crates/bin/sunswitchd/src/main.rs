//! # sunswitchd — sunswitch daemon
//!
//! Composition root that wires all adapters together and runs the
//! scheduler.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars, CLI flags)
//! - Initialise `tracing` from the configured filter
//! - Construct the solar clock and device client (adapters)
//! - Construct the scheduler and load the configured switches (fail fast)
//! - Serve the control API when enabled
//! - Run the evaluation loop until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sunswitch_adapter_device_http::HttpDeviceClient;
use sunswitch_adapter_http_axum::state::AppState;
use sunswitch_adapter_solar_sunrise::SunriseSolarClock;
use sunswitch_app::ports::SystemClock;
use sunswitch_app::scheduler::Scheduler;
use sunswitch_domain::solar::SolarSite;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli.config.clone();
    let config = Config::load(&cli)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();
    tracing::info!(path = %path.display(), switches = config.switches.len(), "configuration loaded");

    // Adapters
    let device = HttpDeviceClient::new(&config.device.connection)
        .context("failed to build device client")?;
    let site = SolarSite::new(SunriseSolarClock, config.coordinates());

    // Scheduler
    let scheduler = Arc::new(Scheduler::new(
        config.scheduler_settings()?,
        site,
        device,
        SystemClock,
    ));
    scheduler
        .load(&config.switches)
        .await
        .context("failed to load switches")?;

    // HTTP
    if config.server.enabled {
        let bind_addr = config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind control API on {bind_addr}"))?;
        let app = sunswitch_adapter_http_axum::router::build(AppState::from_arc(Arc::clone(
            &scheduler,
        )));
        tracing::info!("control API listening on http://{bind_addr}");
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "control API stopped");
            }
        });
    }

    tokio::select! {
        () = scheduler.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for shutdown signal")?;
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
