#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use reminders_server::handler::{CustomRoutes, routes};
use reminders_server::middleware::{
    RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt, SecurityHeadersConfig,
};
use reminders_server::service::{ServiceConfig, ServiceState};

use crate::config::{Cli, MiddlewareConfig};

pub const TRACING_TARGET_SERVER_STARTUP: &str = "reminders_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "reminders_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "reminders_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %format_args!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    Cli::init_tracing();

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting reminders server"
    );

    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli.service).await?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;
    Ok(())
}

/// Loads the session secret, connects to Postgres and applies migrations.
async fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(config)
        .await
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Layers added last run first:
/// 1. Recovery (outermost): panics and timeouts
/// 2. Observability: request ids, tracing spans and timing
/// 3. Security: CORS, security headers, body limits, compression
/// 4. Routes (innermost)
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes(CustomRoutes::new(), state.clone())
        .with_state(state)
        .with_security(&middleware.cors, &SecurityHeadersConfig::default())
        .with_observability()
        .with_request_timing()
        .with_recovery(&middleware.recovery)
}
