//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig          # Host, port, shutdown
//! ├── middleware: MiddlewareConfig  # CORS, recovery/timeouts
//! └── service: ServiceConfig        # Database, session secret, cookies
//! ```
//!
//! Every option can be given as an argument or an environment variable.
//! Use `--help` to list them.

mod middleware;
mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use middleware::MiddlewareConfig;
use reminders_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "reminders")]
#[command(about = "Reminders HTTP backend")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Database, session secret and cookie configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads `.env` (if enabled) and parses arguments.
    ///
    /// The file is loaded first so clap's `env` fallbacks can see it.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with `RUST_LOG` filtering, `info` by default.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates the values clap cannot check on its own.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        Ok(())
    }

    /// Logs the configuration. Secrets are never logged.
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        let postgres = &self.service.postgres_config;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            database_url = %postgres.database_url_masked(),
            postgres_max_connections = postgres.postgres_max_connections,
            postgres_connection_timeout_secs = ?postgres.postgres_connection_timeout_secs,
            postgres_idle_timeout_secs = ?postgres.postgres_idle_timeout_secs,
            "Database configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            secret_from_file = self.service.session_keys.auth_secret_filepath.is_some(),
            cookie_secure = self.service.cookie_secure,
            "Session configuration"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_minimal_arguments() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "reminders",
            "--postgres-url",
            "postgresql://localhost/reminders",
            "--auth-secret-filepath",
            "./auth_secret",
        ])?;

        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.middleware.recovery.request_timeout, 30);
        assert!(cli.service.cookie_secure);
        assert!(cli.validate().is_ok());
        Ok(())
    }

    #[test]
    fn secret_sources_conflict() {
        let result = Cli::try_parse_from([
            "reminders",
            "--postgres-url",
            "postgresql://localhost/reminders",
            "--auth-secret",
            "inline-secret-value-that-is-long-enough",
            "--auth-secret-filepath",
            "./auth_secret",
        ]);

        assert!(result.is_err());
    }
}
