#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use reminders_postgres::{PgClient, PgConfig, run_pending_migrations};
use serde::{Deserialize, Serialize};

use crate::service::{CookiePolicy, SessionKeys, SessionKeysConfig};
use crate::{Error, Result};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Postgres connection and pool settings.
    #[cfg_attr(feature = "config", command(flatten))]
    pub postgres_config: PgConfig,

    /// Source of the session token secret.
    #[cfg_attr(feature = "config", command(flatten))]
    #[builder(default)]
    pub session_keys: SessionKeysConfig,

    /// Marks the session cookie `Secure`.
    #[cfg_attr(
        feature = "config",
        arg(
            long,
            env = "COOKIE_SECURE",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    #[builder(default = "true")]
    pub cookie_secure: bool,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Builds the connection pool and applies pending migrations.
    pub async fn connect_postgres(&self) -> Result<PgClient> {
        let pg_client = self.postgres_config.clone().build().map_err(|e| {
            Error::internal("postgres", "Failed to create database client").with_source(e)
        })?;

        let report = run_pending_migrations(&pg_client).await.map_err(|e| {
            Error::internal("postgres", "Failed to apply database migrations").with_source(e)
        })?;

        if !report.is_noop() {
            tracing::info!(
                applied = report.applied.len(),
                "applied database migrations"
            );
        }

        Ok(pg_client)
    }

    /// Loads the session token secret.
    pub async fn load_session_keys(&self) -> Result<SessionKeys> {
        SessionKeys::from_config(&self.session_keys).await
    }

    #[inline]
    pub fn cookie_policy(&self) -> CookiePolicy {
        CookiePolicy::new(self.cookie_secure)
    }
}

impl ServiceConfigBuilder {
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        if let Some(postgres_config) = &builder.postgres_config {
            postgres_config.validate().map_err(|e| e.to_string())?;
        }

        if let Some(session_keys) = &builder.session_keys {
            match (&session_keys.auth_secret, &session_keys.auth_secret_filepath) {
                (None, None) => {
                    return Err("Session secret must be set via a value or a file".to_string());
                }
                (Some(_), Some(_)) => {
                    return Err("Session secret value and file are mutually exclusive".to_string());
                }
                _ => {}
            }
        }

        Ok(())
    }
}
