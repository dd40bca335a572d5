//! Application state and dependency injection.

mod config;
mod security;

use reminders_postgres::PgClient;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::security::{
    CookiePolicy, MIN_SECRET_LEN, PasswordHasher, SESSION_COOKIE_NAME, SESSION_LIFETIME,
    SessionClaims, SessionKeys, SessionKeysConfig, TokenError,
};
pub use crate::{Error, Result};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    // External services:
    pub postgres: PgClient,

    // Internal services:
    pub password_hasher: PasswordHasher,
    pub session_keys: SessionKeys,
    pub cookie_policy: CookiePolicy,
}

impl ServiceState {
    /// Assembles state from already constructed services.
    pub fn new(postgres: PgClient, session_keys: SessionKeys, cookie_policy: CookiePolicy) -> Self {
        Self {
            postgres,
            password_hasher: PasswordHasher::new(),
            session_keys,
            cookie_policy,
        }
    }

    /// Initializes application state from configuration.
    ///
    /// Loads the session secret first so a bad secret fails startup before
    /// the database is touched, then connects and migrates.
    pub async fn from_config(service_config: &ServiceConfig) -> Result<Self> {
        let session_keys = service_config.load_session_keys().await?;
        let postgres = service_config.connect_postgres().await?;

        Ok(Self::new(
            postgres,
            session_keys,
            service_config.cookie_policy(),
        ))
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(postgres: PgClient);

// Internal services:
impl_di!(password_hasher: PasswordHasher);
impl_di!(session_keys: SessionKeys);
impl_di!(cookie_policy: CookiePolicy);
