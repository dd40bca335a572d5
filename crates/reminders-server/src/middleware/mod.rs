//! Middleware for `axum::Router` and HTTP request processing.
//!
//! ```rust,no_run
//! use axum::Router;
//! use reminders_server::middleware::{
//!     CorsConfig, RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt,
//!     RouterSecurityExt, SecurityHeadersConfig,
//! };
//!
//! let app: Router = Router::new()
//!     .with_security(&CorsConfig::default(), &SecurityHeadersConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod authentication;
mod observability;
mod recovery;
mod security;

pub use authentication::{RouterAuthExt, require_authentication};
pub use observability::{RouterObservabilityExt, log_request_timing};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, DEFAULT_MAX_BODY_SIZE, FrameOptions, ReferrerPolicy, RouterSecurityExt,
    SecurityHeadersConfig,
};
