//! Tracing targets used for log filtering, e.g.
//! `RUST_LOG=reminders_server::authentication=debug`.

/// Session token extraction and identity resolution.
pub const AUTHENTICATION: &str = "reminders_server::authentication";

/// Password hashing and verification.
pub const PASSWORD_HASHER: &str = "reminders_server::password_hasher";

/// Session token signing and verification.
pub const SESSION_KEYS: &str = "reminders_server::session_keys";

/// Handler-level failures that are turned into error responses.
pub const HANDLER: &str = "reminders_server::handler";

/// Middleware errors such as timeouts.
pub const RECOVERY_ERROR: &str = "reminders_server::recovery::error";

/// Panics caught while handling a request.
pub const RECOVERY_PANIC: &str = "reminders_server::recovery::panic";
