//! Session authentication.
//!
//! Protected routes resolve the caller in three steps:
//!
//! 1. [`SessionToken`] finds the token in the `token` cookie, or else in an
//!    `Authorization: Bearer` header.
//! 2. [`SessionKeys::extract_payload`] verifies the token and returns its
//!    payload.
//! 3. The payload is decoded into an [`Identity`], which is cached in the
//!    request extensions for the handler.
//!
//! Any failure along the way rejects with the same `401` body. The reason
//! is logged at debug level under the `reminders_server::authentication`
//! target. No database access is involved.
//!
//! [`SessionKeys::extract_payload`]: crate::service::SessionKeys::extract_payload

mod identity;
mod session_token;

pub use self::identity::Identity;
pub use self::session_token::{SessionToken, TokenSource};
