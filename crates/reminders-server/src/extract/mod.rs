//! Request extractors.
//!
//! - [`Identity`] resolves the caller from the session token and rejects
//!   the request with `401` if that fails.
//! - [`SessionToken`] locates the raw token (cookie first, then bearer).
//! - [`Json`], [`ValidateJson`] and [`Path`] wrap their axum counterparts
//!   and turn rejections into the crate's JSON error responses.

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{Identity, SessionToken, TokenSource};
pub use crate::extract::reject::{Json, Path, ValidateJson};
