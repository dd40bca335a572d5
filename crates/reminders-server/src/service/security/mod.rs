//! Credential hashing, session token signing and cookie policy.

mod cookie_policy;
mod password_hasher;
mod session_keys;

pub use cookie_policy::{CookiePolicy, SESSION_COOKIE_NAME};
pub use password_hasher::PasswordHasher;
pub use session_keys::{
    MIN_SECRET_LEN, SESSION_LIFETIME, SessionClaims, SessionKeys, SessionKeysConfig, TokenError,
};
