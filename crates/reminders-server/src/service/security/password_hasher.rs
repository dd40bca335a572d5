//! Argon2id password hashing and verification.
//!
//! Hashes are PHC strings (`$argon2id$v=19$...`) that embed the algorithm,
//! its parameters and a random salt, so they can be stored and verified
//! later without extra metadata. Both operations are CPU bound; async
//! callers should run them on the blocking pool.

use std::sync::Arc;

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::rngs::OsRng;

use crate::handler::{ErrorKind, Result};
use crate::utility::tracing_targets::PASSWORD_HASHER as TRACING_TARGET;

/// Password hashing service using Argon2id with default parameters.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Option<Arc<str>>,
}

impl PasswordHasher {
    /// Creates a new [`PasswordHasher`].
    ///
    /// Also hashes a random password once, which [`verify_dummy_password`]
    /// later checks against.
    ///
    /// [`verify_dummy_password`]: Self::verify_dummy_password
    pub fn new() -> Self {
        let mut hasher = Self {
            argon2: Argon2::default(),
            dummy_hash: None,
        };

        hasher.dummy_hash = hasher
            .hash_password(&Self::random_password())
            .ok()
            .map(Arc::from);

        hasher
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::InternalServerError` if salt generation or hashing
    /// fails. The password is never logged.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::try_from_rng(&mut OsRng).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to generate salt"
            );

            ErrorKind::InternalServerError
                .with_message("Password processing failed")
                .with_resource("authentication")
        })?;

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password hashing failed"
                );

                ErrorKind::InternalServerError
                    .with_message("Password processing failed")
                    .with_resource("authentication")
            })?;

        Ok(password_hash.to_string())
    }

    /// Returns `true` if `password` matches `stored_hash`.
    ///
    /// A hash that cannot be parsed, or any other verification error, yields
    /// `false` rather than an error.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(parsed_hash) => parsed_hash,
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %e,
                    "stored password hash is malformed"
                );
                return false;
            }
        };

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => true,
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "password does not match"
                );
                false
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "password verification failed"
                );
                false
            }
        }
    }

    /// Burns the same work as [`verify_password`] and returns `false`.
    ///
    /// Used when no account exists for the submitted email, so that a
    /// missing account and a wrong password take comparable time.
    ///
    /// [`verify_password`]: Self::verify_password
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        match self.dummy_hash.as_deref() {
            Some(dummy_hash) => {
                let _ = self.verify_password(password, dummy_hash);
            }
            None => {
                if let Ok(dummy_hash) = self.hash_password(&Self::random_password()) {
                    let _ = self.verify_password(password, &dummy_hash);
                }
            }
        }

        false
    }

    fn random_password() -> String {
        use rand::Rng;

        let password_len = rand::random_range(16..32);
        (0..password_len)
            .map(|_| rand::rng().sample(rand::distr::Alphanumeric) as char)
            .collect()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
