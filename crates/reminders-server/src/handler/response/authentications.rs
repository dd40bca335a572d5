//! Authentication response types.

use serde::{Deserialize, Serialize};

/// Response returned after a successful login or registration.
///
/// The session token itself travels in the `Set-Cookie` header only.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEmail {
    /// Email address of the account.
    pub email: String,
}

impl AccountEmail {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}
