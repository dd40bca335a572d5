//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Login {
    /// Email address of the account.
    #[validate(email)]
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    /// Password of the account.
    #[validate(length(min = 1, max = 1000))]
    pub pass: String,
}

/// Request payload for registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Register {
    /// Email address of the new account.
    #[validate(email)]
    #[validate(length(min = 3, max = 254))]
    pub email: String,

    /// Password of the new account.
    #[validate(length(min = 8, max = 128))]
    pub pass: String,

    /// First name.
    #[validate(length(min = 1, max = 64))]
    pub fname: String,

    /// Last name.
    #[validate(length(min = 1, max = 64))]
    pub lname: String,
}
