//! Request types for HTTP handlers.

mod authentications;
mod reminders;

pub use authentications::*;
pub use reminders::*;
