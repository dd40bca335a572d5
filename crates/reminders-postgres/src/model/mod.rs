//! Diesel models mapped onto the `users` and `reminders` tables.

mod reminder;
mod user;

pub use self::reminder::{NewReminder, Reminder};
pub use self::user::{NewUser, User};
