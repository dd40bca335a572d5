//! Repository traits implemented for [`PgConnection`].
//!
//! [`PgConnection`]: crate::PgConnection

mod reminder;
mod user;

pub use self::reminder::ReminderRepository;
pub use self::user::UserRepository;
