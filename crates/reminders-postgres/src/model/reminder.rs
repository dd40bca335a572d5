use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::reminders;

/// A reminder owned by a single user.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = reminders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Reminder {
    pub id: i32,
    /// Owning user.
    pub user_id: i32,
    pub name: String,
    pub status: String,
    pub description: String,
    pub category: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Free-form recurrence, e.g. `daily` or `weekly`.
    pub reminder_interval: String,
    /// Free-form end of the recurrence.
    pub reminder_end: String,
}

/// Data required to insert a [`Reminder`].
///
/// Timestamps are filled in by the database.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = reminders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewReminder {
    pub user_id: i32,
    pub name: String,
    pub status: String,
    pub description: String,
    pub category: String,
    pub reminder_interval: String,
    pub reminder_end: String,
}
