//! Reminder persistence.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::model::{NewReminder, Reminder};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Repository for the `reminders` table.
pub trait ReminderRepository {
    /// Inserts a reminder and returns the stored row.
    fn create_reminder(
        &mut self,
        new_reminder: NewReminder,
    ) -> impl Future<Output = PgResult<Reminder>> + Send;

    /// Finds a reminder by id, restricted to the given owner.
    ///
    /// Returns `None` both when the reminder does not exist and when it
    /// belongs to someone else.
    fn find_user_reminder(
        &mut self,
        user_id: i32,
        reminder_id: i32,
    ) -> impl Future<Output = PgResult<Option<Reminder>>> + Send;

    /// Lists the reminders of a user, newest first.
    fn list_user_reminders(
        &mut self,
        user_id: i32,
    ) -> impl Future<Output = PgResult<Vec<Reminder>>> + Send;
}

impl ReminderRepository for PgConnection {
    async fn create_reminder(&mut self, new_reminder: NewReminder) -> PgResult<Reminder> {
        use schema::reminders;

        let reminder = diesel::insert_into(reminders::table)
            .values(&new_reminder)
            .returning(Reminder::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            reminder_id = reminder.id,
            user_id = reminder.user_id,
            "inserted reminder"
        );

        Ok(reminder)
    }

    async fn find_user_reminder(
        &mut self,
        user_id: i32,
        reminder_id: i32,
    ) -> PgResult<Option<Reminder>> {
        use schema::reminders::{self, dsl};

        reminders::table
            .filter(dsl::id.eq(reminder_id))
            .filter(dsl::user_id.eq(user_id))
            .select(Reminder::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_user_reminders(&mut self, user_id: i32) -> PgResult<Vec<Reminder>> {
        use schema::reminders::{self, dsl};

        reminders::table
            .filter(dsl::user_id.eq(user_id))
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .select(Reminder::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
