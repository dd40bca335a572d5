//! Database errors and constraint violations as HTTP errors.

use reminders_postgres::PgError;
use reminders_postgres::types::{ConstraintViolation, ReminderConstraints, UserConstraints};

use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "reminders_server::postgres";

impl From<UserConstraints> for Error<'static> {
    fn from(c: UserConstraints) -> Self {
        let error = match c {
            UserConstraints::EmailUnique => {
                ErrorKind::Conflict.with_message("An account with this email already exists")
            }
            UserConstraints::EmailNotEmpty => {
                ErrorKind::BadRequest.with_message("Email cannot be empty")
            }
        };

        error.with_resource("user")
    }
}

impl From<ReminderConstraints> for Error<'static> {
    fn from(c: ReminderConstraints) -> Self {
        let error = match c {
            ReminderConstraints::UserExists => {
                ErrorKind::NotFound.with_message("Owner of the reminder does not exist")
            }
            ReminderConstraints::NameNotEmpty => {
                ErrorKind::BadRequest.with_message("Reminder name cannot be empty")
            }
        };

        error.with_resource("reminder")
    }
}

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::User(c) => c.into(),
            ConstraintViolation::Reminder(c) => c.into(),
        }
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        if let Some(constraint) = error.constraint_violation() {
            tracing::debug!(
                target: TRACING_TARGET,
                table = constraint.table_name(),
                error = %error,
                "constraint violation"
            );
            return constraint.into();
        }

        match error {
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout"
                );
                ErrorKind::ServiceUnavailable.into_error()
            }
            PgError::Connection(ref connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::ServiceUnavailable.into_error()
            }
            other => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %other,
                    "database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}
