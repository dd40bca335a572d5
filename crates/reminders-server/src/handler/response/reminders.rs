//! Reminder response types.

use jiff::Timestamp;
use reminders_postgres::model;
use serde::{Deserialize, Serialize};

/// A reminder as returned to its owner.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub status: String,
    pub description: String,
    pub category: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub reminder_interval: String,
    pub reminder_end: String,
}

impl From<model::Reminder> for Reminder {
    fn from(reminder: model::Reminder) -> Self {
        Self {
            id: reminder.id,
            user_id: reminder.user_id,
            name: reminder.name,
            status: reminder.status,
            description: reminder.description,
            category: reminder.category,
            created_at: reminder.created_at.into(),
            updated_at: reminder.updated_at.into(),
            reminder_interval: reminder.reminder_interval,
            reminder_end: reminder.reminder_end,
        }
    }
}

/// Payload of a single-reminder response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderData {
    pub reminder: Reminder,
}

/// Payload of a reminder list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemindersData {
    pub reminders: Vec<Reminder>,
}

/// Envelope shared by every reminder endpoint: `{message, data}`.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderEnvelope<T> {
    /// Human-readable outcome.
    pub message: String,
    pub data: T,
}

impl ReminderEnvelope<ReminderData> {
    /// Wraps a freshly created reminder.
    pub fn created(reminder: impl Into<Reminder>) -> Self {
        Self {
            message: "Reminder created successfully".to_owned(),
            data: ReminderData {
                reminder: reminder.into(),
            },
        }
    }

    /// Wraps a single fetched reminder.
    pub fn retrieved(reminder: impl Into<Reminder>) -> Self {
        Self {
            message: "Reminder retrieved successfully".to_owned(),
            data: ReminderData {
                reminder: reminder.into(),
            },
        }
    }
}

impl ReminderEnvelope<RemindersData> {
    /// Wraps every reminder of the caller.
    pub fn listed(reminders: impl IntoIterator<Item = impl Into<Reminder>>) -> Self {
        Self {
            message: "Reminders retrieved successfully".to_owned(),
            data: RemindersData {
                reminders: reminders.into_iter().map(Into::into).collect(),
            },
        }
    }
}

/// Response for `POST /api/v1/reminders` and `GET /api/v1/reminders/{reminderId}`.
pub type ReminderResponse = ReminderEnvelope<ReminderData>;

/// Response for `GET /api/v1/reminders`.
pub type RemindersResponse = ReminderEnvelope<RemindersData>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reminder {
        Reminder {
            id: 3,
            user_id: 1,
            name: "Water plants".to_owned(),
            status: "active".to_owned(),
            description: "Balcony".to_owned(),
            category: "home".to_owned(),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
            reminder_interval: "daily".to_owned(),
            reminder_end: "never".to_owned(),
        }
    }

    #[test]
    fn single_reminder_envelope_shape() -> anyhow::Result<()> {
        let json = serde_json::to_value(ReminderResponse::retrieved(sample()))?;

        assert_eq!(json["message"], "Reminder retrieved successfully");
        assert_eq!(json["data"]["reminder"]["id"], 3);
        assert_eq!(json["data"]["reminder"]["reminder_interval"], "daily");
        Ok(())
    }

    #[test]
    fn list_envelope_shape() -> anyhow::Result<()> {
        let json = serde_json::to_value(RemindersResponse::listed(vec![sample(), sample()]))?;

        assert_eq!(json["message"], "Reminders retrieved successfully");
        assert_eq!(json["data"]["reminders"].as_array().map(Vec::len), Some(2));
        Ok(())
    }
}
