//! Reminder request types.

use reminders_postgres::model::NewReminder;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extract::Identity;

/// Request payload for creating a reminder.
///
/// The owner is never part of the body; it is taken from the caller's
/// [`Identity`].
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReminder {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 64))]
    pub status: String,
    #[validate(length(max = 4096))]
    pub description: String,
    #[validate(length(max = 64))]
    pub category: String,
    /// Free-form recurrence, e.g. `daily`.
    #[validate(length(max = 64))]
    pub reminder_interval: String,
    #[validate(length(max = 64))]
    pub reminder_end: String,
}

impl CreateReminder {
    /// Converts the request into a row owned by `identity`.
    pub fn into_model(self, identity: &Identity) -> NewReminder {
        NewReminder {
            user_id: identity.id,
            name: self.name,
            status: self.status,
            description: self.description,
            category: self.category,
            reminder_interval: self.reminder_interval,
            reminder_end: self.reminder_end,
        }
    }
}

/// Path parameters of `/api/v1/reminders/{reminderId}`.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPathParams {
    pub reminder_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_comes_from_identity() {
        let request = CreateReminder {
            name: "Water plants".to_owned(),
            status: "active".to_owned(),
            description: "Balcony".to_owned(),
            category: "home".to_owned(),
            reminder_interval: "daily".to_owned(),
            reminder_end: "never".to_owned(),
        };
        let identity = Identity {
            id: 7,
            email: "a@x.com".to_owned(),
            fname: "A".to_owned(),
            lname: "B".to_owned(),
        };

        let model = request.into_model(&identity);
        assert_eq!(model.user_id, 7);
        assert_eq!(model.name, "Water plants");
    }

    #[test]
    fn empty_name_is_rejected() {
        let request = CreateReminder {
            name: String::new(),
            status: String::new(),
            description: String::new(),
            category: String::new(),
            reminder_interval: String::new(),
            reminder_end: String::new(),
        };

        assert!(request.validate().is_err());
    }
}
