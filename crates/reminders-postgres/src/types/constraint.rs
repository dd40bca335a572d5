//! Named database constraints and the category of each.
//!
//! Constraint names come from the migrations; [`ConstraintViolation::new`]
//! turns the name Postgres reports back into a typed value.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Broad classes of constraint violations.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintCategory {
    /// Format or content checks.
    Validation,
    /// Unique keys.
    Uniqueness,
    /// Foreign keys.
    Reference,
}

/// Constraints of the `users` table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum UserConstraints {
    #[strum(serialize = "users_email_key")]
    EmailUnique,
    #[strum(serialize = "users_email_not_empty")]
    EmailNotEmpty,
}

impl UserConstraints {
    /// Parses a constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            Self::EmailUnique => ConstraintCategory::Uniqueness,
            Self::EmailNotEmpty => ConstraintCategory::Validation,
        }
    }
}

/// Constraints of the `reminders` table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum ReminderConstraints {
    #[strum(serialize = "reminders_user_id_fkey")]
    UserExists,
    #[strum(serialize = "reminders_name_not_empty")]
    NameNotEmpty,
}

impl ReminderConstraints {
    /// Parses a constraint name.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            Self::UserExists => ConstraintCategory::Reference,
            Self::NameNotEmpty => ConstraintCategory::Validation,
        }
    }
}

macro_rules! impl_string_conversions {
    ($($t:ty),+) => {$(
        impl From<$t> for String {
            #[inline]
            fn from(value: $t) -> Self {
                value.to_string()
            }
        }

        impl TryFrom<String> for $t {
            type Error = strum::ParseError;

            #[inline]
            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    )+};
}

impl_string_conversions!(UserConstraints, ReminderConstraints);

/// Any known constraint of the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    User(UserConstraints),
    Reminder(ReminderConstraints),
}

impl ConstraintViolation {
    /// Parses a constraint name reported by Postgres.
    ///
    /// ```
    /// use reminders_postgres::types::{ConstraintViolation, UserConstraints};
    ///
    /// let violation = ConstraintViolation::new("users_email_key");
    /// assert_eq!(violation, Some(ConstraintViolation::User(UserConstraints::EmailUnique)));
    /// assert!(ConstraintViolation::new("unknown_constraint").is_none());
    /// ```
    pub fn new(constraint: &str) -> Option<Self> {
        match constraint.split('_').next()? {
            "users" => UserConstraints::new(constraint).map(Self::User),
            "reminders" => ReminderConstraints::new(constraint).map(Self::Reminder),
            _ => None,
        }
    }

    /// Table the constraint belongs to.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::User(_) => "users",
            Self::Reminder(_) => "reminders",
        }
    }

    pub fn categorize(&self) -> ConstraintCategory {
        match self {
            Self::User(c) => c.categorize(),
            Self::Reminder(c) => c.categorize(),
        }
    }
}
