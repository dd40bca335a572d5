//! Supporting types shared by models and repositories.

mod constraint;

pub use self::constraint::{
    ConstraintCategory, ConstraintViolation, ReminderConstraints, UserConstraints,
};
