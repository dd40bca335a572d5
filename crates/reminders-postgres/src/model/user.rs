use diesel::prelude::*;

use crate::schema::users;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    /// Numeric identifier, also carried in session tokens.
    pub id: i32,
    /// Login email, stored lowercased.
    pub email: String,
    /// Argon2 hash in PHC string format.
    #[diesel(column_name = pass)]
    pub password_hash: String,
    /// First name.
    pub fname: String,
    /// Last name.
    pub lname: String,
}

/// Data required to insert a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewUser {
    pub email: String,
    #[diesel(column_name = pass)]
    pub password_hash: String,
    pub fname: String,
    pub lname: String,
}
