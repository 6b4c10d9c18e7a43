use rusqlite::Connection;

use crate::{
    auth::PasswordHash,
    user::{User, create_user},
};

/// Insert a user to own test data. The database must have been initialized.
pub(crate) fn insert_test_user(connection: &Connection) -> User {
    insert_test_user_with_email(connection, "test@example.com")
}

pub(crate) fn insert_test_user_with_email(connection: &Connection, email: &str) -> User {
    create_user(
        "Test",
        email,
        PasswordHash::new_unchecked("hunter2"),
        connection,
    )
    .expect("Could not create test user")
}
