//! Code for creating the user table and fetching and updating users in the database.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, auth::PasswordHash};

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application with their profile fields.
///
/// The profile fields (`name`, `monthly_income`, `target_savings`, `bio` and
/// `picture`) start out with their defaults at registration and are edited
/// through the profile page. `monthly_income` feeds the savings-rate estimate
/// on the insights page when it is greater than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The email address the user logs in with. Unique across users.
    pub email: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
    /// The user's display name.
    pub name: String,
    /// Self-reported monthly income. Zero means "not set".
    pub monthly_income: f64,
    /// The amount the user aims to save each month. Zero means "not set".
    pub target_savings: f64,
    /// A short free-text blurb.
    pub bio: String,
    /// File name of the uploaded profile picture, if any.
    pub picture: Option<String>,
}

/// The profile fields that can be edited through the profile page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub monthly_income: f64,
    pub target_savings: f64,
    pub bio: String,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                name TEXT NOT NULL DEFAULT '',
                monthly_income REAL NOT NULL DEFAULT 0,
                target_savings REAL NOT NULL DEFAULT 0,
                bio TEXT NOT NULL DEFAULT '',
                picture TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns an [Error::DuplicateEmail] if the email address is already
/// registered, or an [Error::SqlError] if another SQL related error occurred.
pub fn create_user(
    name: &str,
    email: &str,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (email, password, name) VALUES (?1, ?2, ?3)",
        (email, password_hash.as_ref(), name),
    )?;

    let id = UserId::new(connection.last_insert_rowid());

    Ok(User {
        id,
        email: email.to_owned(),
        password_hash,
        name: name.to_owned(),
        monthly_income: 0.0,
        target_savings: 0.0,
        bio: String::new(),
        picture: None,
    })
}

const USER_COLUMNS: &str =
    "id, email, password, name, monthly_income, target_savings, bio, picture";

fn map_user_row(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let email = row.get(1)?;
    let raw_password_hash: String = row.get(2)?;

    Ok(User {
        id: UserId::new(raw_id),
        email,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        name: row.get(3)?,
        monthly_income: row.get(4)?,
        target_savings: row.get(5)?,
        bio: row.get(6)?,
        picture: row.get(7)?,
    })
}

/// Get the user from the database with an ID equal to `user_id`.
///
/// # Errors
///
/// This function will return an error if:
/// - `user_id` does not belong to a registered user.
/// - there was an error trying to access the database.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
        .query_row(&[(":id", &user_id.as_i64())], map_user_row)
        .map_err(|error| error.into())
}

/// Get the user from the database with an email address equal to `email`.
///
/// # Errors
///
/// This function will return an error if:
/// - `email` does not belong to a registered user.
/// - there was an error trying to access the database.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE email = :email"))?
        .query_row(&[(":email", &email)], map_user_row)
        .map_err(|error| error.into())
}

/// Overwrite the profile fields of the user `user_id`.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered
/// user, an [Error::DuplicateEmail] if the new email belongs to another user,
/// or an [Error::SqlError] if another SQL related error occurred.
pub fn update_profile(
    user_id: UserId,
    profile: &ProfileUpdate,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user
         SET name = ?1, email = ?2, monthly_income = ?3, target_savings = ?4, bio = ?5
         WHERE id = ?6",
        (
            &profile.name,
            &profile.email,
            profile.monthly_income,
            profile.target_savings,
            &profile.bio,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Record the file name of the user's uploaded profile picture.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` does not belong to a registered
/// user, or an [Error::SqlError] if an SQL related error occurred.
pub fn set_profile_picture(
    user_id: UserId,
    file_name: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET picture = ?1 WHERE id = ?2",
        (file_name, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::PasswordHash,
        user::{ProfileUpdate, UserId, create_user, get_user_by_email, get_user_by_id,
            set_profile_picture, update_profile,
        },
    };

    use super::create_user_table;

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        let inserted_user =
            create_user("Alice", "foo@bar.baz", password_hash.clone(), &db_connection).unwrap();

        assert!(inserted_user.id.as_i64() > 0);
        assert_eq!(inserted_user.email, "foo@bar.baz");
        assert_eq!(inserted_user.name, "Alice");
        assert_eq!(inserted_user.password_hash, password_hash);
        assert_eq!(inserted_user.monthly_income, 0.0);
        assert_eq!(inserted_user.picture, None);
    }

    #[test]
    fn insert_user_fails_on_duplicate_email() {
        let db_connection = get_db_connection();
        let password_hash = PasswordHash::new_unchecked("hunter2");

        create_user("Alice", "foo@bar.baz", password_hash.clone(), &db_connection).unwrap();
        let duplicate = create_user("Bob", "foo@bar.baz", password_hash, &db_connection);

        assert_eq!(duplicate, Err(Error::DuplicateEmail));
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let id = UserId::new(42);

        assert_eq!(get_user_by_id(id, &db_connection), Err(Error::NotFound));
    }

    #[test]
    fn get_user_by_email_succeeds() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Alice",
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let retrieved_user = get_user_by_email("foo@bar.baz", &db_connection).unwrap();

        assert_eq!(retrieved_user, test_user);
    }

    #[test]
    fn update_profile_overwrites_fields() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Alice",
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        let profile = ProfileUpdate {
            name: "Alice B".to_owned(),
            email: "alice@example.com".to_owned(),
            monthly_income: 4200.0,
            target_savings: 800.0,
            bio: "Saving for a house.".to_owned(),
        };
        update_profile(test_user.id, &profile, &db_connection).unwrap();

        let updated = get_user_by_id(test_user.id, &db_connection).unwrap();
        assert_eq!(updated.name, "Alice B");
        assert_eq!(updated.email, "alice@example.com");
        assert_eq!(updated.monthly_income, 4200.0);
        assert_eq!(updated.target_savings, 800.0);
        assert_eq!(updated.bio, "Saving for a house.");
    }

    #[test]
    fn update_profile_fails_with_non_existent_id() {
        let db_connection = get_db_connection();

        let profile = ProfileUpdate {
            name: String::new(),
            email: "missing@example.com".to_owned(),
            monthly_income: 0.0,
            target_savings: 0.0,
            bio: String::new(),
        };
        let result = update_profile(UserId::new(42), &profile, &db_connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn set_profile_picture_stores_file_name() {
        let db_connection = get_db_connection();
        let test_user = create_user(
            "Alice",
            "foo@bar.baz",
            PasswordHash::new_unchecked("hunter2"),
            &db_connection,
        )
        .unwrap();

        set_profile_picture(test_user.id, "user_1.png", &db_connection).unwrap();

        let updated = get_user_by_id(test_user.id, &db_connection).unwrap();
        assert_eq!(updated.picture, Some("user_1.png".to_owned()));
    }
}
