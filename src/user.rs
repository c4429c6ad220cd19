//! Code for creating the user table and fetching users from the database.

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash, database_id::UserId, is_unique_violation};

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    /// The unique name the user logs in with.
    pub username: String,
    /// The user's password hash.
    pub password_hash: PasswordHash,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new user into the database.
///
/// # Errors
///
/// Returns a [Error::DuplicateUsername] if the username is taken, or a
/// [Error::SqlError] if some other SQL related error occurred.
pub fn create_user(user: NewUser, connection: &Connection) -> Result<User, Error> {
    connection
        .execute(
            "INSERT INTO user (username, password) VALUES (?1, ?2)",
            (&user.username, user.password_hash.as_ref()),
        )
        .map_err(|error| {
            if is_unique_violation(&error, "user.username") {
                Error::DuplicateUsername(user.username.clone())
            } else {
                error.into()
            }
        })?;

    let id = connection.last_insert_rowid();

    Ok(User {
        id,
        username: user.username,
        password_hash: user.password_hash,
    })
}

/// Get the user whose username is exactly `username`.
///
/// Returns `Ok(None)` if no such user exists.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_username(username: &str, connection: &Connection) -> Result<Option<User>, Error> {
    let user = connection
        .prepare("SELECT id, username, password FROM user WHERE username = :username")?
        .query_row(&[(":username", username)], |row| {
            let raw_password_hash: String = row.get("password")?;

            Ok(User {
                id: row.get("id")?,
                username: row.get("username")?,
                password_hash: PasswordHash::from_stored(&raw_password_hash),
            })
        })
        .optional()?;

    Ok(user)
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{Error, PasswordHash};

    use super::{NewUser, create_user, create_user_table, get_user_by_username};

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_user_table(&conn).expect("Could not create user table");

        conn
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_owned(),
            password_hash: PasswordHash::from_stored("hunter2"),
        }
    }

    #[test]
    fn insert_user_succeeds() {
        let db_connection = get_db_connection();

        let inserted_user = create_user(new_user("alice"), &db_connection).unwrap();

        assert!(inserted_user.id > 0);
        assert_eq!(inserted_user.username, "alice");
        assert_eq!(
            inserted_user.password_hash,
            PasswordHash::from_stored("hunter2")
        );
    }

    #[test]
    fn insert_user_fails_on_duplicate_username() {
        let db_connection = get_db_connection();
        create_user(new_user("alice"), &db_connection).unwrap();

        let result = create_user(new_user("alice"), &db_connection);

        assert_eq!(result, Err(Error::DuplicateUsername("alice".to_owned())));
    }

    #[test]
    fn get_user_returns_none_for_unknown_username() {
        let db_connection = get_db_connection();

        assert_eq!(get_user_by_username("bob", &db_connection), Ok(None));
    }

    #[test]
    fn get_user_succeeds_with_existing_username() {
        let db_connection = get_db_connection();
        let test_user = create_user(new_user("alice"), &db_connection).unwrap();

        let retrieved_user = get_user_by_username("alice", &db_connection).unwrap();

        assert_eq!(retrieved_user, Some(test_user));
    }
}
