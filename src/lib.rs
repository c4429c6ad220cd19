//! Ledgerly is a small library for tracking personal finances.
//!
//! Transactions, budget categories, recurring expenses and users are stored in
//! a single SQLite file. The [Application] normalises user input and hands
//! records to a [Repository], which owns every read and write against the
//! database.
//!
//! ```no_run
//! use ledgerly::{Application, RepositoryConfig, SqliteRepository};
//!
//! # fn main() -> Result<(), ledgerly::Error> {
//! let config = RepositoryConfig::new("transactions.db", "Pacific/Auckland");
//! let app = Application::new(SqliteRepository::new(config)?);
//!
//! let transaction = app.create_transaction(-42.50, "2024-11-22", "milk", "groceries", None, None)?;
//! assert_eq!(transaction.category, "Groceries");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod application;
mod category;
mod currency;
mod database_id;
mod db;
mod logging;
mod password;
mod recurring_expense;
mod repository;
mod text;
mod timezone;
mod transaction;
mod user;

pub use application::Application;
pub use category::{Category, CategorySpending, NewCategory};
pub use currency::format_currency;
pub use database_id::{CategoryId, DatabaseId, RecurringExpenseId, TransactionId, UserId};
pub use db::{initialize as initialize_db, open as open_db};
pub use logging::setup_logging;
pub use password::{PasswordHash, ValidatedPassword};
pub use recurring_expense::{NewRecurringExpense, RecurringExpense};
pub use repository::{Repository, RepositoryConfig, SqliteRepository};
pub use text::title_case;
pub use transaction::{Transaction, TransactionBuilder, TransactionQuery};
pub use user::{NewUser, User};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging. Callers should
    /// not show it to end users.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The username is already taken by another user.
    #[error("the username \"{0}\" already exists in the database")]
    DuplicateUsername(String),

    /// A category with the same description already exists.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategory(String),

    /// The canonical timezone string does not name a known timezone.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

/// Whether `error` is a failed UNIQUE constraint on `column`, e.g. "user.username".
pub(crate) fn is_unique_violation(error: &rusqlite::Error, column: &str) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            Some(desc),
        ) if desc.ends_with(column)
    )
}
