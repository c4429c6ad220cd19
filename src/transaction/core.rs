//! Defines the core data model and database queries for transactions.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::TransactionId, format_currency};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database.
    pub id: TransactionId,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// When the transaction happened, as a `YYYY-MM-DD` string.
    pub date: String,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The budget category, e.g. "Groceries". Matches a category description by convention.
    pub category: String,
    /// An optional finer grained category, e.g. "Dairy".
    pub subcategory: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: &str, description: &str, category: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date: date.to_owned(),
            description: description.to_owned(),
            category: category.to_owned(),
            subcategory: None,
            notes: None,
        }
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} {} ({}): {}",
            self.id,
            self.date,
            self.description,
            self.category,
            format_currency(self.amount)
        )
    }
}

/// A transaction that has not been stored yet and so has no ID.
///
/// # Examples
///
/// ```
/// use ledgerly::Transaction;
///
/// let builder = Transaction::build(-45.99, "2025-01-15", "Coffee shop purchase", "Eating Out")
///     .notes(Some("with Sam".to_owned()));
///
/// assert_eq!(builder.notes.as_deref(), Some("with Sam"));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income, negative values represent expenses.
    pub amount: f64,

    /// The date when the transaction occurred.
    ///
    /// Stored as given. Range queries compare dates as text, so this should be
    /// in `YYYY-MM-DD` form.
    pub date: String,

    /// A human-readable description of the transaction.
    pub description: String,

    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category: String,

    /// An optional finer grained category.
    pub subcategory: Option<String>,

    /// Free-form notes.
    pub notes: Option<String>,
}

impl TransactionBuilder {
    /// Set the subcategory for the transaction.
    pub fn subcategory(mut self, subcategory: Option<String>) -> Self {
        self.subcategory = subcategory;
        self
    }

    /// Set the notes for the transaction.
    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    /// Attach an existing ID, e.g. to replace a stored transaction.
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            amount: self.amount,
            date: self.date,
            description: self.description,
            category: self.category,
            subcategory: self.subcategory,
            notes: self.notes,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

pub(super) const TRANSACTION_COLUMNS: &str =
    "id, amount, date, description, category, subcategory, notes";

/// Create a new transaction in the database from a builder.
///
/// Identical transactions are allowed, each insert gets a fresh ID.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (amount, date, description, category, subcategory, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.amount,
                builder.date,
                builder.description,
                builder.category,
                builder.subcategory,
                builder.notes,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// Returns `Ok(None)` if there is no transaction with that ID.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)
        .optional()?;

    Ok(transaction)
}

/// Retrieve every transaction, most recent first.
///
/// Transactions on the same date are ordered by ID to keep the order stable after updates.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY date DESC, id ASC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Replace every field of the stored transaction with the same ID as `transaction`.
///
/// Returns the number of rows affected, which is zero if no transaction has that ID.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn update_transaction(transaction: &Transaction, connection: &Connection) -> Result<usize, Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET amount = ?1, date = ?2, description = ?3, category = ?4, subcategory = ?5, notes = ?6
         WHERE id = ?7",
        (
            transaction.amount,
            &transaction.date,
            &transaction.description,
            &transaction.category,
            &transaction.subcategory,
            &transaction.notes,
            transaction.id,
        ),
    )?;

    Ok(rows_affected)
}

/// Delete the transaction with `id`.
///
/// Returns the number of rows affected, which is zero if no transaction has that ID.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<usize, Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    Ok(rows_affected)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                subcategory TEXT,
                notes TEXT
                )",
        (),
    )?;

    // Used by the date range and monthly summary queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_category ON \"transaction\"(date, category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction by column name.
pub(crate) fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get("id")?,
        amount: row.get("amount")?,
        date: row.get("date")?,
        description: row.get("description")?,
        category: row.get("category")?,
        subcategory: row.get("subcategory")?,
        notes: row.get("notes")?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
