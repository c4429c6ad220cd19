//! Expenses that repeat on a schedule, e.g. rent or a streaming subscription.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::RecurringExpenseId, format_currency};

/// An expense that repeats at a fixed frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringExpense {
    /// The ID of the recurring expense.
    pub id: RecurringExpenseId,
    /// The amount charged each time the expense recurs.
    pub amount: f64,
    /// How often the expense recurs.
    ///
    /// By convention one of "daily", "weekly", "monthly" or "yearly", but any
    /// text is accepted.
    pub frequency: String,
    /// The budget category, expected to match a category description.
    pub category: String,
    /// What the expense is for.
    pub description: String,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the expense was recorded, as set by the database.
    pub created_at: String,
}

impl Display for RecurringExpense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.description, format_currency(self.amount))
    }
}

/// A recurring expense that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecurringExpense {
    /// The amount charged each time the expense recurs.
    pub amount: f64,
    /// How often the expense recurs.
    pub frequency: String,
    /// The budget category.
    pub category: String,
    /// What the expense is for.
    pub description: String,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Create a recurring expense and return it with its generated ID and creation time.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn create_recurring_expense(
    expense: NewRecurringExpense,
    connection: &Connection,
) -> Result<RecurringExpense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO recurring_expense (amount, frequency, category, description, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, frequency, category, description, notes, created_at",
        )?
        .query_row(
            (
                expense.amount,
                expense.frequency,
                expense.category,
                expense.description,
                expense.notes,
            ),
            map_row,
        )?;

    Ok(expense)
}

/// Retrieve every recurring expense in the order they were created.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_all_recurring_expenses(
    connection: &Connection,
) -> Result<Vec<RecurringExpense>, Error> {
    connection
        .prepare(
            "SELECT id, amount, frequency, category, description, notes, created_at
             FROM recurring_expense ORDER BY id ASC",
        )?
        .query_map([], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Create the recurring expense table.
pub fn create_recurring_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS recurring_expense (
            id INTEGER PRIMARY KEY,
            amount REAL NOT NULL,
            frequency TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<RecurringExpense, rusqlite::Error> {
    Ok(RecurringExpense {
        id: row.get("id")?,
        amount: row.get("amount")?,
        frequency: row.get("frequency")?,
        category: row.get("category")?,
        description: row.get("description")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}
