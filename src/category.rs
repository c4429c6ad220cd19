//! Budget categories and the monthly spending summary built on them.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, database_id::CategoryId, format_currency, is_unique_violation,
    transaction::year_month,
};

/// A budget category, e.g. "Groceries" with $600 allocated per month.
///
/// The description is unique and is matched against [Transaction::category](crate::Transaction::category)
/// when summarising spending. No foreign key ties the two together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub description: String,
    /// How much money is budgeted for this category each month.
    pub monthly_allocation: f64,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}",
            self.description,
            format_currency(self.monthly_allocation)
        )
    }
}

/// A category that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    /// The display name of the category.
    pub description: String,
    /// How much money is budgeted for this category each month.
    pub monthly_allocation: f64,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// How much of a category's monthly allocation has been used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    /// The category being summarised.
    pub category: Category,
    /// The sum of the month's transaction amounts in this category.
    ///
    /// Expenses are negative, so a category with only expenses has a negative total.
    pub total: f64,
}

impl CategorySpending {
    /// The allocation left over after this month's transactions.
    pub fn remaining(&self) -> f64 {
        self.category.monthly_allocation + self.total
    }
}

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateCategory] if a category with the same description
/// exists, or [Error::SqlError] for any other SQL error.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (description, monthly_allocation, notes)
             VALUES (?1, ?2, ?3)
             RETURNING id, description, monthly_allocation, notes",
        )?
        .query_row(
            (
                &category.description,
                category.monthly_allocation,
                &category.notes,
            ),
            map_row,
        )
        .map_err(|error| {
            if is_unique_violation(&error, "category.description") {
                Error::DuplicateCategory(category.description.clone())
            } else {
                error.into()
            }
        })
}

/// Retrieve all categories ordered alphabetically by description.
///
/// # Errors
/// Returns [Error::SqlError] if the query could not be run.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, description, monthly_allocation, notes FROM category ORDER BY description ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Summarise spending per category for the calendar month containing `month`.
///
/// Every category is included, with a total of zero if it has no transactions
/// that month. Transactions whose category matches no category are left out.
///
/// # Errors
/// Returns [Error::SqlError] if the query could not be run.
pub fn get_category_spending(
    month: Date,
    connection: &Connection,
) -> Result<Vec<CategorySpending>, Error> {
    connection
        .prepare(
            "SELECT category.id AS id, category.description AS description,
                category.monthly_allocation AS monthly_allocation, category.notes AS notes,
                COALESCE(SUM(\"transaction\".amount), 0.0) AS total
             FROM category
             LEFT JOIN \"transaction\"
                ON \"transaction\".category = category.description
                AND substr(\"transaction\".date, 1, 7) = ?1
             GROUP BY category.id
             ORDER BY category.description ASC",
        )?
        .query_map([year_month(month)], |row| {
            Ok(CategorySpending {
                category: map_row(row)?,
                total: row.get("total")?,
            })
        })?
        .map(|maybe_spending| maybe_spending.map_err(Error::from))
        .collect()
}

/// Create the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL UNIQUE,
            monthly_allocation REAL NOT NULL,
            notes TEXT
        )",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get("id")?,
        description: row.get("description")?,
        monthly_allocation: row.get("monthly_allocation")?,
        notes: row.get("notes")?,
    })
}
