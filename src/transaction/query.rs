//! Filtered and date-relative transaction queries.

use rusqlite::{Connection, params_from_iter, types::Value};
use time::{Date, Duration};

use crate::Error;

use super::core::{TRANSACTION_COLUMNS, Transaction, map_transaction_row};

/// Defines which transactions [query_transactions] returns.
///
/// Every filter that is set and non-empty must match. Unset or empty filters
/// do not constrain the result, so the default query returns every transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Include transactions on or after this `YYYY-MM-DD` date.
    pub start_date: Option<String>,
    /// Include transactions on or before this `YYYY-MM-DD` date.
    pub end_date: Option<String>,
    /// Include transactions whose category equals this exactly.
    pub category: Option<String>,
    /// Include transactions whose description contains this text, ignoring ASCII case.
    pub description_contains: Option<String>,
}

fn non_empty(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|value| !value.is_empty())
}

/// Get the transactions matching every filter in `query`, most recent first.
///
/// Dates are compared as text, so they must be in `YYYY-MM-DD` form for the
/// range to behave like a calendar range.
///
/// # Errors
/// Returns [Error::SqlError] if the query could not be run.
pub fn query_transactions(
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut where_clause_parts = vec![];
    let mut query_parameters = vec![];

    if let Some(start_date) = non_empty(&query.start_date) {
        query_parameters.push(Value::Text(start_date.to_owned()));
        where_clause_parts.push(format!("date >= ?{}", query_parameters.len()));
    }

    if let Some(end_date) = non_empty(&query.end_date) {
        query_parameters.push(Value::Text(end_date.to_owned()));
        where_clause_parts.push(format!("date <= ?{}", query_parameters.len()));
    }

    if let Some(category) = non_empty(&query.category) {
        query_parameters.push(Value::Text(category.to_owned()));
        where_clause_parts.push(format!("category = ?{}", query_parameters.len()));
    }

    if let Some(text) = non_empty(&query.description_contains) {
        query_parameters.push(Value::Text(text.to_owned()));
        where_clause_parts.push(format!(
            "instr(lower(description), lower(?{})) > 0",
            query_parameters.len()
        ));
    }

    let mut query_string = format!("SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"");

    if !where_clause_parts.is_empty() {
        query_string.push_str(" WHERE ");
        query_string.push_str(&where_clause_parts.join(" AND "));
    }

    query_string.push_str(" ORDER BY date DESC, id ASC");

    connection
        .prepare(&query_string)?
        .query_map(params_from_iter(query_parameters.iter()), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get the transactions dated from seven days before `today` up to and including `today`.
///
/// # Errors
/// Returns [Error::SqlError] if the query could not be run.
pub fn get_last_seven_days(today: Date, connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let query = TransactionQuery {
        start_date: Some((today - Duration::days(7)).to_string()),
        end_date: Some(today.to_string()),
        ..Default::default()
    };

    query_transactions(&query, connection)
}

/// Get the transactions in the same calendar month as `today`, most recent first.
///
/// # Errors
/// Returns [Error::SqlError] if the query could not be run.
pub fn get_month_transactions(
    today: Date,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE substr(date, 1, 7) = ?1
             ORDER BY date DESC, id ASC"
        ))?
        .query_map([year_month(today)], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Format the month of `date` as `YYYY-MM`.
pub(crate) fn year_month(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}
