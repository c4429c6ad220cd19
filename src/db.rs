//! Opening the database file and creating the application's tables.

use std::path::Path;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    category::create_category_table, recurring_expense::create_recurring_expense_table,
    transaction::create_transaction_table, user::create_user_table,
};

/// Open a connection to the SQLite database at `path`, creating the file if needed.
///
/// # Errors
/// Returns an error if the file cannot be opened as a SQLite database.
pub fn open(path: &Path) -> Result<Connection, rusqlite::Error> {
    let connection = Connection::open(path)?;
    // Wait for other writers instead of failing straight away.
    connection.busy_timeout(std::time::Duration::from_secs(5))?;

    Ok(connection)
}

/// Create the tables for the domain models.
///
/// Tables that already exist are left untouched, so this is safe to call on
/// every start up.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_recurring_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;
    use crate::transaction::{Transaction, create_transaction, delete_transaction};

    fn table_names(connection: &Connection) -> Vec<String> {
        connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name != 'sqlite_sequence' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn initialize_creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert_eq!(
            table_names(&connection),
            ["category", "recurring_expense", "transaction", "user"]
        );
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert_eq!(initialize(&connection), Ok(()));
    }

    #[test]
    fn initialize_keeps_one_sequence_row_per_table() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let first = create_transaction(
            Transaction::build(-1.0, "2024-01-01", "first", "Misc"),
            &connection,
        )
        .unwrap();
        let second = create_transaction(
            Transaction::build(-2.0, "2024-01-02", "second", "Misc"),
            &connection,
        )
        .unwrap();
        delete_transaction(second.id, &connection).unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();
        let third = create_transaction(
            Transaction::build(-3.0, "2024-01-03", "third", "Misc"),
            &connection,
        )
        .unwrap();

        let sequence_rows: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_sequence WHERE name = 'transaction'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(sequence_rows, 1);
        assert_eq!((first.id, second.id, third.id), (1, 2, 3));
    }
}
