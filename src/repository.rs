//! The persistence boundary: every read and write of the application goes
//! through a [Repository].

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    category::{self, Category, CategorySpending, NewCategory},
    database_id::TransactionId,
    db,
    recurring_expense::{self, NewRecurringExpense, RecurringExpense},
    timezone::local_today,
    transaction::{self, Transaction, TransactionBuilder, TransactionQuery},
    user::{self, NewUser, User},
};

/// Stores and retrieves the application's records.
///
/// Lookups by ID return `Ok(None)` when nothing matches. Updates and deletes
/// return the number of affected rows, which is zero when nothing matches;
/// callers that need confirmation must check it.
pub trait Repository {
    /// Store a new transaction and return it with its assigned ID.
    fn create_transaction(&self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Get every transaction, most recent first.
    fn read_all_transactions(&self) -> Result<Vec<Transaction>, Error>;

    /// Get the transaction with `id`, if there is one.
    fn read_transaction_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, Error>;

    /// Replace every field of the stored transaction with the same ID.
    fn update_transaction(&self, transaction: &Transaction) -> Result<usize, Error>;

    /// Delete the transaction with `id`.
    fn delete_transaction(&self, id: TransactionId) -> Result<usize, Error>;

    /// Get the transactions matching every non-empty filter in `query`.
    fn query_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error>;

    /// Get the transactions dated from seven days ago up to today, most recent first.
    fn read_last_seven_days(&self) -> Result<Vec<Transaction>, Error>;

    /// Get this month's transactions, most recent first.
    fn read_current_month_transactions(&self) -> Result<Vec<Transaction>, Error>;

    /// Get the number of stored transactions.
    fn count_transactions(&self) -> Result<u32, Error>;

    /// Store a new category.
    fn create_category(&self, category: NewCategory) -> Result<Category, Error>;

    /// Get every category, ordered by description.
    fn read_all_categories(&self) -> Result<Vec<Category>, Error>;

    /// Summarise spending per category for the month containing `month`.
    fn read_category_spending(&self, month: Date) -> Result<Vec<CategorySpending>, Error>;

    /// Store a new recurring expense.
    fn create_recurring_expense(
        &self,
        expense: NewRecurringExpense,
    ) -> Result<RecurringExpense, Error>;

    /// Get every recurring expense.
    fn read_all_recurring_expenses(&self) -> Result<Vec<RecurringExpense>, Error>;

    /// Store a new user.
    fn create_user(&self, user: NewUser) -> Result<User, Error>;

    /// Get the user with `username`, if there is one.
    fn read_user_by_username(&self, username: &str) -> Result<Option<User>, Error>;

    /// Today's date, used for the date-relative reads.
    fn today(&self) -> Result<Date, Error>;
}

/// Where the database lives and which timezone "today" is in.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryConfig {
    /// File path to the SQLite database.
    pub db_path: PathBuf,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl RepositoryConfig {
    /// Create a new config.
    pub fn new(db_path: impl Into<PathBuf>, local_timezone: &str) -> Self {
        Self {
            db_path: db_path.into(),
            local_timezone: local_timezone.to_owned(),
        }
    }
}

/// A [Repository] backed by a SQLite database file.
///
/// Each call opens its own connection and drops it before returning, so the
/// repository holds no connection between calls.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    config: RepositoryConfig,
}

impl SqliteRepository {
    /// Create a repository for the database described by `config`, creating
    /// the file and its tables if they do not exist.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezone] if the timezone is unknown, or
    /// [Error::SqlError] if the database could not be opened or initialised.
    pub fn new(config: RepositoryConfig) -> Result<Self, Error> {
        if local_today(&config.local_timezone).is_none() {
            return Err(Error::InvalidTimezone(config.local_timezone));
        }

        let connection = db::open(&config.db_path)?;
        db::initialize(&connection)?;
        tracing::debug!("Initialised database at {:?}", config.db_path);

        Ok(Self { config })
    }

    /// The path of the database file.
    pub fn db_path(&self) -> &Path {
        &self.config.db_path
    }

    fn connect(&self) -> Result<Connection, Error> {
        db::open(&self.config.db_path).map_err(Error::from)
    }

    /// Get the transactions dated from seven days before `today` up to and including `today`.
    pub fn read_last_seven_days_as_of(&self, today: Date) -> Result<Vec<Transaction>, Error> {
        transaction::get_last_seven_days(today, &self.connect()?)
    }

    /// Get the transactions in the same month as `today`.
    pub fn read_month_transactions_as_of(&self, today: Date) -> Result<Vec<Transaction>, Error> {
        transaction::get_month_transactions(today, &self.connect()?)
    }
}

impl Repository for SqliteRepository {
    fn create_transaction(&self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let transaction = transaction::create_transaction(builder, &self.connect()?)?;
        tracing::debug!("Inserted transaction {}", transaction.id);

        Ok(transaction)
    }

    fn read_all_transactions(&self) -> Result<Vec<Transaction>, Error> {
        transaction::get_all_transactions(&self.connect()?)
    }

    fn read_transaction_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        transaction::get_transaction(id, &self.connect()?)
    }

    fn update_transaction(&self, transaction: &Transaction) -> Result<usize, Error> {
        let rows_affected = transaction::update_transaction(transaction, &self.connect()?)?;

        if rows_affected == 0 {
            tracing::debug!("Update of transaction {} matched no rows", transaction.id);
        }

        Ok(rows_affected)
    }

    fn delete_transaction(&self, id: TransactionId) -> Result<usize, Error> {
        let rows_affected = transaction::delete_transaction(id, &self.connect()?)?;

        if rows_affected == 0 {
            tracing::debug!("Delete of transaction {id} matched no rows");
        }

        Ok(rows_affected)
    }

    fn query_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, Error> {
        transaction::query_transactions(query, &self.connect()?)
    }

    fn read_last_seven_days(&self) -> Result<Vec<Transaction>, Error> {
        self.read_last_seven_days_as_of(self.today()?)
    }

    fn read_current_month_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.read_month_transactions_as_of(self.today()?)
    }

    fn count_transactions(&self) -> Result<u32, Error> {
        transaction::count_transactions(&self.connect()?)
    }

    fn create_category(&self, new_category: NewCategory) -> Result<Category, Error> {
        let category = category::create_category(new_category, &self.connect()?)?;
        tracing::debug!("Inserted category {}", category.id);

        Ok(category)
    }

    fn read_all_categories(&self) -> Result<Vec<Category>, Error> {
        category::get_all_categories(&self.connect()?)
    }

    fn read_category_spending(&self, month: Date) -> Result<Vec<CategorySpending>, Error> {
        category::get_category_spending(month, &self.connect()?)
    }

    fn create_recurring_expense(
        &self,
        expense: NewRecurringExpense,
    ) -> Result<RecurringExpense, Error> {
        let expense = recurring_expense::create_recurring_expense(expense, &self.connect()?)?;
        tracing::debug!("Inserted recurring expense {}", expense.id);

        Ok(expense)
    }

    fn read_all_recurring_expenses(&self) -> Result<Vec<RecurringExpense>, Error> {
        recurring_expense::get_all_recurring_expenses(&self.connect()?)
    }

    fn create_user(&self, new_user: NewUser) -> Result<User, Error> {
        let user = user::create_user(new_user, &self.connect()?)?;
        tracing::debug!("Inserted user {}", user.id);

        Ok(user)
    }

    fn read_user_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        user::get_user_by_username(username, &self.connect()?)
    }

    fn today(&self) -> Result<Date, Error> {
        local_today(&self.config.local_timezone)
            .ok_or_else(|| Error::InvalidTimezone(self.config.local_timezone.clone()))
    }
}
