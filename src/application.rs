//! The application service: normalises user input and delegates to a [Repository].

use crate::{
    Error, PasswordHash, Repository, ValidatedPassword,
    category::{Category, CategorySpending, NewCategory},
    database_id::TransactionId,
    recurring_expense::{NewRecurringExpense, RecurringExpense},
    text::{title_case, trim_optional},
    transaction::{Transaction, TransactionBuilder, TransactionQuery},
    user::{NewUser, User},
};

/// Entry point for recording and listing finances.
///
/// Accepts plain strings and numbers, tidies them up (categories are
/// title-cased, free text is trimmed and blank optional text becomes `None`)
/// and hands the resulting records to the repository. No other validation is
/// done: dates, allocations and frequencies are stored as given, and
/// categories are not checked against the category table.
#[derive(Debug, Clone)]
pub struct Application<R> {
    repository: R,
    password_cost: u32,
}

impl<R> Application<R>
where
    R: Repository,
{
    /// Create an application that stores its records in `repository`.
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            password_cost: PasswordHash::DEFAULT_COST,
        }
    }

    /// Set the bcrypt cost used when hashing new passwords.
    ///
    /// Lower costs are faster and less secure, which is mostly useful in tests.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    /// The underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Record a new transaction.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn create_transaction(
        &self,
        amount: f64,
        date: &str,
        description: &str,
        category: &str,
        subcategory: Option<&str>,
        notes: Option<&str>,
    ) -> Result<Transaction, Error> {
        let builder =
            normalise_transaction(amount, date, description, category, subcategory, notes);
        let transaction = self.repository.create_transaction(builder)?;
        tracing::info!("Transaction added: {transaction}");

        Ok(transaction)
    }

    /// Replace the transaction with `id` with the given values.
    ///
    /// Returns the number of transactions changed, which is zero if `id` does
    /// not exist. Applying the same correction twice leaves the same state as
    /// applying it once.
    ///
    /// # Errors
    /// Returns any error from the repository.
    #[allow(clippy::too_many_arguments)]
    pub fn correct_transaction(
        &self,
        id: TransactionId,
        amount: f64,
        date: &str,
        description: &str,
        category: &str,
        subcategory: Option<&str>,
        notes: Option<&str>,
    ) -> Result<usize, Error> {
        let transaction =
            normalise_transaction(amount, date, description, category, subcategory, notes)
                .with_id(id);
        let rows_affected = self.repository.update_transaction(&transaction)?;

        if rows_affected == 0 {
            tracing::warn!("No transaction found with ID {id}, nothing was corrected");
        } else {
            tracing::info!("Transaction corrected: {transaction}");
        }

        Ok(rows_affected)
    }

    /// Get the transaction with `id`, if there is one.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn find_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        self.repository.read_transaction_by_id(id)
    }

    /// Delete the transaction with `id`, returning the number of transactions removed.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn delete_transaction(&self, id: TransactionId) -> Result<usize, Error> {
        let rows_affected = self.repository.delete_transaction(id)?;
        tracing::info!("Deleted {rows_affected} transaction(s) with ID {id}");

        Ok(rows_affected)
    }

    /// Get every transaction, most recent first.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn list_all_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.repository.read_all_transactions()
    }

    /// Get the transactions matching `query`.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn list_transactions_filtered(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>, Error> {
        self.repository.query_transactions(query)
    }

    /// Get this month's transactions.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn list_current_month(&self) -> Result<Vec<Transaction>, Error> {
        self.repository.read_current_month_transactions()
    }

    /// Get the transactions from the last seven days.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn list_last_seven_days(&self) -> Result<Vec<Transaction>, Error> {
        self.repository.read_last_seven_days()
    }

    /// Add a budget category.
    ///
    /// # Errors
    /// Returns [Error::DuplicateCategory] if the title-cased description is
    /// already used, or any other error from the repository.
    pub fn create_category(
        &self,
        description: &str,
        monthly_allocation: f64,
        notes: Option<&str>,
    ) -> Result<Category, Error> {
        let category = self.repository.create_category(NewCategory {
            description: title_case(description.trim()),
            monthly_allocation,
            notes: trim_optional(notes),
        })?;
        tracing::info!("Category added: {category}");

        Ok(category)
    }

    /// Get every category.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn list_categories(&self) -> Result<Vec<Category>, Error> {
        self.repository.read_all_categories()
    }

    /// Summarise this month's spending against each category's allocation.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn category_budget_summary(&self) -> Result<Vec<CategorySpending>, Error> {
        let today = self.repository.today()?;
        self.repository.read_category_spending(today)
    }

    /// Add a recurring expense.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn create_recurring_expense(
        &self,
        amount: f64,
        frequency: &str,
        category: &str,
        description: &str,
        notes: Option<&str>,
    ) -> Result<RecurringExpense, Error> {
        let expense = self
            .repository
            .create_recurring_expense(NewRecurringExpense {
                amount,
                frequency: frequency.trim().to_owned(),
                category: title_case(category.trim()),
                description: description.trim().to_owned(),
                notes: trim_optional(notes),
            })?;
        tracing::info!("Recurring expense added: {expense}");

        Ok(expense)
    }

    /// Get every recurring expense.
    ///
    /// # Errors
    /// Returns any error from the repository.
    pub fn list_all_recurring(&self) -> Result<Vec<RecurringExpense>, Error> {
        self.repository.read_all_recurring_expenses()
    }

    /// Register a user, storing only a salted hash of `password`.
    ///
    /// The password is not checked for strength here; interactive callers
    /// should use [ValidatedPassword::new] first.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the password could not be hashed,
    /// [Error::DuplicateUsername] if the username is taken, or any other error
    /// from the repository.
    pub fn create_user(&self, username: &str, password: &str) -> Result<User, Error> {
        let password_hash = PasswordHash::hash(
            &ValidatedPassword::new_unchecked(password),
            self.password_cost,
        )?;

        let user = self.repository.create_user(NewUser {
            username: username.trim().to_owned(),
            password_hash,
        })?;
        tracing::info!("User {} created with ID {}", user.username, user.id);

        Ok(user)
    }

    /// Check `password` against the stored hash for `username`.
    ///
    /// Returns `false` if the user does not exist.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the stored hash is malformed, or any
    /// error from the repository.
    pub fn verify_user(&self, username: &str, password: &str) -> Result<bool, Error> {
        let Some(user) = self.repository.read_user_by_username(username.trim())? else {
            tracing::debug!("Log in attempt for unknown user {username}");
            return Ok(false);
        };

        user.password_hash.verify(password)
    }
}

fn normalise_transaction(
    amount: f64,
    date: &str,
    description: &str,
    category: &str,
    subcategory: Option<&str>,
    notes: Option<&str>,
) -> TransactionBuilder {
    Transaction::build(
        amount,
        date.trim(),
        description.trim(),
        &title_case(category.trim()),
    )
    .subcategory(trim_optional(subcategory))
    .notes(trim_optional(notes))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::{
        Error, Repository, RepositoryConfig, SqliteRepository, Transaction, TransactionQuery,
    };

    use super::Application;

    fn get_test_app() -> (TempDir, Application<SqliteRepository>) {
        let dir = TempDir::new().expect("Could not create temp dir");
        let config = RepositoryConfig::new(dir.path().join("test.db"), "Etc/UTC");
        let repository = SqliteRepository::new(config).expect("Could not create repository");

        (dir, Application::new(repository).with_password_cost(4))
    }

    #[test]
    fn create_transaction_normalises_input() {
        let (_dir, app) = get_test_app();

        let transaction = app
            .create_transaction(
                -42.50,
                "2024-11-22",
                "  milk ",
                "groceries",
                Some(" dairy "),
                Some("   "),
            )
            .unwrap();

        assert_eq!(
            transaction,
            Transaction::build(-42.50, "2024-11-22", "milk", "Groceries")
                .subcategory(Some("dairy".to_owned()))
                .with_id(transaction.id)
        );
    }

    #[test]
    fn find_returns_created_transaction() {
        let (_dir, app) = get_test_app();
        let created = app
            .create_transaction(-42.50, "2024-11-22", "milk", "groceries", None, None)
            .unwrap();

        let found = app.find_transaction(created.id).unwrap().unwrap();

        assert_eq!(found.amount, -42.50);
        assert_eq!(found.date, "2024-11-22");
        assert_eq!(found.description, "milk");
        assert_eq!(found.category, "Groceries");
        assert_eq!(found.notes, None);
    }

    #[test]
    fn find_missing_transaction_is_none() {
        let (_dir, app) = get_test_app();

        assert_eq!(app.find_transaction(404), Ok(None));
    }

    #[test]
    fn correct_transaction_is_idempotent() {
        let (_dir, app) = get_test_app();
        let created = app
            .create_transaction(-10.0, "2024-11-22", "bus", "transport", None, None)
            .unwrap();

        let correct = || {
            app.correct_transaction(
                created.id,
                -12.0,
                "2024-11-21",
                "train",
                "public transport",
                None,
                Some("peak fare"),
            )
        };

        assert_eq!(correct(), Ok(1));
        let once = app.list_all_transactions().unwrap();
        assert_eq!(correct(), Ok(1));
        let twice = app.list_all_transactions().unwrap();

        assert_eq!(once, twice);
        assert_eq!(twice[0].category, "Public Transport");
        assert_eq!(twice[0].notes.as_deref(), Some("peak fare"));
    }

    #[test]
    fn correct_missing_transaction_changes_nothing() {
        let (_dir, app) = get_test_app();

        let rows_affected = app
            .correct_transaction(9, 1.0, "2024-11-21", "x", "misc", None, None)
            .unwrap();

        assert_eq!(rows_affected, 0);
        assert_eq!(app.list_all_transactions(), Ok(vec![]));
    }

    #[test]
    fn delete_then_find_is_none() {
        let (_dir, app) = get_test_app();
        let created = app
            .create_transaction(-5.0, "2024-11-22", "coffee", "eating out", None, None)
            .unwrap();

        assert_eq!(app.delete_transaction(created.id), Ok(1));
        assert_eq!(app.find_transaction(created.id), Ok(None));
    }

    #[test]
    fn filtered_list_matches_normalised_category() {
        let (_dir, app) = get_test_app();
        app.create_transaction(-5.0, "2024-11-22", "milk", "groceries", None, None)
            .unwrap();
        app.create_transaction(-2000.0, "2024-11-01", "rent", "rent", None, None)
            .unwrap();

        let query = TransactionQuery {
            category: Some("Groceries".to_owned()),
            ..Default::default()
        };
        let got = app.list_transactions_filtered(&query).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].description, "milk");
        assert_eq!(app.list_transactions_filtered(&TransactionQuery::default()).unwrap().len(), 2);
    }

    #[test]
    fn create_category_title_cases_description() {
        let (_dir, app) = get_test_app();

        let category = app.create_category("eating out", 150.0, None).unwrap();

        assert_eq!(category.description, "Eating Out");
        assert_eq!(app.list_categories(), Ok(vec![category]));
    }

    #[test]
    fn create_category_rejects_duplicate_after_normalising() {
        let (_dir, app) = get_test_app();
        app.create_category("Groceries", 600.0, None).unwrap();

        let result = app.create_category("GROCERIES", 500.0, None);

        assert_eq!(result, Err(Error::DuplicateCategory("Groceries".to_owned())));
    }

    #[test]
    fn budget_summary_covers_current_month() {
        let (_dir, app) = get_test_app();
        let today = app.repository().today().unwrap().to_string();
        app.create_category("groceries", 600.0, None).unwrap();
        app.create_transaction(-100.0, &today, "shop", "groceries", None, None)
            .unwrap();
        app.create_transaction(-1.0, "1999-01-01", "old", "groceries", None, None)
            .unwrap();

        let summary = app.category_budget_summary().unwrap();

        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total, -100.0);
        assert_eq!(summary[0].remaining(), 500.0);
    }

    #[test]
    fn list_current_month_and_last_seven_days_include_today() {
        let (_dir, app) = get_test_app();
        let today = app.repository().today().unwrap().to_string();
        let created = app
            .create_transaction(-3.0, &today, "coffee", "eating out", None, None)
            .unwrap();
        app.create_transaction(-3.0, "1999-01-01", "old coffee", "eating out", None, None)
            .unwrap();

        assert_eq!(app.list_current_month(), Ok(vec![created.clone()]));
        assert_eq!(app.list_last_seven_days(), Ok(vec![created]));
    }

    #[test]
    fn create_recurring_expense_title_cases_category() {
        let (_dir, app) = get_test_app();

        let expense = app
            .create_recurring_expense(-15.49, "monthly", "entertainment", " Netflix ", None)
            .unwrap();

        assert_eq!(expense.category, "Entertainment");
        assert_eq!(expense.description, "Netflix");
        assert_eq!(app.list_all_recurring(), Ok(vec![expense]));
    }

    #[test]
    fn create_user_stores_hash_not_plaintext() {
        let (_dir, app) = get_test_app();

        let user = app.create_user("alice", "correct horse battery").unwrap();

        assert_ne!(user.password_hash.as_ref(), "correct horse battery");
        assert!(app.verify_user("alice", "correct horse battery").unwrap());
        assert!(!app.verify_user("alice", "wrong").unwrap());
    }

    #[test]
    fn verify_unknown_user_is_false() {
        let (_dir, app) = get_test_app();

        assert_eq!(app.verify_user("nobody", "password"), Ok(false));
    }

    #[test]
    fn create_user_rejects_duplicate_username() {
        let (_dir, app) = get_test_app();
        app.create_user("alice", "one").unwrap();

        let result = app.create_user("alice", "two");

        assert_eq!(result, Err(Error::DuplicateUsername("alice".to_owned())));
    }
}
