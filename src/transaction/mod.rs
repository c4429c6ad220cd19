//! Transactions: the model, the builder for unsaved transactions, and the
//! database functions for storing and querying them.

mod core;
mod query;

pub use self::core::{
    Transaction, TransactionBuilder, count_transactions, create_transaction,
    create_transaction_table, delete_transaction, get_all_transactions, get_transaction,
    update_transaction,
};
pub use query::{TransactionQuery, get_last_seven_days, get_month_transactions, query_transactions};
pub(crate) use query::year_month;
