//! Sales transaction records: the append-only ledger of sold projects, each
//! created together with its first progress entry.

mod business_id;
mod core;
mod create_endpoint;
mod form;
mod list;
mod progress;

pub use business_id::generate_business_id;
pub use core::{
    PaymentStatus, Transaction, TransactionId, count_transactions, create_transaction_table,
    create_transaction_with_initial_progress,
};
pub use create_endpoint::{create_transaction_endpoint, get_new_transaction_page};
pub use form::TransactionForm;
pub use list::get_transactions_page;
pub use progress::{ProgressStatus, TransactionProgress, create_transaction_progress_table};
