//! Database initialization for the application's SQLite schema.

use rusqlite::Connection;

use crate::{
    category_service::create_category_service_table,
    customer::create_customer_table,
    employee::create_employee_table,
    payment_proof::create_payment_proof_table,
    project::create_project_table,
    testimonial::create_testimonial_table,
    transaction::{create_transaction_progress_table, create_transaction_table},
    user::create_user_table,
};

/// Create the application's tables if they do not exist.
///
/// Tables are created inside a single exclusive transaction so a partially
/// initialized schema is never observed.
///
/// # Errors
/// Returns an error if any table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    // The pragma is a no-op inside a transaction, so set it first.
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = rusqlite::Transaction::new_unchecked(
        connection,
        rusqlite::TransactionBehavior::Exclusive,
    )?;

    create_category_service_table(&transaction)?;
    create_customer_table(&transaction)?;
    create_employee_table(&transaction)?;
    create_project_table(&transaction)?;
    create_payment_proof_table(&transaction)?;
    create_testimonial_table(&transaction)?;
    create_user_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_transaction_progress_table(&transaction)?;

    transaction.commit()
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize schema");

        let table_count: i64 = connection
            .query_one(
                "SELECT COUNT(1) FROM sqlite_master WHERE type = 'table' AND name IN (
                    'category_service', 'customer', 'employee', 'project', 'payment_proof',
                    'testimonial', 'user', 'transaction', 'transaction_progress'
                )",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 9);
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("Could not initialize schema");
        initialize(&connection).expect("Initializing twice should not fail");
    }
}
