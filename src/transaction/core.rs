//! The transaction model and database operations.

use rusqlite::{Connection, Row, TransactionBehavior, types::Type};
use time::{Date, OffsetDateTime};

use crate::{Error, customer::CustomerId, employee::EmployeeId};

use super::progress::{ProgressStatus, insert_transaction_progress};

/// The row id of a transaction.
pub type TransactionId = i64;

/// How many transactions to show per page.
pub const TRANSACTIONS_PER_PAGE: u64 = 5;

/// The title of the progress entry created alongside every transaction.
pub(crate) const INITIAL_PROGRESS_TITLE: &str = "Project Creation";

/// The description of the progress entry created alongside every transaction.
pub(crate) const INITIAL_PROGRESS_DESCRIPTION: &str = "Initial project stage created";

/// How much of the agreed price has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    /// Only the down payment has been received.
    Deposit,
    /// The full price has been received.
    Paid,
}

impl PaymentStatus {
    /// The token stored in the database and submitted by the form.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Deposit => "deposit",
            PaymentStatus::Paid => "paid",
        }
    }

    /// Parse a stored or submitted token back into a status.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "deposit" => Some(PaymentStatus::Deposit),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

/// A sold project: who bought it, who builds it, what was agreed and how it
/// was paid for. Transactions are append-only; there is no update or delete.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The id of the transaction.
    pub id: TransactionId,
    /// The human-readable business id, unique across all transactions.
    pub business_id: String,
    /// The name of the sold project.
    pub project_name: String,
    /// Optional notes about the agreement.
    pub description: Option<String>,
    /// The customer who bought the project.
    pub customer_id: CustomerId,
    /// The employee assigned to build it.
    pub employee_id: EmployeeId,
    /// The agreed delivery date.
    pub deadline: Date,
    /// The agreed price in whole rupiah.
    pub price: i64,
    /// How the customer paid, e.g. "Transfer".
    pub payment_method: String,
    /// How much of the price has been paid.
    pub status: PaymentStatus,
    /// The bucket-relative path of the stored payment proof.
    pub payment_proof: String,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

/// A transaction row joined with its customer and employee names, for
/// listing.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListing {
    /// The transaction itself.
    pub transaction: Transaction,
    /// The name of the referenced customer.
    pub customer_name: String,
    /// The name of the assigned employee.
    pub employee_name: String,
}

/// A transaction form that has passed validation, minus the payment proof
/// upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTransaction {
    pub(crate) project_name: String,
    pub(crate) description: Option<String>,
    pub(crate) customer_id: CustomerId,
    pub(crate) employee_id: EmployeeId,
    pub(crate) deadline: Date,
    pub(crate) price: i64,
    pub(crate) payment_method: String,
    pub(crate) status: PaymentStatus,
}

/// Initialize the transaction table.
///
/// The table name collides with the SQL keyword, so it is quoted everywhere.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            business_id TEXT NOT NULL UNIQUE,
            project_name TEXT NOT NULL,
            description TEXT,
            customer_id INTEGER NOT NULL REFERENCES customer(id),
            employee_id INTEGER NOT NULL REFERENCES employee(id),
            deadline TEXT NOT NULL,
            price INTEGER NOT NULL,
            payment_method TEXT NOT NULL,
            status TEXT NOT NULL,
            payment_proof TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let status: String = row.get(9)?;
    let status = PaymentStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            9,
            Type::Text,
            format!("unknown payment status '{status}'").into(),
        )
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        business_id: row.get(1)?,
        project_name: row.get(2)?,
        description: row.get(3)?,
        customer_id: row.get(4)?,
        employee_id: row.get(5)?,
        deadline: row.get(6)?,
        price: row.get(7)?,
        payment_method: row.get(8)?,
        status,
        payment_proof: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Insert a transaction and its initial progress entry as one atomic write.
///
/// The progress entry is fixed: title "Project Creation", description
/// "Initial project stage created", status "done". Either both rows are
/// committed or neither is.
///
/// # Errors
/// Returns [Error::DuplicateBusinessId] if another transaction carries
/// `business_id`, or [Error::InvalidForeignKey] if the customer or employee
/// does not exist.
pub fn create_transaction_with_initial_progress(
    transaction: ValidTransaction,
    business_id: &str,
    payment_proof_path: &str,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_at = OffsetDateTime::now_utc();

    let sql_transaction =
        rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Deferred)?;

    sql_transaction.execute(
        "INSERT INTO \"transaction\"
        (business_id, project_name, description, customer_id, employee_id, deadline, price,
        payment_method, status, payment_proof, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        (
            business_id,
            &transaction.project_name,
            &transaction.description,
            transaction.customer_id,
            transaction.employee_id,
            transaction.deadline,
            transaction.price,
            &transaction.payment_method,
            transaction.status.as_str(),
            payment_proof_path,
            created_at,
        ),
    )?;

    let id = sql_transaction.last_insert_rowid();

    insert_transaction_progress(
        id,
        INITIAL_PROGRESS_TITLE,
        INITIAL_PROGRESS_DESCRIPTION,
        ProgressStatus::Done,
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(Transaction {
        id,
        business_id: business_id.to_owned(),
        project_name: transaction.project_name,
        description: transaction.description,
        customer_id: transaction.customer_id,
        employee_id: transaction.employee_id,
        deadline: transaction.deadline,
        price: transaction.price,
        payment_method: transaction.payment_method,
        status: transaction.status,
        payment_proof: payment_proof_path.to_owned(),
        created_at,
    })
}

/// Retrieve a single transaction by id.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, business_id, project_name, description, customer_id, employee_id,
            deadline, price, payment_method, status, payment_proof, created_at
            FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_transaction)
        .map_err(|error| error.into())
}

/// The total number of transactions.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_one("SELECT COUNT(1) FROM \"transaction\"", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Retrieve one page of transactions joined with their customer and employee
/// names, newest first.
pub fn get_transactions_page(
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<TransactionListing>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.business_id, t.project_name, t.description, t.customer_id,
            t.employee_id, t.deadline, t.price, t.payment_method, t.status, t.payment_proof,
            t.created_at, c.name, e.name
            FROM \"transaction\" t
            JOIN customer c ON c.id = t.customer_id
            JOIN employee e ON e.id = t.employee_id
            ORDER BY t.created_at DESC, t.id DESC LIMIT ?1 OFFSET ?2",
        )?
        .query_map([limit, offset], |row| {
            Ok(TransactionListing {
                transaction: map_row_to_transaction(row)?,
                customer_name: row.get(12)?,
                employee_name: row.get(13)?,
            })
        })?
        .map(|maybe_listing| maybe_listing.map_err(|error| error.into()))
        .collect()
}
