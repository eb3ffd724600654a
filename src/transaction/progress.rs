//! Transaction progress entries: the stages a sold project moves through.

use rusqlite::{Connection, Row, types::Type};
use time::OffsetDateTime;

use crate::Error;

use super::core::TransactionId;

/// The stage a progress entry is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    /// Queued but not started.
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Finished.
    Done,
    /// Abandoned.
    Cancelled,
}

impl ProgressStatus {
    /// The token stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressStatus::Pending => "pending",
            ProgressStatus::InProgress => "in-progress",
            ProgressStatus::Done => "done",
            ProgressStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a stored token back into a status.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "pending" => Some(ProgressStatus::Pending),
            "in-progress" => Some(ProgressStatus::InProgress),
            "done" => Some(ProgressStatus::Done),
            "cancelled" => Some(ProgressStatus::Cancelled),
            _ => None,
        }
    }
}

/// One stage in the life of a transaction's project.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionProgress {
    /// The id of the progress entry.
    pub id: i64,
    /// The transaction this entry belongs to.
    pub transaction_id: TransactionId,
    /// A short name for the stage.
    pub title: String,
    /// What happened in this stage.
    pub description: String,
    /// The stage's status.
    pub status: ProgressStatus,
    /// The bucket-relative path of an illustrating image, if any.
    pub image: Option<String>,
    /// When the entry was created.
    pub created_at: OffsetDateTime,
}

/// Initialize the transaction progress table.
pub fn create_transaction_progress_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transaction_progress (
            id INTEGER PRIMARY KEY,
            transaction_id INTEGER NOT NULL REFERENCES \"transaction\"(id),
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            status TEXT NOT NULL,
            image TEXT,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_progress(row: &Row) -> Result<TransactionProgress, rusqlite::Error> {
    let status: String = row.get(4)?;
    let status = ProgressStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("unknown progress status '{status}'").into(),
        )
    })?;

    Ok(TransactionProgress {
        id: row.get(0)?,
        transaction_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status,
        image: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Insert a progress entry for `transaction_id`.
pub(crate) fn insert_transaction_progress(
    transaction_id: TransactionId,
    title: &str,
    description: &str,
    status: ProgressStatus,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO transaction_progress (transaction_id, title, description, status, image, created_at)
        VALUES (?1, ?2, ?3, ?4, NULL, ?5)",
        (
            transaction_id,
            title,
            description,
            status.as_str(),
            OffsetDateTime::now_utc(),
        ),
    )?;

    Ok(())
}

/// Retrieve every progress entry for a transaction, oldest first.
pub fn get_transaction_progress(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Vec<TransactionProgress>, Error> {
    connection
        .prepare(
            "SELECT id, transaction_id, title, description, status, image, created_at
            FROM transaction_progress WHERE transaction_id = ?1 ORDER BY created_at ASC, id ASC",
        )?
        .query_map([transaction_id], map_row_to_progress)?
        .map(|maybe_progress| maybe_progress.map_err(|error| error.into()))
        .collect()
}
