//! The customer model, validation and database operations.

use rusqlite::{Connection, Row};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    forms::{FieldErrors, require_text},
};

/// The row id of a customer.
pub type CustomerId = i64;

/// How many customers to show per page.
pub const CUSTOMERS_PER_PAGE: u64 = 5;

/// A person or business the studio does work for.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// The id of the customer.
    pub id: CustomerId,
    /// The customer's display name.
    pub name: String,
    /// A contact phone number.
    pub phone_number: String,
    /// When the customer was registered.
    pub created_at: OffsetDateTime,
}

/// The form data for creating or updating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerForm {
    /// The customer's display name.
    pub name: String,
    /// A contact phone number.
    pub phone_number: String,
}

/// A customer form that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCustomer {
    pub(crate) name: String,
    pub(crate) phone_number: String,
}

impl CustomerForm {
    /// Validate the form, producing field-keyed errors on failure.
    pub fn validate(&self) -> Result<ValidCustomer, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = require_text(&mut errors, "name", &self.name, 255);
        let phone_number = require_text(&mut errors, "phone_number", &self.phone_number, 20);

        match (name, phone_number) {
            (Some(name), Some(phone_number)) if errors.is_empty() => Ok(ValidCustomer {
                name,
                phone_number,
            }),
            _ => Err(errors),
        }
    }
}

/// Initialize the customer table.
pub fn create_customer_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS customer (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub(crate) fn map_row_to_customer(row: &Row) -> Result<Customer, rusqlite::Error> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        phone_number: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Create a customer and return it with its generated id.
pub fn create_customer(customer: ValidCustomer, connection: &Connection) -> Result<Customer, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO customer (name, phone_number, created_at) VALUES (?1, ?2, ?3)",
        (&customer.name, &customer.phone_number, created_at),
    )?;

    Ok(Customer {
        id: connection.last_insert_rowid(),
        name: customer.name,
        phone_number: customer.phone_number,
        created_at,
    })
}

/// Retrieve a single customer by id.
pub fn get_customer(id: CustomerId, connection: &Connection) -> Result<Customer, Error> {
    connection
        .prepare("SELECT id, name, phone_number, created_at FROM customer WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row_to_customer)
        .map_err(|error| error.into())
}

/// Whether a customer with `id` exists.
pub fn customer_exists(id: CustomerId, connection: &Connection) -> Result<bool, Error> {
    let count: i64 = connection.query_one(
        "SELECT COUNT(1) FROM customer WHERE id = ?1",
        [id],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// All customer ids and names, ordered by name, for selection lists.
pub fn list_customer_names(connection: &Connection) -> Result<Vec<(CustomerId, String)>, Error> {
    connection
        .prepare("SELECT id, name FROM customer ORDER BY name")?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_name| maybe_name.map_err(|error| error.into()))
        .collect()
}

/// The total number of customers.
pub fn count_customers(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_one("SELECT COUNT(1) FROM customer", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Retrieve one page of customers, newest first.
pub fn get_customers_page(
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Customer>, Error> {
    connection
        .prepare(
            "SELECT id, name, phone_number, created_at FROM customer
            ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?
        .query_map([limit, offset], map_row_to_customer)?
        .map(|maybe_customer| maybe_customer.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a customer's fields. Returns an error if the customer doesn't exist.
pub fn update_customer(
    id: CustomerId,
    customer: ValidCustomer,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE customer SET name = ?1, phone_number = ?2 WHERE id = ?3",
        (&customer.name, &customer.phone_number, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCustomer);
    }

    Ok(())
}

/// Delete a customer by id. Returns an error if the customer doesn't exist.
pub fn delete_customer(id: CustomerId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM customer WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCustomer);
    }

    Ok(())
}
