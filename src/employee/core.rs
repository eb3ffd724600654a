//! The employee model, validation and database operations.

use rusqlite::{Connection, Row};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    forms::{FieldErrors, require_text},
};

/// The row id of an employee.
pub type EmployeeId = i64;

/// How many employees to show per page.
pub const EMPLOYEES_PER_PAGE: u64 = 5;

/// A worker who can be assigned to transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    /// The id of the employee.
    pub id: EmployeeId,
    /// The employee's display name.
    pub name: String,
    /// A contact phone number.
    pub phone_number: String,
    /// When the employee was registered.
    pub created_at: OffsetDateTime,
}

/// The form data for creating or updating an employee.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeeForm {
    /// The employee's display name.
    pub name: String,
    /// A contact phone number.
    pub phone_number: String,
}

/// An employee form that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEmployee {
    pub(crate) name: String,
    pub(crate) phone_number: String,
}

impl EmployeeForm {
    /// Validate the form, producing field-keyed errors on failure.
    pub fn validate(&self) -> Result<ValidEmployee, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = require_text(&mut errors, "name", &self.name, 255);
        let phone_number = require_text(&mut errors, "phone_number", &self.phone_number, 20);

        match (name, phone_number) {
            (Some(name), Some(phone_number)) if errors.is_empty() => Ok(ValidEmployee {
                name,
                phone_number,
            }),
            _ => Err(errors),
        }
    }
}

/// Initialize the employee table.
pub fn create_employee_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS employee (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            phone_number TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub(crate) fn map_row_to_employee(row: &Row) -> Result<Employee, rusqlite::Error> {
    Ok(Employee {
        id: row.get(0)?,
        name: row.get(1)?,
        phone_number: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Create an employee and return it with its generated id.
pub fn create_employee(employee: ValidEmployee, connection: &Connection) -> Result<Employee, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO employee (name, phone_number, created_at) VALUES (?1, ?2, ?3)",
        (&employee.name, &employee.phone_number, created_at),
    )?;

    Ok(Employee {
        id: connection.last_insert_rowid(),
        name: employee.name,
        phone_number: employee.phone_number,
        created_at,
    })
}

/// Retrieve a single employee by id.
pub fn get_employee(id: EmployeeId, connection: &Connection) -> Result<Employee, Error> {
    connection
        .prepare("SELECT id, name, phone_number, created_at FROM employee WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row_to_employee)
        .map_err(|error| error.into())
}

/// Whether an employee with `id` exists.
pub fn employee_exists(id: EmployeeId, connection: &Connection) -> Result<bool, Error> {
    let count: i64 = connection.query_one(
        "SELECT COUNT(1) FROM employee WHERE id = ?1",
        [id],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// All employee ids and names, ordered by name, for selection lists.
pub fn list_employee_names(connection: &Connection) -> Result<Vec<(EmployeeId, String)>, Error> {
    connection
        .prepare("SELECT id, name FROM employee ORDER BY name")?
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_name| maybe_name.map_err(|error| error.into()))
        .collect()
}

/// The total number of employees.
pub fn count_employees(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_one("SELECT COUNT(1) FROM employee", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Retrieve one page of employees, newest first.
pub fn get_employees_page(
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Employee>, Error> {
    connection
        .prepare(
            "SELECT id, name, phone_number, created_at FROM employee
            ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?
        .query_map([limit, offset], map_row_to_employee)?
        .map(|maybe_employee| maybe_employee.map_err(|error| error.into()))
        .collect()
}

/// Overwrite an employee's fields. Returns an error if the employee doesn't exist.
pub fn update_employee(
    id: EmployeeId,
    employee: ValidEmployee,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE employee SET name = ?1, phone_number = ?2 WHERE id = ?3",
        (&employee.name, &employee.phone_number, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingEmployee);
    }

    Ok(())
}

/// Delete an employee by id. Returns an error if the employee doesn't exist.
pub fn delete_employee(id: EmployeeId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM employee WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingEmployee);
    }

    Ok(())
}

#[cfg(test)]
mod employee_form_tests {
    use super::EmployeeForm;

    #[test]
    fn validate_rejects_blank_fields() {
        let form = EmployeeForm {
            name: "  ".to_owned(),
            phone_number: "".to_owned(),
        };

        let errors = form.validate().expect_err("blank form should not validate");

        let fields: Vec<&str> = errors.entries().iter().map(|(field, _)| *field).collect();
        assert_eq!(fields, ["name", "phone_number"]);
    }

    #[test]
    fn validate_accepts_complete_form() {
        let form = EmployeeForm {
            name: "Siti Rahma".to_owned(),
            phone_number: "082112345678".to_owned(),
        };

        let valid = form.validate().expect("form should validate");
        assert_eq!(valid.name, "Siti Rahma");
        assert_eq!(valid.phone_number, "082112345678");
    }
}
