//! The user account model, validation and database operations.

use rusqlite::{Connection, Row};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    forms::{FieldErrors, require_text},
};

use super::password::{PasswordHash, ValidatedPassword};

/// The row id of a user.
pub type UserId = i64;

/// How many users to show per page.
pub const USERS_PER_PAGE: u64 = 5;

/// Someone who can sign in to the back office.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The id of the user.
    pub id: UserId,
    /// The user's display name.
    pub name: String,
    /// The user's email address. Unique across all users.
    pub email: String,
    /// The user's bcrypt password hash.
    pub password_hash: PasswordHash,
    /// When the account was created.
    pub created_at: OffsetDateTime,
}

/// The name and email fields shared by the create and update forms.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidUserProfile {
    pub(crate) name: String,
    pub(crate) email: String,
}

/// The form data for updating a user's name and email.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserForm {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
}

impl UpdateUserForm {
    /// Validate the form, producing field-keyed errors on failure.
    pub fn validate(&self) -> Result<ValidUserProfile, FieldErrors> {
        let mut errors = FieldErrors::new();

        let profile = validate_profile(&mut errors, &self.name, &self.email);

        match profile {
            Some(profile) if errors.is_empty() => Ok(profile),
            _ => Err(errors),
        }
    }
}

/// The form data for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserForm {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The plain-text password, validated for strength then hashed.
    pub password: String,
}

impl CreateUserForm {
    /// Validate the form. The password is checked for strength here; hashing
    /// is left to the caller.
    pub fn validate(&self) -> Result<(ValidUserProfile, ValidatedPassword), FieldErrors> {
        let mut errors = FieldErrors::new();

        let profile = validate_profile(&mut errors, &self.name, &self.email);

        let password = if self.password.is_empty() {
            errors.push("password", "the password field is required");
            None
        } else {
            match ValidatedPassword::new(&self.password) {
                Ok(password) => Some(password),
                Err(Error::TooWeak(feedback)) => {
                    errors.push("password", feedback);
                    None
                }
                Err(_) => {
                    errors.push("password", "the password could not be validated");
                    None
                }
            }
        };

        match (profile, password) {
            (Some(profile), Some(password)) if errors.is_empty() => Ok((profile, password)),
            _ => Err(errors),
        }
    }
}

fn validate_profile(
    errors: &mut FieldErrors,
    name: &str,
    email: &str,
) -> Option<ValidUserProfile> {
    let name = require_text(errors, "name", name, 255);
    let email = require_email(errors, email);

    match (name, email) {
        (Some(name), Some(email)) => Some(ValidUserProfile { name, email }),
        _ => None,
    }
}

/// Validate an email address, recording errors against the `email` field.
///
/// Only checks the rough shape (a local part, an @, and a domain with a dot).
/// Anything stricter rejects valid addresses.
fn require_email(errors: &mut FieldErrors, value: &str) -> Option<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        errors.push("email", "the email field is required");
        return None;
    }

    let is_well_formed = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };

    if !is_well_formed || trimmed.chars().count() > 255 {
        errors.push("email", "must be a valid email address");
        return None;
    }

    Some(trimmed.to_lowercase())
}

/// Initialize the user table.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub(crate) fn map_row_to_user(row: &Row) -> Result<User, rusqlite::Error> {
    let raw_password_hash: String = row.get(3)?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        created_at: row.get(4)?,
    })
}

/// Create a user and return it with its generated id.
///
/// # Errors
/// Returns [Error::DuplicateEmail] if the email address is already in use.
pub fn create_user(
    profile: ValidUserProfile,
    password_hash: PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO user (name, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
        (
            &profile.name,
            &profile.email,
            password_hash.as_ref(),
            created_at,
        ),
    )?;

    Ok(User {
        id: connection.last_insert_rowid(),
        name: profile.name,
        email: profile.email,
        password_hash,
        created_at,
    })
}

/// Retrieve a single user by id.
pub fn get_user(id: UserId, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row_to_user)
        .map_err(|error| error.into())
}

/// Retrieve a single user by email address.
pub fn get_user_by_email(email: &str, connection: &Connection) -> Result<User, Error> {
    connection
        .prepare("SELECT id, name, email, password, created_at FROM user WHERE email = :email")?
        .query_row(&[(":email", &email)], map_row_to_user)
        .map_err(|error| error.into())
}

/// The total number of users.
pub fn count_users(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_one("SELECT COUNT(1) FROM user", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Retrieve one page of users, newest first.
pub fn get_users_page(
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<User>, Error> {
    connection
        .prepare(
            "SELECT id, name, email, password, created_at FROM user
            ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?
        .query_map([limit, offset], map_row_to_user)?
        .map(|maybe_user| maybe_user.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a user's name and email. The password is left untouched.
///
/// # Errors
/// Returns [Error::DuplicateEmail] if another user already has the email, or
/// [Error::UpdateMissingUser] if the user doesn't exist.
pub fn update_user(
    id: UserId,
    profile: ValidUserProfile,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE user SET name = ?1, email = ?2 WHERE id = ?3",
        (&profile.name, &profile.email, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingUser);
    }

    Ok(())
}

/// Delete a user by id. Returns an error if the user doesn't exist.
pub fn delete_user(id: UserId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM user WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingUser);
    }

    Ok(())
}

#[cfg(test)]
mod user_form_tests {
    use super::{CreateUserForm, UpdateUserForm};

    #[test]
    fn validate_rejects_malformed_emails() {
        for email in ["not-an-email", "missing@domain", "@nolocal.com", ""] {
            let form = UpdateUserForm {
                name: "Admin".to_owned(),
                email: email.to_owned(),
            };

            let errors = form
                .validate()
                .expect_err("malformed email should not validate");

            assert_eq!(errors.entries()[0].0, "email");
        }
    }

    #[test]
    fn validate_lowercases_email() {
        let form = UpdateUserForm {
            name: "Admin".to_owned(),
            email: "Admin@Example.COM".to_owned(),
        };

        let profile = form.validate().expect("form should validate");
        assert_eq!(profile.email, "admin@example.com");
    }

    #[test]
    fn validate_rejects_weak_password() {
        let form = CreateUserForm {
            name: "Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            password: "password1234".to_owned(),
        };

        let errors = form
            .validate()
            .expect_err("weak password should not validate");

        assert_eq!(errors.entries()[0].0, "password");
    }

    #[test]
    fn validate_accepts_complete_form() {
        let form = CreateUserForm {
            name: "Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            password: "anadequatelystrongpassword1".to_owned(),
        };

        assert!(form.validate().is_ok());
    }
}
