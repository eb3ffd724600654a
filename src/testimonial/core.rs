//! The testimonial model, validation and database operations.

use rusqlite::{Connection, Row};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    forms::{FieldErrors, require_text},
};

/// The row id of a testimonial.
pub type TestimonialId = i64;

/// How many testimonials to show per page.
pub const TESTIMONIALS_PER_PAGE: u64 = 5;

/// A customer's written feedback with a star rating.
#[derive(Debug, Clone, PartialEq)]
pub struct Testimonial {
    /// The id of the testimonial.
    pub id: TestimonialId,
    /// The name of the customer who gave the feedback.
    pub customer_name: String,
    /// The feedback text.
    pub description: String,
    /// A star rating between 1 and 5 inclusive.
    pub rating: i64,
    /// When the testimonial was recorded.
    pub created_at: OffsetDateTime,
}

/// The form data for creating or updating a testimonial.
#[derive(Debug, Clone, Deserialize)]
pub struct TestimonialForm {
    /// The name of the customer who gave the feedback.
    pub customer_name: String,
    /// The feedback text.
    pub description: String,
    /// The star rating as submitted.
    pub rating: String,
}

/// A testimonial form that has passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTestimonial {
    pub(crate) customer_name: String,
    pub(crate) description: String,
    pub(crate) rating: i64,
}

impl TestimonialForm {
    /// Validate the form, producing field-keyed errors on failure.
    pub fn validate(&self) -> Result<ValidTestimonial, FieldErrors> {
        let mut errors = FieldErrors::new();

        let customer_name = require_text(&mut errors, "customer_name", &self.customer_name, 255);
        let description = require_text(&mut errors, "description", &self.description, 65535);
        let rating = require_rating(&mut errors, &self.rating);

        match (customer_name, description, rating) {
            (Some(customer_name), Some(description), Some(rating)) if errors.is_empty() => {
                Ok(ValidTestimonial {
                    customer_name,
                    description,
                    rating,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Parse and range-check a star rating, recording errors against the `rating` field.
fn require_rating(errors: &mut FieldErrors, value: &str) -> Option<i64> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        errors.push("rating", "the rating field is required");
        return None;
    }

    match trimmed.parse::<i64>() {
        Ok(rating) if (1..=5).contains(&rating) => Some(rating),
        Ok(_) => {
            errors.push("rating", "must be between 1 and 5");
            None
        }
        Err(_) => {
            errors.push("rating", "must be a whole number");
            None
        }
    }
}

/// Initialize the testimonial table.
pub fn create_testimonial_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS testimonial (
            id INTEGER PRIMARY KEY,
            customer_name TEXT NOT NULL,
            description TEXT NOT NULL,
            rating INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub(crate) fn map_row_to_testimonial(row: &Row) -> Result<Testimonial, rusqlite::Error> {
    Ok(Testimonial {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        description: row.get(2)?,
        rating: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Create a testimonial and return it with its generated id.
pub fn create_testimonial(
    testimonial: ValidTestimonial,
    connection: &Connection,
) -> Result<Testimonial, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO testimonial (customer_name, description, rating, created_at)
        VALUES (?1, ?2, ?3, ?4)",
        (
            &testimonial.customer_name,
            &testimonial.description,
            testimonial.rating,
            created_at,
        ),
    )?;

    Ok(Testimonial {
        id: connection.last_insert_rowid(),
        customer_name: testimonial.customer_name,
        description: testimonial.description,
        rating: testimonial.rating,
        created_at,
    })
}

/// Retrieve a single testimonial by id.
pub fn get_testimonial(id: TestimonialId, connection: &Connection) -> Result<Testimonial, Error> {
    connection
        .prepare(
            "SELECT id, customer_name, description, rating, created_at
            FROM testimonial WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_testimonial)
        .map_err(|error| error.into())
}

/// The total number of testimonials.
pub fn count_testimonials(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_one("SELECT COUNT(1) FROM testimonial", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Retrieve one page of testimonials, newest first.
pub fn get_testimonials_page(
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<Testimonial>, Error> {
    connection
        .prepare(
            "SELECT id, customer_name, description, rating, created_at FROM testimonial
            ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?
        .query_map([limit, offset], map_row_to_testimonial)?
        .map(|maybe_testimonial| maybe_testimonial.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a testimonial's fields. Returns an error if the testimonial doesn't exist.
pub fn update_testimonial(
    id: TestimonialId,
    testimonial: ValidTestimonial,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE testimonial SET customer_name = ?1, description = ?2, rating = ?3 WHERE id = ?4",
        (
            &testimonial.customer_name,
            &testimonial.description,
            testimonial.rating,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTestimonial);
    }

    Ok(())
}

/// Delete a testimonial by id. Returns an error if the testimonial doesn't exist.
pub fn delete_testimonial(id: TestimonialId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM testimonial WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTestimonial);
    }

    Ok(())
}

#[cfg(test)]
mod testimonial_form_tests {
    use super::TestimonialForm;

    fn form_with_rating(rating: &str) -> TestimonialForm {
        TestimonialForm {
            customer_name: "Budi Santoso".to_owned(),
            description: "Great service, finished ahead of the deadline.".to_owned(),
            rating: rating.to_owned(),
        }
    }

    #[test]
    fn validate_accepts_rating_bounds() {
        assert!(form_with_rating("1").validate().is_ok());
        assert!(form_with_rating("5").validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_ratings() {
        for rating in ["0", "6", "-1"] {
            let errors = form_with_rating(rating)
                .validate()
                .expect_err("out-of-range rating should not validate");

            assert_eq!(errors.entries()[0].0, "rating");
        }
    }

    #[test]
    fn validate_rejects_non_numeric_rating() {
        let errors = form_with_rating("five")
            .validate()
            .expect_err("non-numeric rating should not validate");

        assert_eq!(errors.entries()[0].0, "rating");
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let form = TestimonialForm {
            customer_name: "".to_owned(),
            description: "".to_owned(),
            rating: "".to_owned(),
        };

        let errors = form.validate().expect_err("empty form should not validate");

        let fields: Vec<&str> = errors.entries().iter().map(|(field, _)| *field).collect();
        assert_eq!(fields, ["customer_name", "description", "rating"]);
    }
}
