//! Shared form machinery: multipart parsing and field-keyed validation errors.
//!
//! Every form in the app is parsed once into an explicit typed struct, then
//! validated in a single step that either produces a fully-typed value or a
//! [FieldErrors] listing each failed field with a human-readable message.

use std::collections::HashMap;

use axum::{
    extract::Multipart,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;
use time::Date;
use time::macros::format_description;

use crate::{Error, storage::UploadedFile};

/// An ordered collection of validation failures keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    /// Create an empty error collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a validation failure for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    /// Whether any field failed validation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recorded failures in submission order.
    pub fn entries(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

impl IntoResponse for FieldErrors {
    /// Render the errors as an alert fragment, one line per field.
    fn into_response(self) -> Response {
        let markup = html! {
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div
                    class="p-4 mb-4 text-sm rounded-lg border text-red-800 bg-red-50 \
                        border-red-300 dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
                    role="alert"
                {
                    p class="font-medium" { "Please correct the following:" }

                    ul class="mt-1.5 list-disc list-inside"
                    {
                        @for (field, message) in self.entries() {
                            li { (field) ": " (message) }
                        }
                    }
                }
            }
        };

        (StatusCode::UNPROCESSABLE_ENTITY, markup).into_response()
    }
}

/// A single value submitted in a multipart form.
#[derive(Debug, Clone)]
pub enum FormValue {
    /// A regular text input.
    Text(String),
    /// An uploaded file with content.
    File(UploadedFile),
}

/// Read an entire multipart form into a map of field name to value.
///
/// File parts without a filename or with empty content are treated as absent,
/// which is what browsers send when no file was selected.
pub async fn collect_multipart(
    multipart: &mut Multipart,
) -> Result<HashMap<String, FormValue>, Error> {
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::Multipart(error.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(str::to_owned);

        match file_name {
            Some(file_name) if !file_name.is_empty() => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|error| Error::Multipart(error.to_string()))?;

                if bytes.is_empty() {
                    continue;
                }

                fields.insert(
                    name,
                    FormValue::File(UploadedFile {
                        file_name,
                        bytes: bytes.to_vec(),
                    }),
                );
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|error| Error::Multipart(error.to_string()))?;

                fields.insert(name, FormValue::Text(text));
            }
        }
    }

    Ok(fields)
}

/// Remove the text value for `field`, defaulting to an empty string.
pub fn take_text(fields: &mut HashMap<String, FormValue>, field: &str) -> String {
    match fields.remove(field) {
        Some(FormValue::Text(text)) => text,
        _ => String::new(),
    }
}

/// Remove the uploaded file for `field`, if one was submitted.
pub fn take_file(fields: &mut HashMap<String, FormValue>, field: &str) -> Option<UploadedFile> {
    match fields.remove(field) {
        Some(FormValue::File(file)) => Some(file),
        _ => None,
    }
}

/// Validate a required text field, enforcing a maximum length.
///
/// Returns the trimmed value on success, recording an error otherwise.
pub fn require_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    max_length: usize,
) -> Option<String> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        errors.push(field, format!("the {field} field is required"));
        return None;
    }

    if trimmed.chars().count() > max_length {
        errors.push(field, format!("must be at most {max_length} characters"));
        return None;
    }

    Some(trimmed.to_owned())
}

/// Validate an optional text field, enforcing a maximum length.
pub fn optional_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    max_length: usize,
) -> Option<String> {
    let trimmed = value.trim();

    if trimmed.chars().count() > max_length {
        errors.push(field, format!("must be at most {max_length} characters"));
        return None;
    }

    Some(trimmed.to_owned())
}

/// Validate a required non-negative price in whole rupiah.
pub fn require_price(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
) -> Option<i64> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        errors.push(field, format!("the {field} field is required"));
        return None;
    }

    match trimmed.parse::<i64>() {
        Ok(price) if price >= 0 => Some(price),
        Ok(_) => {
            errors.push(field, "must be zero or greater");
            None
        }
        Err(_) => {
            errors.push(field, "must be a whole number");
            None
        }
    }
}

/// Validate a required reference to another record, submitted as a row id.
pub fn require_reference(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
) -> Option<i64> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        errors.push(field, format!("the {field} field is required"));
        return None;
    }

    match trimmed.parse::<i64>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.push(field, "must refer to an existing record");
            None
        }
    }
}

/// Validate a required calendar date in `YYYY-MM-DD` form.
pub fn require_date(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
) -> Option<Date> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        errors.push(field, format!("the {field} field is required"));
        return None;
    }

    let format = format_description!("[year]-[month]-[day]");

    match Date::parse(trimmed, &format) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, "must be a valid date in YYYY-MM-DD form");
            None
        }
    }
}


#[cfg(test)]
mod validator_tests {
    use time::macros::date;

    use super::{
        FieldErrors, optional_text, require_date, require_price, require_reference, require_text,
    };

    #[test]
    fn require_text_rejects_empty_and_whitespace() {
        let mut errors = FieldErrors::new();

        assert_eq!(require_text(&mut errors, "name", "  \t", 255), None);

        assert_eq!(
            errors.entries(),
            &[("name", "the name field is required".to_owned())]
        );
    }

    #[test]
    fn require_text_rejects_overlong_value() {
        let mut errors = FieldErrors::new();

        assert_eq!(require_text(&mut errors, "name", "abcdef", 5), None);
        assert!(!errors.is_empty());
    }

    #[test]
    fn require_text_trims_valid_value() {
        let mut errors = FieldErrors::new();

        let got = require_text(&mut errors, "name", "  Logo Design ", 255);

        assert_eq!(got, Some("Logo Design".to_owned()));
        assert!(errors.is_empty());
    }

    #[test]
    fn optional_text_accepts_empty_value() {
        let mut errors = FieldErrors::new();

        assert_eq!(optional_text(&mut errors, "description", "", 1000), Some(String::new()));
        assert!(errors.is_empty());
    }

    #[test]
    fn require_price_rejects_negative_and_non_numeric() {
        let mut errors = FieldErrors::new();

        assert_eq!(require_price(&mut errors, "price", "-1"), None);
        assert_eq!(require_price(&mut errors, "price", "lots"), None);
        assert_eq!(errors.entries().len(), 2);
    }

    #[test]
    fn require_price_accepts_zero() {
        let mut errors = FieldErrors::new();

        assert_eq!(require_price(&mut errors, "price", "0"), Some(0));
        assert!(errors.is_empty());
    }

    #[test]
    fn require_reference_rejects_zero_and_non_numeric() {
        let mut errors = FieldErrors::new();

        assert_eq!(require_reference(&mut errors, "customer_id", "0"), None);
        assert_eq!(require_reference(&mut errors, "customer_id", "first"), None);
        assert_eq!(errors.entries().len(), 2);
    }

    #[test]
    fn require_reference_accepts_positive_id() {
        let mut errors = FieldErrors::new();

        assert_eq!(require_reference(&mut errors, "customer_id", "3"), Some(3));
        assert!(errors.is_empty());
    }

    #[test]
    fn require_date_parses_iso_date() {
        let mut errors = FieldErrors::new();

        assert_eq!(
            require_date(&mut errors, "deadline", "2025-12-01"),
            Some(date!(2025 - 12 - 01))
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn require_date_rejects_invalid_calendar_date() {
        let mut errors = FieldErrors::new();

        assert_eq!(require_date(&mut errors, "deadline", "2025-02-30"), None);
        assert!(!errors.is_empty());
    }
}
