//! The payment proof model, validation and database operations.

use std::collections::HashMap;

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error,
    forms::{FieldErrors, FormValue, require_text, take_file, take_text},
    storage::{UploadedFile, check_upload},
};

/// The row id of a payment proof.
pub type PaymentProofId = i64;

/// How many payment proofs to show per page.
pub const PAYMENT_PROOFS_PER_PAGE: u64 = 5;

/// The accepted image formats for a payment proof.
pub(crate) const PROOF_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// An uploaded receipt or transfer confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentProof {
    /// The id of the payment proof.
    pub id: PaymentProofId,
    /// What this proof is for, e.g., which invoice or client.
    pub description: String,
    /// The bucket-relative path of the stored image.
    pub image: String,
    /// When the proof was uploaded.
    pub created_at: OffsetDateTime,
}

/// The multipart form data for creating or updating a payment proof.
#[derive(Debug, Clone)]
pub struct PaymentProofForm {
    /// What this proof is for.
    pub description: String,
    /// The uploaded image, if one was selected.
    pub image: Option<UploadedFile>,
}

/// A payment proof form that has passed validation, minus the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPaymentProof {
    pub(crate) description: String,
}

impl PaymentProofForm {
    /// Pull the payment proof fields out of a parsed multipart form.
    pub fn from_multipart(fields: &mut HashMap<String, FormValue>) -> Self {
        Self {
            description: take_text(fields, "description"),
            image: take_file(fields, "image"),
        }
    }

    /// Validate for creation. The image is required.
    pub fn validate_new(&self) -> Result<(ValidPaymentProof, &UploadedFile), FieldErrors> {
        let mut errors = FieldErrors::new();

        let proof = self.validate_fields(&mut errors);

        let image = match &self.image {
            Some(image) => {
                check_upload(&mut errors, "image", image, PROOF_IMAGE_EXTENSIONS);
                Some(image)
            }
            None => {
                errors.push("image", "the image field is required");
                None
            }
        };

        match (proof, image) {
            (Some(proof), Some(image)) if errors.is_empty() => Ok((proof, image)),
            _ => Err(errors),
        }
    }

    /// Validate for update. A missing image means "keep the stored one".
    pub fn validate_update(
        &self,
    ) -> Result<(ValidPaymentProof, Option<&UploadedFile>), FieldErrors> {
        let mut errors = FieldErrors::new();

        let proof = self.validate_fields(&mut errors);

        if let Some(image) = &self.image {
            check_upload(&mut errors, "image", image, PROOF_IMAGE_EXTENSIONS);
        }

        match proof {
            Some(proof) if errors.is_empty() => Ok((proof, self.image.as_ref())),
            _ => Err(errors),
        }
    }

    fn validate_fields(&self, errors: &mut FieldErrors) -> Option<ValidPaymentProof> {
        require_text(errors, "description", &self.description, 255)
            .map(|description| ValidPaymentProof { description })
    }
}

/// Initialize the payment proof table.
pub fn create_payment_proof_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payment_proof (
            id INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            image TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_payment_proof(row: &Row) -> Result<PaymentProof, rusqlite::Error> {
    Ok(PaymentProof {
        id: row.get(0)?,
        description: row.get(1)?,
        image: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Create a payment proof and return it with its generated id.
pub fn create_payment_proof(
    proof: ValidPaymentProof,
    image_path: &str,
    connection: &Connection,
) -> Result<PaymentProof, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO payment_proof (description, image, created_at) VALUES (?1, ?2, ?3)",
        (&proof.description, image_path, created_at),
    )?;

    Ok(PaymentProof {
        id: connection.last_insert_rowid(),
        description: proof.description,
        image: image_path.to_owned(),
        created_at,
    })
}

/// Retrieve a single payment proof by id.
pub fn get_payment_proof(
    id: PaymentProofId,
    connection: &Connection,
) -> Result<PaymentProof, Error> {
    connection
        .prepare("SELECT id, description, image, created_at FROM payment_proof WHERE id = :id")?
        .query_row(&[(":id", &id)], map_row_to_payment_proof)
        .map_err(|error| error.into())
}

/// The total number of payment proofs.
pub fn count_payment_proofs(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_one("SELECT COUNT(1) FROM payment_proof", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Retrieve one page of payment proofs, newest first.
pub fn get_payment_proofs_page(
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<PaymentProof>, Error> {
    connection
        .prepare(
            "SELECT id, description, image, created_at FROM payment_proof
            ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?
        .query_map([limit, offset], map_row_to_payment_proof)?
        .map(|maybe_proof| maybe_proof.map_err(|error| error.into()))
        .collect()
}

/// Overwrite a payment proof's fields. When `image_path` is `None` the stored
/// image path is kept.
///
/// # Errors
/// Returns [Error::UpdateMissingPaymentProof] if the proof doesn't exist.
pub fn update_payment_proof(
    id: PaymentProofId,
    proof: ValidPaymentProof,
    image_path: Option<&str>,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = match image_path {
        Some(image_path) => connection.execute(
            "UPDATE payment_proof SET description = ?1, image = ?2 WHERE id = ?3",
            (&proof.description, image_path, id),
        )?,
        None => connection.execute(
            "UPDATE payment_proof SET description = ?1 WHERE id = ?2",
            (&proof.description, id),
        )?,
    };

    if rows_affected == 0 {
        return Err(Error::UpdateMissingPaymentProof);
    }

    Ok(())
}

/// Delete a payment proof by id. Returns an error if it doesn't exist.
pub fn delete_payment_proof(id: PaymentProofId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM payment_proof WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingPaymentProof);
    }

    Ok(())
}
