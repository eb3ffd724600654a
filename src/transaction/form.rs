//! Validation of the new transaction form.

use std::collections::HashMap;

use crate::{
    forms::{
        FieldErrors, FormValue, optional_text, require_date, require_price, require_reference,
        require_text, take_file, take_text,
    },
    storage::{UploadedFile, check_upload},
};

use super::core::{PaymentStatus, ValidTransaction};

/// The accepted formats for a transaction's payment proof. Unlike standalone
/// payment proofs, scanned documents are also accepted here.
pub(crate) const TRANSACTION_PROOF_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf"];

/// The multipart form data for recording a transaction.
#[derive(Debug, Clone)]
pub struct TransactionForm {
    /// The name of the sold project.
    pub project_name: String,
    /// Optional notes about the agreement.
    pub description: String,
    /// The id of the customer who bought the project.
    pub customer_id: String,
    /// The id of the employee assigned to build it.
    pub employee_id: String,
    /// The agreed delivery date in `YYYY-MM-DD` form.
    pub deadline: String,
    /// The agreed price in whole rupiah.
    pub price: String,
    /// How the customer paid.
    pub payment_method: String,
    /// "deposit" or "paid".
    pub status: String,
    /// The uploaded payment proof, if one was selected.
    pub payment_proof: Option<UploadedFile>,
}

impl TransactionForm {
    /// Pull the transaction fields out of a parsed multipart form.
    pub fn from_multipart(fields: &mut HashMap<String, FormValue>) -> Self {
        Self {
            project_name: take_text(fields, "project_name"),
            description: take_text(fields, "description"),
            customer_id: take_text(fields, "customer_id"),
            employee_id: take_text(fields, "employee_id"),
            deadline: take_text(fields, "deadline"),
            price: take_text(fields, "price"),
            payment_method: take_text(fields, "payment_method"),
            status: take_text(fields, "status"),
            payment_proof: take_file(fields, "payment_proof"),
        }
    }

    /// Validate the form. The payment proof is required.
    pub fn validate(&self) -> Result<(ValidTransaction, &UploadedFile), FieldErrors> {
        let mut errors = FieldErrors::new();

        let project_name = require_text(&mut errors, "project_name", &self.project_name, 255);
        let description = optional_text(&mut errors, "description", &self.description, 1000)
            .filter(|description| !description.is_empty());
        let customer_id = require_reference(&mut errors, "customer_id", &self.customer_id);
        let employee_id = require_reference(&mut errors, "employee_id", &self.employee_id);
        let deadline = require_date(&mut errors, "deadline", &self.deadline);
        let price = require_price(&mut errors, "price", &self.price);
        let payment_method =
            require_text(&mut errors, "payment_method", &self.payment_method, 255);

        let status = match PaymentStatus::parse(self.status.trim()) {
            Some(status) => Some(status),
            None => {
                errors.push("status", "must be either deposit or paid");
                None
            }
        };

        let payment_proof = match &self.payment_proof {
            Some(payment_proof) => {
                check_upload(
                    &mut errors,
                    "payment_proof",
                    payment_proof,
                    TRANSACTION_PROOF_EXTENSIONS,
                );
                Some(payment_proof)
            }
            None => {
                errors.push("payment_proof", "the payment proof field is required");
                None
            }
        };

        match (
            project_name,
            customer_id,
            employee_id,
            deadline,
            price,
            payment_method,
            status,
            payment_proof,
        ) {
            (
                Some(project_name),
                Some(customer_id),
                Some(employee_id),
                Some(deadline),
                Some(price),
                Some(payment_method),
                Some(status),
                Some(payment_proof),
            ) if errors.is_empty() => Ok((
                ValidTransaction {
                    project_name,
                    description,
                    customer_id,
                    employee_id,
                    deadline,
                    price,
                    payment_method,
                    status,
                },
                payment_proof,
            )),
            _ => Err(errors),
        }
    }
}
