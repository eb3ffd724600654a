//! Payment proof management: uploaded receipts and transfer confirmations.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list;

pub use core::{
    PaymentProof, PaymentProofForm, PaymentProofId, count_payment_proofs, create_payment_proof,
    create_payment_proof_table, get_payment_proof,
};
pub use create_endpoint::{create_payment_proof_endpoint, get_new_payment_proof_page};
pub use delete_endpoint::delete_payment_proof_endpoint;
pub use edit_endpoint::{get_edit_payment_proof_page, update_payment_proof_endpoint};
pub use list::get_payment_proofs_page;
