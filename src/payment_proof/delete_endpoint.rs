//! Payment proof deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, storage::FileStore};

use super::core::{PaymentProofId, delete_payment_proof, get_payment_proof};

/// The state needed for deleting a payment proof.
#[derive(Debug, Clone)]
pub struct DeletePaymentProofEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
}

impl FromRef<AppState> for DeletePaymentProofEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
        }
    }
}

/// Handle payment proof deletion.
///
/// The stored image is removed after the row, on a best-effort basis.
pub async fn delete_payment_proof_endpoint(
    Path(proof_id): Path<PaymentProofId>,
    State(state): State<DeletePaymentProofEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let image_path = match get_payment_proof(proof_id, &connection) {
        Ok(proof) => Some(proof.image),
        Err(Error::NotFound) => None,
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while fetching payment proof {proof_id}: {error}"
            );
            return error.into_alert_response();
        }
    };

    match delete_payment_proof(proof_id, &connection) {
        Ok(()) => {
            if let Some(image_path) = &image_path {
                state.file_store.delete(image_path);
            }

            Alert::SuccessSimple {
                message: "Payment proof deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(Error::DeleteMissingPaymentProof) => {
            Error::DeleteMissingPaymentProof.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting payment proof {proof_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
