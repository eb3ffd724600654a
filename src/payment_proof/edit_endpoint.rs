//! Payment proof edit page and update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    forms::collect_multipart,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    storage::{FileStore, PAYMENT_PROOFS_BUCKET},
};

use super::core::{
    PaymentProof, PaymentProofForm, PaymentProofId, get_payment_proof, update_payment_proof,
};

/// The state needed for editing a payment proof.
#[derive(Debug, Clone)]
pub struct EditPaymentProofEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
}

impl FromRef<AppState> for EditPaymentProofEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
        }
    }
}

/// Render the edit page for a payment proof.
pub async fn get_edit_payment_proof_page(
    State(state): State<EditPaymentProofEndpointState>,
    Path(proof_id): Path<PaymentProofId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let proof = get_payment_proof(proof_id, &connection)?;

    Ok(edit_payment_proof_view(&proof).into_response())
}

/// Handle payment proof update form submission.
///
/// When a replacement image is uploaded, the new file is written first and
/// the old one removed only after the row update succeeds.
pub async fn update_payment_proof_endpoint(
    State(state): State<EditPaymentProofEndpointState>,
    Path(proof_id): Path<PaymentProofId>,
    mut multipart: Multipart,
) -> Response {
    let mut fields = match collect_multipart(&mut multipart).await {
        Ok(fields) => fields,
        Err(error) => {
            tracing::error!("could not read payment proof form: {error}");
            return error.into_alert_response();
        }
    };

    let form = PaymentProofForm::from_multipart(&mut fields);
    let (proof, new_image) = match form.validate_update() {
        Ok(validated) => validated,
        Err(errors) => return errors.into_response(),
    };

    let new_image_path = match new_image {
        Some(image) => match state.file_store.save(PAYMENT_PROOFS_BUCKET, image) {
            Ok(image_path) => Some(image_path),
            Err(error) => {
                tracing::error!("could not store payment proof image: {error}");
                return error.into_alert_response();
            }
        },
        None => None,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            if let Some(path) = &new_image_path {
                state.file_store.delete(path);
            }
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let old_image_path = match get_payment_proof(proof_id, &connection) {
        Ok(existing) => existing.image,
        Err(error) => {
            if let Some(path) = &new_image_path {
                state.file_store.delete(path);
            }
            return error.into_alert_response();
        }
    };

    match update_payment_proof(proof_id, proof, new_image_path.as_deref(), &connection) {
        Ok(()) => {
            if let Some(new_path) = &new_image_path
                && *new_path != old_image_path
            {
                state.file_store.delete(&old_image_path);
            }

            (
                HxRedirect(endpoints::PAYMENT_PROOFS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            if let Some(path) = &new_image_path
                && *path != old_image_path
            {
                state.file_store.delete(path);
            }

            tracing::error!(
                "An unexpected error occurred while updating payment proof {proof_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_payment_proof_view(proof: &PaymentProof) -> Markup {
    let nav_bar = NavBar::new(endpoints::PAYMENT_PROOFS_VIEW).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_PAYMENT_PROOF, proof.id);
    let image_url = format!("{}/{}", endpoints::STORAGE, proof.image);

    let form = html! {
        form
            hx-put=(update_endpoint)
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    id="description"
                    type="text"
                    name="description"
                    value=(proof.description)
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="image" class=(FORM_LABEL_STYLE) { "Replace Image (optional)" }

                img
                    src=(image_url)
                    alt="Payment proof"
                    class="h-24 w-24 object-cover rounded mb-2";

                input
                    id="image"
                    type="file"
                    name="image"
                    accept=".jpg,.jpeg,.png,.gif"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Proof" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Payment Proof", &content)
}
