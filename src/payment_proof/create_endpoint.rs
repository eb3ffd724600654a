//! Payment proof upload page and creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State},
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

use super::core::{PaymentProofForm, create_payment_proof};

/// The state needed for creating a payment proof.
#[derive(Debug, Clone)]
pub struct CreatePaymentProofEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
}

impl FromRef<AppState> for CreatePaymentProofEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
        }
    }
}

/// Render the payment proof upload page.
pub async fn get_new_payment_proof_page() -> Response {
    new_payment_proof_view().into_response()
}

/// Handle payment proof form submission.
///
/// The image is written to the file store first; if the insert then fails the
/// stored file is removed again so no orphan is left behind.
pub async fn create_payment_proof_endpoint(
    State(state): State<CreatePaymentProofEndpointState>,
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
    let (proof, image) = match form.validate_new() {
        Ok(validated) => validated,
        Err(errors) => return errors.into_response(),
    };

    let image_path = match state.file_store.save(PAYMENT_PROOFS_BUCKET, image) {
        Ok(image_path) => image_path,
        Err(error) => {
            tracing::error!("could not store payment proof image: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            state.file_store.delete(&image_path);
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_payment_proof(proof, &image_path, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::PAYMENT_PROOFS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            state.file_store.delete(&image_path);
            tracing::error!(
                "An unexpected error occurred while creating a payment proof: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn new_payment_proof_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::PAYMENT_PROOFS_VIEW).into_html();
    let form = payment_proof_form_view();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Upload Payment Proof", &content)
}

fn payment_proof_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_PAYMENT_PROOF)
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
                    placeholder="e.g. Deposit for invoice #123"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="image" class=(FORM_LABEL_STYLE) { "Image" }

                input
                    id="image"
                    type="file"
                    name="image"
                    accept=".jpg,.jpeg,.png,.gif"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Upload Proof" }
        }
    }
}


#[cfg(test)]
mod create_payment_proof_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        endpoints,
        payment_proof::core::{
            count_payment_proofs, create_payment_proof_table, get_payment_proof,
        },
        test_utils::{assert_hx_redirect, must_make_multipart, sample_png, temp_file_store},
    };

    use super::{CreatePaymentProofEndpointState, create_payment_proof_endpoint};

    fn get_test_state() -> CreatePaymentProofEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_payment_proof_table(&connection).expect("Could not create payment proof table");

        CreatePaymentProofEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            file_store: temp_file_store(),
        }
    }

    #[tokio::test]
    async fn can_create_proof_and_store_image() {
        let state = get_test_state();
        let image = sample_png("receipt.jpg");
        let multipart = must_make_multipart(
            &[("description", "Deposit for invoice #123")],
            &[("image", &image)],
        )
        .await;

        let response = create_payment_proof_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::PAYMENT_PROOFS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let proof = get_payment_proof(1, &connection).expect("Payment proof was not created");
        assert_eq!(proof.description, "Deposit for invoice #123");
        assert!(
            proof.image.starts_with("payment_proofs/"),
            "image stored outside its bucket: {}",
            proof.image
        );
        assert!(
            state.file_store.contains(&proof.image),
            "the image file was not written"
        );
    }

    #[tokio::test]
    async fn missing_image_creates_nothing() {
        let state = get_test_state();
        let multipart =
            must_make_multipart(&[("description", "Deposit for invoice #123")], &[]).await;

        let response = create_payment_proof_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_payment_proofs(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_description_creates_nothing() {
        let state = get_test_state();
        let multipart =
            must_make_multipart(&[], &[("image", &sample_png("receipt.jpg"))]).await;

        let response = create_payment_proof_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_payment_proofs(&connection).unwrap(), 0);
    }
}
