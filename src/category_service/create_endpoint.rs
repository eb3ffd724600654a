//! Service category creation page and endpoint.

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
    storage::{CATEGORY_SERVICES_BUCKET, FileStore},
};

use super::core::{CategoryServiceForm, create_category_service};

/// The state needed for creating a service category.
#[derive(Debug, Clone)]
pub struct CreateCategoryServiceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
}

impl FromRef<AppState> for CreateCategoryServiceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
        }
    }
}

/// Render the service category creation page.
pub async fn get_new_category_service_page() -> Response {
    new_category_service_view().into_response()
}

/// Handle service category creation form submission.
///
/// The display image is written to the file store first; if the insert then
/// fails the stored file is removed again so no orphan is left behind.
pub async fn create_category_service_endpoint(
    State(state): State<CreateCategoryServiceEndpointState>,
    mut multipart: Multipart,
) -> Response {
    let mut fields = match collect_multipart(&mut multipart).await {
        Ok(fields) => fields,
        Err(error) => {
            tracing::error!("could not read category form: {error}");
            return error.into_alert_response();
        }
    };

    let form = CategoryServiceForm::from_multipart(&mut fields);
    let (category, image) = match form.validate_new() {
        Ok(validated) => validated,
        Err(errors) => return errors.into_response(),
    };

    let image_path = match state.file_store.save(CATEGORY_SERVICES_BUCKET, image) {
        Ok(image_path) => image_path,
        Err(error) => {
            tracing::error!("could not store category image: {error}");
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

    match create_category_service(category, &image_path, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CATEGORY_SERVICES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            state.file_store.delete(&image_path);

            if error != Error::DuplicateCategoryName {
                tracing::error!(
                    "An unexpected error occurred while creating a category: {error}"
                );
            }

            error.into_alert_response()
        }
    }
}

fn new_category_service_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORY_SERVICES_VIEW).into_html();
    let form = category_service_form_view();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Service Category", &content)
}

fn category_service_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_CATEGORY_SERVICE)
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    id="name"
                    type="text"
                    name="name"
                    placeholder="e.g. Logo Design"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                textarea
                    id="description"
                    name="description"
                    rows="3"
                    placeholder="What does this service include?"
                    class=(FORM_TEXT_INPUT_STYLE) {}
            }

            div
            {
                label for="start_from" class=(FORM_LABEL_STYLE) { "Starting Price (Rp)" }

                input
                    id="start_from"
                    type="number"
                    name="start_from"
                    min="0"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="image" class=(FORM_LABEL_STYLE) { "Image" }

                input
                    id="image"
                    type="file"
                    name="image"
                    accept=".jpeg,.png,.jpg,.gif"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Category" }
        }
    }
}
