//! Service category edit page and update endpoint.

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
    storage::{CATEGORY_SERVICES_BUCKET, FileStore},
};

use super::core::{
    CategoryService, CategoryServiceForm, CategoryServiceId, get_category_service,
    update_category_service,
};

/// The state needed for editing a service category.
#[derive(Debug, Clone)]
pub struct EditCategoryServiceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
}

impl FromRef<AppState> for EditCategoryServiceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
        }
    }
}

/// Render the edit page for a service category.
pub async fn get_edit_category_service_page(
    State(state): State<EditCategoryServiceEndpointState>,
    Path(category_id): Path<CategoryServiceId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = get_category_service(category_id, &connection)?;

    Ok(edit_category_service_view(&category).into_response())
}

/// Handle service category update form submission.
///
/// When a replacement image is uploaded, the new file is written first and
/// the old one removed only after the row update succeeds.
pub async fn update_category_service_endpoint(
    State(state): State<EditCategoryServiceEndpointState>,
    Path(category_id): Path<CategoryServiceId>,
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
    let (category, new_image) = match form.validate_update() {
        Ok(validated) => validated,
        Err(errors) => return errors.into_response(),
    };

    let new_image_path = match new_image {
        Some(image) => match state.file_store.save(CATEGORY_SERVICES_BUCKET, image) {
            Ok(image_path) => Some(image_path),
            Err(error) => {
                tracing::error!("could not store category image: {error}");
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

    let old_image_path = match get_category_service(category_id, &connection) {
        Ok(existing) => existing.image,
        Err(error) => {
            if let Some(path) = &new_image_path {
                state.file_store.delete(path);
            }
            return error.into_alert_response();
        }
    };

    match update_category_service(
        category_id,
        category,
        new_image_path.as_deref(),
        &connection,
    ) {
        Ok(()) => {
            if let Some(new_path) = &new_image_path
                && *new_path != old_image_path
            {
                state.file_store.delete(&old_image_path);
            }

            (
                HxRedirect(endpoints::CATEGORY_SERVICES_VIEW.to_owned()),
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

            if error != Error::DuplicateCategoryName {
                tracing::error!(
                    "An unexpected error occurred while updating category {category_id}: {error}"
                );
            }

            error.into_alert_response()
        }
    }
}

fn edit_category_service_view(category: &CategoryService) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORY_SERVICES_VIEW).into_html();
    let update_endpoint =
        endpoints::format_endpoint(endpoints::UPDATE_CATEGORY_SERVICE, category.id);
    let image_url = format!("{}/{}", endpoints::STORAGE, category.image);

    let form = html! {
        form
            hx-post=(update_endpoint)
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
                    value=(category.name)
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
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @if let Some(description) = &category.description {
                        (description)
                    }
                }
            }

            div
            {
                label for="start_from" class=(FORM_LABEL_STYLE) { "Starting Price (Rp)" }

                input
                    id="start_from"
                    type="number"
                    name="start_from"
                    min="0"
                    value=(category.start_from)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="image" class=(FORM_LABEL_STYLE) { "Replace Image (optional)" }

                img
                    src=(image_url)
                    alt=(category.name)
                    class="h-24 w-24 object-cover rounded mb-2";

                input
                    id="image"
                    type="file"
                    name="image"
                    accept=".jpeg,.png,.jpg,.gif"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Category" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Service Category", &content)
}


#[cfg(test)]
mod update_category_service_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        category_service::core::{
            ValidCategoryService, create_category_service, create_category_service_table,
            get_category_service,
        },
        endpoints,
        test_utils::{assert_hx_redirect, must_make_multipart, sample_png, temp_file_store},
    };

    use super::{EditCategoryServiceEndpointState, update_category_service_endpoint};

    fn get_test_state() -> EditCategoryServiceEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_category_service_table(&connection)
            .expect("Could not create category service table");

        EditCategoryServiceEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            file_store: temp_file_store(),
        }
    }

    fn create_test_category(
        state: &EditCategoryServiceEndpointState,
        name: &str,
        image_path: &str,
    ) -> crate::category_service::core::CategoryService {
        let connection = state.db_connection.lock().unwrap();
        create_category_service(
            ValidCategoryService {
                name: name.to_owned(),
                description: None,
                start_from: 500_000,
            },
            image_path,
            &connection,
        )
        .expect("Could not create test category")
    }

    #[tokio::test]
    async fn update_without_image_keeps_stored_file() {
        let state = get_test_state();
        let original = state
            .file_store
            .save("category_services", &sample_png("original.jpg"))
            .expect("Could not store original image");
        let category = create_test_category(&state, "Logo Design", &original);

        let multipart = must_make_multipart(
            &[("name", "Logo & Branding"), ("start_from", "750000")],
            &[],
        )
        .await;

        let response =
            update_category_service_endpoint(State(state.clone()), Path(category.id), multipart)
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CATEGORY_SERVICES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_category_service(category.id, &connection).unwrap();
        assert_eq!(updated.name, "Logo & Branding");
        assert_eq!(updated.image, original);
        assert!(state.file_store.contains(&original));
    }

    #[tokio::test]
    async fn update_with_image_replaces_stored_file() {
        let state = get_test_state();
        let original = state
            .file_store
            .save("category_services", &sample_png("original.jpg"))
            .expect("Could not store original image");
        let category = create_test_category(&state, "Logo Design", &original);

        let multipart = must_make_multipart(
            &[("name", "Logo Design"), ("start_from", "500000")],
            &[("image", &sample_png("replacement.jpg"))],
        )
        .await;

        let response =
            update_category_service_endpoint(State(state.clone()), Path(category.id), multipart)
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_category_service(category.id, &connection).unwrap();
        assert_ne!(updated.image, original);
        assert!(state.file_store.contains(&updated.image));
        assert!(
            !state.file_store.contains(&original),
            "the replaced image should have been deleted"
        );
    }

    #[tokio::test]
    async fn updating_missing_category_fails() {
        let state = get_test_state();
        let multipart = must_make_multipart(
            &[("name", "Logo Design"), ("start_from", "500000")],
            &[],
        )
        .await;

        let response =
            update_category_service_endpoint(State(state), Path(999), multipart).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
