//! Project edit page and update endpoint.

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
    AppState, Error,
    category_service::{CategoryServiceId, category_service_exists, list_category_service_names},
    endpoints,
    forms::{FieldErrors, collect_multipart},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    storage::{FileStore, PROJECTS_BUCKET},
};

use super::core::{Project, ProjectForm, ProjectId, get_project, update_project};

/// The state needed for editing a project.
#[derive(Debug, Clone)]
pub struct EditProjectEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
}

impl FromRef<AppState> for EditProjectEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
        }
    }
}

/// Render the edit page for a project.
pub async fn get_edit_project_page(
    State(state): State<EditProjectEndpointState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let project = get_project(project_id, &connection)?;
    let categories = list_category_service_names(&connection)?;

    Ok(edit_project_view(&project, &categories).into_response())
}

/// Handle project update form submission.
///
/// When a replacement poster is uploaded, the new file is written first and
/// the old one removed only after the row update succeeds.
pub async fn update_project_endpoint(
    State(state): State<EditProjectEndpointState>,
    Path(project_id): Path<ProjectId>,
    mut multipart: Multipart,
) -> Response {
    let mut fields = match collect_multipart(&mut multipart).await {
        Ok(fields) => fields,
        Err(error) => {
            tracing::error!("could not read project form: {error}");
            return error.into_alert_response();
        }
    };

    let form = ProjectForm::from_multipart(&mut fields);
    let (project, new_poster) = match form.validate() {
        Ok(validated) => validated,
        Err(errors) => return errors.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match category_service_exists(project.category_service_id, &connection) {
        Ok(true) => {}
        Ok(false) => {
            let mut errors = FieldErrors::new();
            errors.push("category_service_id", "the selected category does not exist");
            return errors.into_response();
        }
        Err(error) => return error.into_alert_response(),
    }

    let old_poster_path = match get_project(project_id, &connection) {
        Ok(existing) => existing.poster,
        Err(error) => return error.into_alert_response(),
    };

    let new_poster_path = match new_poster {
        Some(poster) => match state.file_store.save(PROJECTS_BUCKET, poster) {
            Ok(poster_path) => Some(poster_path),
            Err(error) => {
                tracing::error!("could not store project poster: {error}");
                return error.into_alert_response();
            }
        },
        None => None,
    };

    match update_project(project_id, project, new_poster_path.as_deref(), &connection) {
        Ok(()) => {
            if let (Some(new_path), Some(old_path)) = (&new_poster_path, &old_poster_path)
                && new_path != old_path
            {
                state.file_store.delete(old_path);
            }

            (
                HxRedirect(endpoints::PROJECTS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            if let Some(path) = &new_poster_path
                && old_poster_path.as_deref() != Some(path)
            {
                state.file_store.delete(path);
            }

            tracing::error!(
                "An unexpected error occurred while updating project {project_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_project_view(project: &Project, categories: &[(CategoryServiceId, String)]) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROJECTS_VIEW).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_PROJECT, project.id);

    let form = html! {
        form
            hx-put=(update_endpoint)
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="title" class=(FORM_LABEL_STYLE) { "Title" }

                input
                    id="title"
                    type="text"
                    name="title"
                    value=(project.title)
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
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (project.description)
                }
            }

            div
            {
                label for="category_service_id" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    id="category_service_id"
                    name="category_service_id"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (id, name) in categories {
                        @if *id == project.category_service_id {
                            option value=(id) selected { (name) }
                        } @else {
                            option value=(id) { (name) }
                        }
                    }
                }
            }

            div
            {
                label for="price" class=(FORM_LABEL_STYLE) { "Price (Rp)" }

                input
                    id="price"
                    type="number"
                    name="price"
                    min="0"
                    value=(project.price)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="languages" class=(FORM_LABEL_STYLE) { "Languages" }

                input
                    id="languages"
                    type="text"
                    name="languages"
                    value=(project.languages)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="poster" class=(FORM_LABEL_STYLE) { "Replace Poster (optional)" }

                @if let Some(poster) = &project.poster {
                    img
                        src=(format!("{}/{poster}", endpoints::STORAGE))
                        alt=(project.title)
                        class="h-24 w-24 object-cover rounded mb-2";
                }

                input
                    id="poster"
                    type="file"
                    name="poster"
                    accept=".jpg,.jpeg,.png"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-center gap-2"
            {
                @if project.is_published {
                    input
                        id="is_published"
                        type="checkbox"
                        name="is_published"
                        value="true"
                        checked;
                } @else {
                    input
                        id="is_published"
                        type="checkbox"
                        name="is_published"
                        value="true";
                }

                label for="is_published" class=(FORM_LABEL_STYLE) { "Published" }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Project" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Project", &content)
}
