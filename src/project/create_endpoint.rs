//! Project creation page and endpoint.

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

use super::core::{ProjectForm, create_project};

/// The state needed for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProjectEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
}

impl FromRef<AppState> for CreateProjectEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
        }
    }
}

/// Render the project creation page with the available categories.
pub async fn get_new_project_page(
    State(state): State<CreateProjectEndpointState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = list_category_service_names(&connection)?;

    Ok(new_project_view(&categories).into_response())
}

/// Handle project creation form submission.
///
/// The poster, when supplied, is written to the file store first; if the
/// insert then fails the stored file is removed again.
pub async fn create_project_endpoint(
    State(state): State<CreateProjectEndpointState>,
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
    let (project, poster) = match form.validate() {
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

    let poster_path = match poster {
        Some(poster) => match state.file_store.save(PROJECTS_BUCKET, poster) {
            Ok(poster_path) => Some(poster_path),
            Err(error) => {
                tracing::error!("could not store project poster: {error}");
                return error.into_alert_response();
            }
        },
        None => None,
    };

    match create_project(project, poster_path.as_deref(), &connection) {
        Ok(_) => (
            HxRedirect(endpoints::PROJECTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            if let Some(path) = &poster_path {
                state.file_store.delete(path);
            }

            if error != Error::InvalidForeignKey {
                tracing::error!(
                    "An unexpected error occurred while creating a project: {error}"
                );
            }

            error.into_alert_response()
        }
    }
}

fn new_project_view(categories: &[(CategoryServiceId, String)]) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROJECTS_VIEW).into_html();
    let form = project_form_view(categories);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Project", &content)
}

fn project_form_view(categories: &[(CategoryServiceId, String)]) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_PROJECT)
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
                    placeholder="e.g. Company Landing Page"
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
                    placeholder="What was built, and for whom?"
                    required
                    class=(FORM_TEXT_INPUT_STYLE) {}
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
                        option value=(id) { (name) }
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
                    placeholder="e.g. Rust,TypeScript"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="poster" class=(FORM_LABEL_STYLE) { "Poster (optional)" }

                input
                    id="poster"
                    type="file"
                    name="poster"
                    accept=".jpg,.jpeg,.png"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-center gap-2"
            {
                input
                    id="is_published"
                    type="checkbox"
                    name="is_published"
                    value="true";

                label for="is_published" class=(FORM_LABEL_STYLE) { "Published" }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Project" }
        }
    }
}


#[cfg(test)]
mod create_project_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        category_service::{
            ValidCategoryService, create_category_service, create_category_service_table,
        },
        endpoints,
        project::core::{count_projects, create_project_table, get_project},
        test_utils::{assert_hx_redirect, must_make_multipart, sample_png, temp_file_store},
    };

    use super::{CreateProjectEndpointState, create_project_endpoint};

    fn get_test_state() -> CreateProjectEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .expect("Could not enable foreign keys");
        create_category_service_table(&connection)
            .expect("Could not create category service table");
        create_project_table(&connection).expect("Could not create project table");

        CreateProjectEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            file_store: temp_file_store(),
        }
    }

    fn create_test_category(state: &CreateProjectEndpointState) -> i64 {
        let connection = state.db_connection.lock().unwrap();
        create_category_service(
            ValidCategoryService {
                name: "Web Design".to_owned(),
                description: None,
                start_from: 500_000,
            },
            "category_services/abc.jpg",
            &connection,
        )
        .expect("Could not create test category")
        .id
    }

    #[tokio::test]
    async fn can_create_project_with_poster() {
        let state = get_test_state();
        let category_id = create_test_category(&state);
        let multipart = must_make_multipart(
            &[
                ("title", "Landing Page"),
                ("description", "A landing page"),
                ("price", "2000000"),
                ("languages", "Rust,TypeScript"),
                ("category_service_id", &category_id.to_string()),
                ("is_published", "true"),
            ],
            &[("poster", &sample_png("poster.jpg"))],
        )
        .await;

        let response = create_project_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::PROJECTS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let project = get_project(1, &connection).expect("Project was not created");
        assert_eq!(project.title, "Landing Page");
        assert!(project.is_published);
        let poster = project.poster.expect("The poster path was not stored");
        assert!(poster.starts_with("projects/"));
        assert!(state.file_store.contains(&poster));
    }

    #[tokio::test]
    async fn can_create_project_without_poster() {
        let state = get_test_state();
        let category_id = create_test_category(&state);
        let multipart = must_make_multipart(
            &[
                ("title", "Landing Page"),
                ("description", "A landing page"),
                ("price", "2000000"),
                ("languages", "Rust"),
                ("category_service_id", &category_id.to_string()),
            ],
            &[],
        )
        .await;

        let response = create_project_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let project = get_project(1, &connection).expect("Project was not created");
        assert_eq!(project.poster, None);
        assert!(!project.is_published);
    }

    #[tokio::test]
    async fn dangling_category_creates_nothing() {
        let state = get_test_state();
        let multipart = must_make_multipart(
            &[
                ("title", "Landing Page"),
                ("description", "A landing page"),
                ("price", "2000000"),
                ("languages", "Rust"),
                ("category_service_id", "999"),
            ],
            &[],
        )
        .await;

        let response = create_project_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_projects(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_title_creates_nothing() {
        let state = get_test_state();
        let category_id = create_test_category(&state);
        let multipart = must_make_multipart(
            &[
                ("description", "A landing page"),
                ("price", "2000000"),
                ("languages", "Rust"),
                ("category_service_id", &category_id.to_string()),
            ],
            &[],
        )
        .await;

        let response = create_project_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_projects(&connection).unwrap(), 0);
    }
}
