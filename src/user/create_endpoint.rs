//! User creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

use super::{
    core::{CreateUserForm, create_user},
    password::PasswordHash,
};

/// The state needed for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateUserEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the user creation page.
pub async fn get_new_user_page() -> Response {
    new_user_view().into_response()
}

/// Handle user creation form submission.
pub async fn create_user_endpoint(
    State(state): State<CreateUserEndpointState>,
    Form(form): Form<CreateUserForm>,
) -> Response {
    let (profile, password) = match form.validate() {
        Ok(validated) => validated,
        Err(errors) => return errors.into_response(),
    };

    let password_hash = match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
        Ok(password_hash) => password_hash,
        Err(error) => {
            tracing::error!("could not hash password: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_user(profile, password_hash, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::USERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::DuplicateEmail) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a user: {error}");

            error.into_alert_response()
        }
    }
}

fn new_user_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::USERS_VIEW).into_html();

    let form = html! {
        form
            hx-post=(endpoints::POST_USER)
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
                    placeholder="Display name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    id="email"
                    type="email"
                    name="email"
                    placeholder="name@example.com"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }

                input
                    id="password"
                    type="password"
                    name="password"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add User" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add User", &content)
}

#[cfg(test)]
mod new_user_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::get_new_user_page;

    #[tokio::test]
    async fn render_page() {
        let response = get_new_user_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_USER, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "email", "email");
        assert_form_input(&form, "password", "password");
        assert_form_submit_button(&form);
    }
}

#[cfg(test)]
mod create_user_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        endpoints,
        test_utils::assert_hx_redirect,
        user::core::{CreateUserForm, count_users, create_user_table, get_user_by_email},
    };

    use super::{CreateUserEndpointState, create_user_endpoint};

    fn get_test_state() -> CreateUserEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        CreateUserEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_create_user() {
        let state = get_test_state();
        let form = CreateUserForm {
            name: "Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            password: "anadequatelystrongpassword1".to_owned(),
        };

        let response = create_user_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::USERS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let user = get_user_by_email("admin@example.com", &connection)
            .expect("User was not created");
        assert!(
            user.password_hash
                .verify("anadequatelystrongpassword1")
                .unwrap()
        );
    }

    #[tokio::test]
    async fn weak_password_creates_nothing() {
        let state = get_test_state();
        let form = CreateUserForm {
            name: "Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            password: "password1234".to_owned(),
        };

        let response = create_user_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_users(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let state = get_test_state();
        let form = CreateUserForm {
            name: "Admin".to_owned(),
            email: "admin@example.com".to_owned(),
            password: "anadequatelystrongpassword1".to_owned(),
        };

        let first = create_user_endpoint(State(state.clone()), Form(form.clone())).await;
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let second = create_user_endpoint(State(state.clone()), Form(form)).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_users(&connection).unwrap(), 1);
    }
}
