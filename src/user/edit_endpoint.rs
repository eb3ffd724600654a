//! User edit page and update endpoint.
//!
//! Only the name and email can be edited; passwords are set at creation or
//! with the `add-user` command line tool.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
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

use super::core::{UpdateUserForm, User, UserId, get_user, update_user};

/// The state needed for editing a user.
#[derive(Debug, Clone)]
pub struct EditUserEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditUserEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit page for a user.
pub async fn get_edit_user_page(
    State(state): State<EditUserEndpointState>,
    Path(user_id): Path<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user(user_id, &connection)?;

    Ok(edit_user_view(&user).into_response())
}

/// Handle user update form submission.
pub async fn update_user_endpoint(
    State(state): State<EditUserEndpointState>,
    Path(user_id): Path<UserId>,
    Form(form): Form<UpdateUserForm>,
) -> Response {
    let profile = match form.validate() {
        Ok(profile) => profile,
        Err(errors) => return errors.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_user(user_id, profile, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::USERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error @ Error::DuplicateEmail) => error.into_alert_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a user: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_user_view(user: &User) -> Markup {
    let nav_bar = NavBar::new(endpoints::USERS_VIEW).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_USER, user.id);

    let form = html! {
        form
            hx-put=(update_endpoint)
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
                    value=(user.name)
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
                    value=(user.email)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save User" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit User", &content)
}

#[cfg(test)]
mod edit_user_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
        user::{
            core::{ValidUserProfile, create_user, create_user_table},
            password::PasswordHash,
        },
    };

    use super::{EditUserEndpointState, get_edit_user_page};

    fn get_test_state() -> EditUserEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        EditUserEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn page_shows_current_values() {
        let state = get_test_state();
        let user = {
            let connection = state.db_connection.lock().unwrap();
            create_user(
                ValidUserProfile {
                    name: "Admin".to_owned(),
                    email: "admin@example.com".to_owned(),
                },
                PasswordHash::new_unchecked("hash"),
                &connection,
            )
            .expect("Could not create test user")
        };

        let response = get_edit_user_page(State(state), Path(user.id))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::PUT_USER, user.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "Admin");
        assert_form_input_with_value(&form, "email", "admin@example.com");
    }
}
