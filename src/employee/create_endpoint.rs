//! Employee registration page and endpoint.

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

use super::core::{EmployeeForm, create_employee};

/// The state needed for registering an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateEmployeeEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the employee registration page.
pub async fn get_new_employee_page() -> Response {
    new_employee_view().into_response()
}

/// Handle employee registration form submission.
pub async fn create_employee_endpoint(
    State(state): State<CreateEmployeeEndpointState>,
    Form(form): Form<EmployeeForm>,
) -> Response {
    let employee = match form.validate() {
        Ok(employee) => employee,
        Err(errors) => return errors.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_employee(employee, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::EMPLOYEES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while registering an employee: {error}");

            error.into_alert_response()
        }
    }
}

fn new_employee_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::EMPLOYEES_VIEW).into_html();

    let form = html! {
        form
            hx-post=(endpoints::POST_EMPLOYEE)
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
                    placeholder="Employee name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="phone_number" class=(FORM_LABEL_STYLE) { "Phone Number" }

                input
                    id="phone_number"
                    type="text"
                    name="phone_number"
                    placeholder="08xxxxxxxxxx"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Register Employee" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Register Employee", &content)
}

#[cfg(test)]
mod new_employee_page_tests {
    use axum::http::StatusCode;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document,
        },
    };

    use super::get_new_employee_page;

    #[tokio::test]
    async fn render_page() {
        let response = get_new_employee_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_EMPLOYEE, "hx-post");
        assert_form_input(&form, "name", "text");
        assert_form_input(&form, "phone_number", "text");
        assert_form_submit_button(&form);
    }
}
