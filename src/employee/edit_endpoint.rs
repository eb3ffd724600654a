//! Employee edit page and update endpoint.

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

use super::core::{Employee, EmployeeForm, EmployeeId, get_employee, update_employee};

/// The state needed for editing an employee.
#[derive(Debug, Clone)]
pub struct EditEmployeeEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditEmployeeEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit page for an employee.
pub async fn get_edit_employee_page(
    State(state): State<EditEmployeeEndpointState>,
    Path(employee_id): Path<EmployeeId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let employee = get_employee(employee_id, &connection)?;

    Ok(edit_employee_view(&employee).into_response())
}

/// Handle employee update form submission.
pub async fn update_employee_endpoint(
    State(state): State<EditEmployeeEndpointState>,
    Path(employee_id): Path<EmployeeId>,
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

    match update_employee(employee_id, employee, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::EMPLOYEES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating an employee: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_employee_view(employee: &Employee) -> Markup {
    let nav_bar = NavBar::new(endpoints::EMPLOYEES_VIEW).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_EMPLOYEE, employee.id);

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
                    value=(employee.name)
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
                    value=(employee.phone_number)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Employee" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Employee", &content)
}
