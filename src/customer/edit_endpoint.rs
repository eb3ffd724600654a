//! Customer edit page and update endpoint.

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

use super::core::{Customer, CustomerForm, CustomerId, get_customer, update_customer};

/// The state needed for editing a customer.
#[derive(Debug, Clone)]
pub struct EditCustomerEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCustomerEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit page for a customer.
pub async fn get_edit_customer_page(
    State(state): State<EditCustomerEndpointState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let customer = get_customer(customer_id, &connection)?;

    Ok(edit_customer_view(&customer).into_response())
}

/// Handle customer update form submission.
pub async fn update_customer_endpoint(
    State(state): State<EditCustomerEndpointState>,
    Path(customer_id): Path<CustomerId>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let customer = match form.validate() {
        Ok(customer) => customer,
        Err(errors) => return errors.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_customer(customer_id, customer, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a customer: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_customer_view(customer: &Customer) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CUSTOMER, customer.id);

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
                    value=(customer.name)
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
                    value=(customer.phone_number)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Customer" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Customer", &content)
}

#[cfg(test)]
mod edit_customer_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use rusqlite::Connection;

    use crate::{
        customer::core::{ValidCustomer, create_customer, create_customer_table},
        endpoints,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{EditCustomerEndpointState, get_edit_customer_page};

    fn get_test_state() -> EditCustomerEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_customer_table(&connection).expect("Could not create customer table");

        EditCustomerEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn page_shows_current_values() {
        let state = get_test_state();
        let customer = {
            let connection = state.db_connection.lock().unwrap();
            create_customer(
                ValidCustomer {
                    name: "Budi Santoso".to_owned(),
                    phone_number: "081234567890".to_owned(),
                },
                &connection,
            )
            .expect("Could not create test customer")
        };

        let response = get_edit_customer_page(State(state), Path(customer.id))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::PUT_CUSTOMER, customer.id),
            "hx-put",
        );
        assert_form_input_with_value(&form, "name", "Budi Santoso");
        assert_form_input_with_value(&form, "phone_number", "081234567890");
    }

    #[tokio::test]
    async fn missing_customer_returns_not_found() {
        let state = get_test_state();

        let error = get_edit_customer_page(State(state), Path(999))
            .await
            .expect_err("Page should not render for a missing customer");

        assert!(matches!(error, crate::Error::NotFound));
    }
}

#[cfg(test)]
mod update_customer_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        customer::core::{CustomerForm, ValidCustomer, create_customer, create_customer_table, get_customer},
        endpoints,
        test_utils::assert_hx_redirect,
    };

    use super::{EditCustomerEndpointState, update_customer_endpoint};

    fn get_test_state() -> EditCustomerEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_customer_table(&connection).expect("Could not create customer table");

        EditCustomerEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_update_customer() {
        let state = get_test_state();
        let customer = {
            let connection = state.db_connection.lock().unwrap();
            create_customer(
                ValidCustomer {
                    name: "Budi Santoso".to_owned(),
                    phone_number: "081234567890".to_owned(),
                },
                &connection,
            )
            .expect("Could not create test customer")
        };

        let form = CustomerForm {
            name: "Budi S.".to_owned(),
            phone_number: "089876543210".to_owned(),
        };

        let response =
            update_customer_endpoint(State(state.clone()), Path(customer.id), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CUSTOMERS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_customer(customer.id, &connection).unwrap();
        assert_eq!(updated.name, "Budi S.");
        assert_eq!(updated.phone_number, "089876543210");
    }

    #[tokio::test]
    async fn updating_missing_customer_fails() {
        let state = get_test_state();
        let form = CustomerForm {
            name: "Budi".to_owned(),
            phone_number: "081234567890".to_owned(),
        };

        let response = update_customer_endpoint(State(state), Path(999), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
