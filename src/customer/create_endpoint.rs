//! Customer registration page and endpoint.

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

use super::core::{CustomerForm, create_customer};

/// The state needed for registering a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCustomerEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the customer registration page.
pub async fn get_new_customer_page() -> Response {
    new_customer_view().into_response()
}

/// Handle customer registration form submission.
pub async fn create_customer_endpoint(
    State(state): State<CreateCustomerEndpointState>,
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

    match create_customer(customer, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while registering a customer: {error}");

            error.into_alert_response()
        }
    }
}

fn new_customer_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();
    let form = customer_form_view();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Register Customer", &content)
}

fn customer_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_CUSTOMER)
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
                    placeholder="Customer name"
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

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Register Customer" }
        }
    }
}


#[cfg(test)]
mod create_customer_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        customer::core::{CustomerForm, count_customers, create_customer_table, get_customer},
        endpoints,
        test_utils::assert_hx_redirect,
    };

    use super::{CreateCustomerEndpointState, create_customer_endpoint};

    fn get_test_state() -> CreateCustomerEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_customer_table(&connection).expect("Could not create customer table");

        CreateCustomerEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_register_customer() {
        let state = get_test_state();
        let form = CustomerForm {
            name: "Budi Santoso".to_owned(),
            phone_number: "081234567890".to_owned(),
        };

        let response =
            create_customer_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::CUSTOMERS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let customer = get_customer(1, &connection).expect("Customer was not created");
        assert_eq!(customer.name, "Budi Santoso");
        assert_eq!(customer.phone_number, "081234567890");
    }

    #[tokio::test]
    async fn invalid_form_creates_nothing() {
        let state = get_test_state();
        let form = CustomerForm {
            name: "".to_owned(),
            phone_number: "081234567890".to_owned(),
        };

        let response = create_customer_endpoint(State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_customers(&connection).unwrap(), 0);
    }
}
