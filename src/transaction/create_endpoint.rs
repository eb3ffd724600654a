//! Transaction creation page and endpoint.

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
    customer::{CustomerId, customer_exists, list_customer_names},
    employee::{EmployeeId, employee_exists, list_employee_names},
    endpoints,
    forms::{FieldErrors, collect_multipart},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    storage::{FileStore, PAYMENT_PROOFS_BUCKET},
    timezone::local_now,
};

use super::{
    business_id::generate_business_id,
    core::create_transaction_with_initial_progress,
    form::TransactionForm,
};

/// The state needed for recording a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Render the transaction creation page with the available customers and
/// employees.
pub async fn get_new_transaction_page(
    State(state): State<CreateTransactionEndpointState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let customers = list_customer_names(&connection)?;
    let employees = list_employee_names(&connection)?;

    Ok(new_transaction_view(&customers, &employees).into_response())
}

/// Handle transaction creation form submission.
///
/// The payment proof is written to the file store first; if the insert then
/// fails the stored file is removed again. The transaction row and its
/// initial progress entry are written atomically.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionEndpointState>,
    mut multipart: Multipart,
) -> Response {
    let mut fields = match collect_multipart(&mut multipart).await {
        Ok(fields) => fields,
        Err(error) => {
            tracing::error!("could not read transaction form: {error}");
            return error.into_alert_response();
        }
    };

    let form = TransactionForm::from_multipart(&mut fields);
    let (transaction, payment_proof) = match form.validate() {
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

    match customer_exists(transaction.customer_id, &connection) {
        Ok(true) => {}
        Ok(false) => {
            let mut errors = FieldErrors::new();
            errors.push("customer_id", "the selected customer does not exist");
            return errors.into_response();
        }
        Err(error) => return error.into_alert_response(),
    }

    match employee_exists(transaction.employee_id, &connection) {
        Ok(true) => {}
        Ok(false) => {
            let mut errors = FieldErrors::new();
            errors.push("employee_id", "the selected employee does not exist");
            return errors.into_response();
        }
        Err(error) => return error.into_alert_response(),
    }

    let now = match local_now(&state.local_timezone) {
        Ok(now) => now,
        Err(error) => {
            tracing::error!("could not resolve the local timezone: {error}");
            return error.into_alert_response();
        }
    };
    let business_id = generate_business_id(now);

    let proof_path = match state.file_store.save(PAYMENT_PROOFS_BUCKET, payment_proof) {
        Ok(proof_path) => proof_path,
        Err(error) => {
            tracing::error!("could not store payment proof: {error}");
            return error.into_alert_response();
        }
    };

    match create_transaction_with_initial_progress(
        transaction,
        &business_id,
        &proof_path,
        &connection,
    ) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            state.file_store.delete(&proof_path);

            if error != Error::DuplicateBusinessId && error != Error::InvalidForeignKey {
                tracing::error!(
                    "An unexpected error occurred while creating a transaction: {error}"
                );
            }

            error.into_alert_response()
        }
    }
}

fn new_transaction_view(
    customers: &[(CustomerId, String)],
    employees: &[(EmployeeId, String)],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let form = transaction_form_view(customers, employees);

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Transaction", &content)
}

fn transaction_form_view(
    customers: &[(CustomerId, String)],
    employees: &[(EmployeeId, String)],
) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_TRANSACTION)
            hx-encoding="multipart/form-data"
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="project_name" class=(FORM_LABEL_STYLE) { "Project Name" }

                input
                    id="project_name"
                    type="text"
                    name="project_name"
                    placeholder="e.g. Company Landing Page"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description (optional)" }

                textarea
                    id="description"
                    name="description"
                    rows="3"
                    placeholder="Notes about the agreement"
                    class=(FORM_TEXT_INPUT_STYLE) {}
            }

            div
            {
                label for="customer_id" class=(FORM_LABEL_STYLE) { "Customer" }

                select
                    id="customer_id"
                    name="customer_id"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (id, name) in customers {
                        option value=(id) { (name) }
                    }
                }
            }

            div
            {
                label for="employee_id" class=(FORM_LABEL_STYLE) { "Employee" }

                select
                    id="employee_id"
                    name="employee_id"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for (id, name) in employees {
                        option value=(id) { (name) }
                    }
                }
            }

            div
            {
                label for="deadline" class=(FORM_LABEL_STYLE) { "Deadline" }

                input
                    id="deadline"
                    type="date"
                    name="deadline"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
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
                label for="payment_method" class=(FORM_LABEL_STYLE) { "Payment Method" }

                input
                    id="payment_method"
                    type="text"
                    name="payment_method"
                    placeholder="e.g. Transfer"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="status" class=(FORM_LABEL_STYLE) { "Payment Status" }

                select
                    id="status"
                    name="status"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="deposit" { "Deposit" }
                    option value="paid" { "Paid" }
                }
            }

            div
            {
                label for="payment_proof" class=(FORM_LABEL_STYLE) { "Payment Proof" }

                input
                    id="payment_proof"
                    type="file"
                    name="payment_proof"
                    accept=".jpg,.jpeg,.png,.pdf"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
        }
    }
}

#[cfg(test)]
mod new_transaction_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        customer::{ValidCustomer, create_customer, create_customer_table},
        employee::{ValidEmployee, create_employee, create_employee_table},
        endpoints,
        test_utils::{
            assert_form_input, assert_form_submit_button, assert_hx_endpoint, assert_valid_html,
            must_get_form, parse_html_document, temp_file_store,
        },
    };

    use super::{CreateTransactionEndpointState, get_new_transaction_page};

    fn get_test_state() -> CreateTransactionEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_customer_table(&connection).expect("Could not create customer table");
        create_employee_table(&connection).expect("Could not create employee table");

        CreateTransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            file_store: temp_file_store(),
            local_timezone: "Asia/Jakarta".to_owned(),
        }
    }

    #[tokio::test]
    async fn render_page_with_customer_and_employee_options() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_customer(
                ValidCustomer {
                    name: "Budi Santoso".to_owned(),
                    phone_number: "081234567890".to_owned(),
                },
                &connection,
            )
            .expect("Could not create test customer");
            create_employee(
                ValidEmployee {
                    name: "Siti Rahma".to_owned(),
                    phone_number: "082112345678".to_owned(),
                },
                &connection,
            )
            .expect("Could not create test employee");
        }

        let response = get_new_transaction_page(State(state))
            .await
            .expect("Could not render page");

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_TRANSACTION, "hx-post");
        assert_form_input(&form, "project_name", "text");
        assert_form_input(&form, "deadline", "date");
        assert_form_input(&form, "price", "number");
        assert_form_input(&form, "payment_proof", "file");
        assert_form_submit_button(&form);

        let customer_selector = Selector::parse("select[name=customer_id] option").unwrap();
        let customer_option = html
            .select(&customer_selector)
            .next()
            .expect("The customer select has no options");
        assert_eq!(customer_option.text().collect::<String>(), "Budi Santoso");

        let employee_selector = Selector::parse("select[name=employee_id] option").unwrap();
        let employee_option = html
            .select(&employee_selector)
            .next()
            .expect("The employee select has no options");
        assert_eq!(employee_option.text().collect::<String>(), "Siti Rahma");
    }
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        customer::{ValidCustomer, create_customer, create_customer_table},
        employee::{ValidEmployee, create_employee, create_employee_table},
        endpoints,
        test_utils::{assert_hx_redirect, must_make_multipart, sample_png, temp_file_store},
        transaction::{
            core::{count_transactions, create_transaction_table, get_transaction},
            progress::{ProgressStatus, create_transaction_progress_table,
                get_transaction_progress},
        },
    };

    use super::{CreateTransactionEndpointState, create_transaction_endpoint};

    fn get_test_state() -> CreateTransactionEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        connection
            .execute_batch("PRAGMA foreign_keys = ON;")
            .expect("Could not enable foreign keys");
        create_customer_table(&connection).expect("Could not create customer table");
        create_employee_table(&connection).expect("Could not create employee table");
        create_transaction_table(&connection).expect("Could not create transaction table");
        create_transaction_progress_table(&connection)
            .expect("Could not create transaction progress table");

        CreateTransactionEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            file_store: temp_file_store(),
            local_timezone: "Asia/Jakarta".to_owned(),
        }
    }

    fn create_test_references(state: &CreateTransactionEndpointState) -> (i64, i64) {
        let connection = state.db_connection.lock().unwrap();
        let customer = create_customer(
            ValidCustomer {
                name: "Budi Santoso".to_owned(),
                phone_number: "081234567890".to_owned(),
            },
            &connection,
        )
        .expect("Could not create test customer");
        let employee = create_employee(
            ValidEmployee {
                name: "Siti Rahma".to_owned(),
                phone_number: "082112345678".to_owned(),
            },
            &connection,
        )
        .expect("Could not create test employee");

        (customer.id, employee.id)
    }

    #[tokio::test]
    async fn can_create_transaction_with_initial_progress() {
        let state = get_test_state();
        let (customer_id, employee_id) = create_test_references(&state);
        let multipart = must_make_multipart(
            &[
                ("project_name", "Landing Page"),
                ("description", "Company profile site"),
                ("customer_id", &customer_id.to_string()),
                ("employee_id", &employee_id.to_string()),
                ("deadline", "2025-12-01"),
                ("price", "2000000"),
                ("payment_method", "Transfer"),
                ("status", "deposit"),
            ],
            &[("payment_proof", &sample_png("proof.png"))],
        )
        .await;

        let response = create_transaction_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).expect("Transaction was not created");
        assert!(transaction.business_id.starts_with("TRTAJOKI-"));
        assert_eq!(transaction.business_id.len(), "TRTAJOKI-".len() + 14);
        assert!(transaction.payment_proof.starts_with("payment_proofs/"));
        assert!(state.file_store.contains(&transaction.payment_proof));

        let progress = get_transaction_progress(transaction.id, &connection)
            .expect("Could not get progress entries");
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].title, "Project Creation");
        assert_eq!(progress[0].status, ProgressStatus::Done);
    }

    #[tokio::test]
    async fn dangling_customer_creates_nothing() {
        let state = get_test_state();
        let (_, employee_id) = create_test_references(&state);
        let multipart = must_make_multipart(
            &[
                ("project_name", "Landing Page"),
                ("customer_id", "999"),
                ("employee_id", &employee_id.to_string()),
                ("deadline", "2025-12-01"),
                ("price", "2000000"),
                ("payment_method", "Transfer"),
                ("status", "deposit"),
            ],
            &[("payment_proof", &sample_png("proof.png"))],
        )
        .await;

        let response = create_transaction_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_payment_proof_creates_nothing() {
        let state = get_test_state();
        let (customer_id, employee_id) = create_test_references(&state);
        let multipart = must_make_multipart(
            &[
                ("project_name", "Landing Page"),
                ("customer_id", &customer_id.to_string()),
                ("employee_id", &employee_id.to_string()),
                ("deadline", "2025-12-01"),
                ("price", "2000000"),
                ("payment_method", "Transfer"),
                ("status", "deposit"),
            ],
            &[],
        )
        .await;

        let response = create_transaction_endpoint(State(state.clone()), multipart).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }
}
