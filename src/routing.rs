//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category_service::{
        create_category_service_endpoint, delete_category_service_endpoint,
        get_category_services_page, get_edit_category_service_page,
        get_new_category_service_page, update_category_service_endpoint,
    },
    customer::{
        create_customer_endpoint, delete_customer_endpoint, get_customers_page,
        get_edit_customer_page, get_new_customer_page, update_customer_endpoint,
    },
    employee::{
        create_employee_endpoint, delete_employee_endpoint, get_edit_employee_page,
        get_employees_page, get_new_employee_page, update_employee_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    payment_proof::{
        create_payment_proof_endpoint, delete_payment_proof_endpoint,
        get_edit_payment_proof_page, get_new_payment_proof_page, get_payment_proofs_page,
        update_payment_proof_endpoint,
    },
    project::{
        create_project_endpoint, delete_project_endpoint, get_edit_project_page,
        get_new_project_page, get_projects_page, update_project_endpoint,
    },
    testimonial::{
        create_testimonial_endpoint, delete_testimonial_endpoint, get_edit_testimonial_page,
        get_new_testimonial_page, get_testimonials_page, update_testimonial_endpoint,
    },
    transaction::{
        create_transaction_endpoint, get_new_transaction_page, get_transactions_page,
    },
    user::{
        create_user_endpoint, delete_user_endpoint, get_edit_user_page, get_new_user_page,
        get_users_page, update_user_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Stored uploads are served under [endpoints::STORAGE] straight from the
/// file store's root directory.
pub fn build_router(state: AppState) -> Router {
    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::CATEGORY_SERVICES_VIEW,
            get(get_category_services_page),
        )
        .route(
            endpoints::NEW_CATEGORY_SERVICE_VIEW,
            get(get_new_category_service_page),
        )
        .route(
            endpoints::EDIT_CATEGORY_SERVICE_VIEW,
            get(get_edit_category_service_page),
        )
        .route(endpoints::CUSTOMERS_VIEW, get(get_customers_page))
        .route(endpoints::NEW_CUSTOMER_VIEW, get(get_new_customer_page))
        .route(endpoints::EDIT_CUSTOMER_VIEW, get(get_edit_customer_page))
        .route(endpoints::EMPLOYEES_VIEW, get(get_employees_page))
        .route(endpoints::NEW_EMPLOYEE_VIEW, get(get_new_employee_page))
        .route(endpoints::EDIT_EMPLOYEE_VIEW, get(get_edit_employee_page))
        .route(endpoints::PROJECTS_VIEW, get(get_projects_page))
        .route(endpoints::NEW_PROJECT_VIEW, get(get_new_project_page))
        .route(endpoints::EDIT_PROJECT_VIEW, get(get_edit_project_page))
        .route(endpoints::PAYMENT_PROOFS_VIEW, get(get_payment_proofs_page))
        .route(
            endpoints::NEW_PAYMENT_PROOF_VIEW,
            get(get_new_payment_proof_page),
        )
        .route(
            endpoints::EDIT_PAYMENT_PROOF_VIEW,
            get(get_edit_payment_proof_page),
        )
        .route(endpoints::TESTIMONIES_VIEW, get(get_testimonials_page))
        .route(
            endpoints::NEW_TESTIMONIAL_VIEW,
            get(get_new_testimonial_page),
        )
        .route(
            endpoints::EDIT_TESTIMONIAL_VIEW,
            get(get_edit_testimonial_page),
        )
        .route(endpoints::USERS_VIEW, get(get_users_page))
        .route(endpoints::NEW_USER_VIEW, get(get_new_user_page))
        .route(endpoints::EDIT_USER_VIEW, get(get_edit_user_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::POST_CATEGORY_SERVICE,
            post(create_category_service_endpoint),
        )
        .route(
            endpoints::UPDATE_CATEGORY_SERVICE,
            post(update_category_service_endpoint)
                .delete(delete_category_service_endpoint),
        )
        .route(endpoints::POST_CUSTOMER, post(create_customer_endpoint))
        .route(
            endpoints::PUT_CUSTOMER,
            put(update_customer_endpoint).delete(delete_customer_endpoint),
        )
        .route(endpoints::POST_EMPLOYEE, post(create_employee_endpoint))
        .route(
            endpoints::PUT_EMPLOYEE,
            put(update_employee_endpoint).delete(delete_employee_endpoint),
        )
        .route(endpoints::POST_PROJECT, post(create_project_endpoint))
        .route(
            endpoints::PUT_PROJECT,
            put(update_project_endpoint).delete(delete_project_endpoint),
        )
        .route(
            endpoints::POST_PAYMENT_PROOF,
            post(create_payment_proof_endpoint),
        )
        .route(
            endpoints::PUT_PAYMENT_PROOF,
            put(update_payment_proof_endpoint).delete(delete_payment_proof_endpoint),
        )
        .route(
            endpoints::POST_TESTIMONIAL,
            post(create_testimonial_endpoint),
        )
        .route(
            endpoints::PUT_TESTIMONIAL,
            put(update_testimonial_endpoint).delete(delete_testimonial_endpoint),
        )
        .route(endpoints::POST_USER, post(create_user_endpoint))
        .route(
            endpoints::PUT_USER,
            put(update_user_endpoint).delete(delete_user_endpoint),
        )
        .route(
            endpoints::POST_TRANSACTION,
            post(create_transaction_endpoint),
        );

    view_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .nest_service(
            endpoints::STORAGE,
            ServeDir::new(state.file_store.root()),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the transactions page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}
