//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/customers/{id}', use [format_endpoint].

/// The root route which redirects to the transactions page.
pub const ROOT: &str = "/";

/// The page listing service categories.
pub const CATEGORY_SERVICES_VIEW: &str = "/category-services";
/// The page for creating a new service category.
pub const NEW_CATEGORY_SERVICE_VIEW: &str = "/category-services/new";
/// The page for editing an existing service category.
pub const EDIT_CATEGORY_SERVICE_VIEW: &str = "/category-services/{id}/edit";
/// The route to create a service category.
pub const POST_CATEGORY_SERVICE: &str = "/category-services";
/// The route to update a service category. Updates go over POST because the
/// edit form submits a multipart body.
pub const UPDATE_CATEGORY_SERVICE: &str = "/category-services/{id}";
/// The route to delete a service category.
pub const DELETE_CATEGORY_SERVICE: &str = "/category-services/{id}";

/// The page listing customers.
pub const CUSTOMERS_VIEW: &str = "/customers";
/// The page for registering a new customer.
pub const NEW_CUSTOMER_VIEW: &str = "/customers/new";
/// The page for editing an existing customer.
pub const EDIT_CUSTOMER_VIEW: &str = "/customers/{id}/edit";
/// The route to create a customer.
pub const POST_CUSTOMER: &str = "/customers";
/// The route to update a customer.
pub const PUT_CUSTOMER: &str = "/customers/{id}";
/// The route to delete a customer.
pub const DELETE_CUSTOMER: &str = "/customers/{id}";

/// The page listing employees.
pub const EMPLOYEES_VIEW: &str = "/employees";
/// The page for registering a new employee.
pub const NEW_EMPLOYEE_VIEW: &str = "/employees/new";
/// The page for editing an existing employee.
pub const EDIT_EMPLOYEE_VIEW: &str = "/employees/{id}/edit";
/// The route to create an employee.
pub const POST_EMPLOYEE: &str = "/employees";
/// The route to update an employee.
pub const PUT_EMPLOYEE: &str = "/employees/{id}";
/// The route to delete an employee.
pub const DELETE_EMPLOYEE: &str = "/employees/{id}";

/// The page listing portfolio projects.
pub const PROJECTS_VIEW: &str = "/projects";
/// The page for creating a new project.
pub const NEW_PROJECT_VIEW: &str = "/projects/new";
/// The page for editing an existing project.
pub const EDIT_PROJECT_VIEW: &str = "/projects/{id}/edit";
/// The route to create a project.
pub const POST_PROJECT: &str = "/projects";
/// The route to update a project.
pub const PUT_PROJECT: &str = "/projects/{id}";
/// The route to delete a project.
pub const DELETE_PROJECT: &str = "/projects/{id}";

/// The page listing payment proofs.
pub const PAYMENT_PROOFS_VIEW: &str = "/payment-proofs";
/// The page for uploading a new payment proof.
pub const NEW_PAYMENT_PROOF_VIEW: &str = "/payment-proofs/new";
/// The page for editing an existing payment proof.
pub const EDIT_PAYMENT_PROOF_VIEW: &str = "/payment-proofs/{id}/edit";
/// The route to create a payment proof.
pub const POST_PAYMENT_PROOF: &str = "/payment-proofs";
/// The route to update a payment proof.
pub const PUT_PAYMENT_PROOF: &str = "/payment-proofs/{id}";
/// The route to delete a payment proof.
pub const DELETE_PAYMENT_PROOF: &str = "/payment-proofs/{id}";

/// The page listing testimonials.
pub const TESTIMONIES_VIEW: &str = "/testimonies";
/// The page for adding a new testimonial.
pub const NEW_TESTIMONIAL_VIEW: &str = "/testimonies/new";
/// The page for editing an existing testimonial.
pub const EDIT_TESTIMONIAL_VIEW: &str = "/testimonies/{id}/edit";
/// The route to create a testimonial.
pub const POST_TESTIMONIAL: &str = "/testimonies";
/// The route to update a testimonial.
pub const PUT_TESTIMONIAL: &str = "/testimonies/{id}";
/// The route to delete a testimonial.
pub const DELETE_TESTIMONIAL: &str = "/testimonies/{id}";

/// The page listing users.
pub const USERS_VIEW: &str = "/users";
/// The page for adding a new user.
pub const NEW_USER_VIEW: &str = "/users/new";
/// The page for editing an existing user.
pub const EDIT_USER_VIEW: &str = "/users/{id}/edit";
/// The route to create a user.
pub const POST_USER: &str = "/users";
/// The route to update a user.
pub const PUT_USER: &str = "/users/{id}";
/// The route to delete a user.
pub const DELETE_USER: &str = "/users/{id}";

/// The page listing transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The route to create a transaction. There is no update or delete route;
/// transactions are an append-only record.
pub const POST_TRANSACTION: &str = "/transactions";

/// The route for static files.
pub const STATIC: &str = "/static";
/// The route serving stored uploads. Stored paths become URLs when prefixed
/// with this root.
pub const STORAGE: &str = "/storage";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace and ends with a
/// right brace, for example '{id}' in '/customers/{id}'. This function
/// assumes that an endpoint path only contains ASCII characters and a single
/// parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use super::format_endpoint;

    #[track_caller]
    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            super::ROOT,
            super::CATEGORY_SERVICES_VIEW,
            super::NEW_CATEGORY_SERVICE_VIEW,
            super::CUSTOMERS_VIEW,
            super::EMPLOYEES_VIEW,
            super::PROJECTS_VIEW,
            super::PAYMENT_PROOFS_VIEW,
            super::TESTIMONIES_VIEW,
            super::USERS_VIEW,
            super::TRANSACTIONS_VIEW,
            super::NEW_TRANSACTION_VIEW,
            super::STATIC,
            super::STORAGE,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn formats_id_into_parameter() {
        assert_eq!(
            format_endpoint(super::EDIT_CUSTOMER_VIEW, 42),
            "/customers/42/edit"
        );
    }

    #[test]
    fn path_without_parameter_is_unchanged() {
        assert_eq!(format_endpoint(super::CUSTOMERS_VIEW, 42), "/customers");
    }
}
