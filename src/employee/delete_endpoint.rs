//! Employee deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert};

use super::core::{EmployeeId, delete_employee};

/// The state needed for deleting an employee.
#[derive(Debug, Clone)]
pub struct DeleteEmployeeEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteEmployeeEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle employee deletion. Returns a success alert or an error alert.
pub async fn delete_employee_endpoint(
    Path(employee_id): Path<EmployeeId>,
    State(state): State<DeleteEmployeeEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_employee(employee_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Employee deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingEmployee) => Error::DeleteMissingEmployee.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting employee {employee_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_employee_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::employee::core::{
        ValidEmployee, count_employees, create_employee, create_employee_table,
    };

    use super::{DeleteEmployeeEndpointState, delete_employee_endpoint};

    fn get_test_state() -> DeleteEmployeeEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_employee_table(&connection).expect("Could not create employee table");

        DeleteEmployeeEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_delete_employee() {
        let state = get_test_state();
        let employee = {
            let connection = state.db_connection.lock().unwrap();
            create_employee(
                ValidEmployee {
                    name: "Siti Rahma".to_owned(),
                    phone_number: "082112345678".to_owned(),
                },
                &connection,
            )
            .expect("Could not create test employee")
        };

        let response = delete_employee_endpoint(Path(employee.id), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_employees(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_missing_employee_returns_not_found() {
        let state = get_test_state();

        let response = delete_employee_endpoint(Path(999), State(state)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
