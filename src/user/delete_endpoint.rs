//! User deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert};

use super::core::{UserId, delete_user};

/// The state needed for deleting a user.
#[derive(Debug, Clone)]
pub struct DeleteUserEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteUserEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle user deletion. Returns a success alert or an error alert.
pub async fn delete_user_endpoint(
    Path(user_id): Path<UserId>,
    State(state): State<DeleteUserEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_user(user_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "User deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingUser) => Error::DeleteMissingUser.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting user {user_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_user_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::user::{
        core::{ValidUserProfile, count_users, create_user, create_user_table},
        password::PasswordHash,
    };

    use super::{DeleteUserEndpointState, delete_user_endpoint};

    fn get_test_state() -> DeleteUserEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        DeleteUserEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_delete_user() {
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

        let response = delete_user_endpoint(Path(user.id), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_users(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_missing_user_returns_not_found() {
        let state = get_test_state();

        let response = delete_user_endpoint(Path(999), State(state)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
