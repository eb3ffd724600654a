//! Service category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, storage::FileStore};

use super::core::{CategoryServiceId, delete_category_service, get_category_service};

/// The state needed for deleting a service category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryServiceEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
}

impl FromRef<AppState> for DeleteCategoryServiceEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
        }
    }
}

/// Handle service category deletion.
///
/// The stored image is removed after the row, on a best-effort basis.
pub async fn delete_category_service_endpoint(
    Path(category_id): Path<CategoryServiceId>,
    State(state): State<DeleteCategoryServiceEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let image_path = match get_category_service(category_id, &connection) {
        Ok(category) => Some(category.image),
        Err(Error::NotFound) => None,
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while fetching category {category_id}: {error}"
            );
            return error.into_alert_response();
        }
    };

    match delete_category_service(category_id, &connection) {
        Ok(()) => {
            if let Some(image_path) = &image_path {
                state.file_store.delete(image_path);
            }

            Alert::SuccessSimple {
                message: "Category deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(Error::DeleteMissingCategoryService) => {
            Error::DeleteMissingCategoryService.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting category {category_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod delete_category_service_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        category_service::core::{
            ValidCategoryService, count_category_services, create_category_service,
            create_category_service_table,
        },
        test_utils::{sample_png, temp_file_store},
    };

    use super::{DeleteCategoryServiceEndpointState, delete_category_service_endpoint};

    fn get_test_state() -> DeleteCategoryServiceEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_category_service_table(&connection)
            .expect("Could not create category service table");

        DeleteCategoryServiceEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
            file_store: temp_file_store(),
        }
    }

    #[tokio::test]
    async fn can_delete_category_and_stored_image() {
        let state = get_test_state();
        let image_path = state
            .file_store
            .save("category_services", &sample_png("logo.jpg"))
            .expect("Could not store test image");
        let category = {
            let connection = state.db_connection.lock().unwrap();
            create_category_service(
                ValidCategoryService {
                    name: "Logo Design".to_owned(),
                    description: None,
                    start_from: 500_000,
                },
                &image_path,
                &connection,
            )
            .expect("Could not create test category")
        };

        let response =
            delete_category_service_endpoint(Path(category.id), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            !state.file_store.contains(&image_path),
            "the stored image should have been deleted"
        );

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_category_services(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_missing_category_returns_not_found() {
        let state = get_test_state();

        let response = delete_category_service_endpoint(Path(999), State(state)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
