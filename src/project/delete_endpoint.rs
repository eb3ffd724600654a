//! Project deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, storage::FileStore};

use super::core::{ProjectId, delete_project, get_project};

/// The state needed for deleting a project.
#[derive(Debug, Clone)]
pub struct DeleteProjectEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub file_store: FileStore,
}

impl FromRef<AppState> for DeleteProjectEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            file_store: state.file_store.clone(),
        }
    }
}

/// Handle project deletion.
///
/// The stored poster, if any, is removed after the row, on a best-effort
/// basis.
pub async fn delete_project_endpoint(
    Path(project_id): Path<ProjectId>,
    State(state): State<DeleteProjectEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let poster_path = match get_project(project_id, &connection) {
        Ok(project) => project.poster,
        Err(Error::NotFound) => None,
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while fetching project {project_id}: {error}"
            );
            return error.into_alert_response();
        }
    };

    match delete_project(project_id, &connection) {
        Ok(()) => {
            if let Some(poster_path) = &poster_path {
                state.file_store.delete(poster_path);
            }

            Alert::SuccessSimple {
                message: "Project deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(Error::DeleteMissingProject) => Error::DeleteMissingProject.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting project {project_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
