//! Testimonial deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert};

use super::core::{TestimonialId, delete_testimonial};

/// The state needed for deleting a testimonial.
#[derive(Debug, Clone)]
pub struct DeleteTestimonialEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTestimonialEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle testimonial deletion. Returns a success alert or an error alert.
pub async fn delete_testimonial_endpoint(
    Path(testimonial_id): Path<TestimonialId>,
    State(state): State<DeleteTestimonialEndpointState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_testimonial(testimonial_id, &connection) {
        Ok(()) => Alert::SuccessSimple {
            message: "Testimonial deleted successfully".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingTestimonial) => {
            Error::DeleteMissingTestimonial.into_alert_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting testimonial {testimonial_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
