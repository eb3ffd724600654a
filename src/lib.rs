//! Tajoki Admin is the back office web app for the Tajoki services studio.
//!
//! It manages service categories, customer and employee rosters, the project
//! portfolio, payment proofs, testimonials, user accounts and sales
//! transactions. The library provides a REST API that directly serves HTML
//! pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod category_service;
mod customer;
mod db;
mod employee;
mod endpoints;
mod forms;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod payment_proof;
mod project;
mod routing;
mod storage;
mod testimonial;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use storage::FileStore;
pub use user::{
    CreateUserForm, PasswordHash, User, ValidatedPassword, create_user, get_user_by_email,
};

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A query was given an id that does not refer to an existing row in the
    /// referenced table.
    #[error("a referenced record does not exist")]
    InvalidForeignKey,

    /// The specified category name already exists in the database.
    #[error("the category name already exists in the database")]
    DuplicateCategoryName,

    /// The specified email address already exists in the database.
    #[error("the email address already exists in the database")]
    DuplicateEmail,

    /// Two transactions were created within the same second, producing the
    /// same generated business id. The caller should resubmit.
    #[error("the generated transaction id already exists in the database")]
    DuplicateBusinessId,

    /// An error occurred while writing or deleting a stored file.
    #[error("file storage failed: {0}")]
    Storage(String),

    /// The multipart form could not be read.
    #[error("could not parse multipart form: {0}")]
    Multipart(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// Tried to update a service category that does not exist.
    #[error("tried to update a service category that is not in the database")]
    UpdateMissingCategoryService,

    /// Tried to delete a service category that does not exist.
    #[error("tried to delete a service category that is not in the database")]
    DeleteMissingCategoryService,

    /// Tried to update a customer that does not exist.
    #[error("tried to update a customer that is not in the database")]
    UpdateMissingCustomer,

    /// Tried to delete a customer that does not exist.
    #[error("tried to delete a customer that is not in the database")]
    DeleteMissingCustomer,

    /// Tried to update an employee that does not exist.
    #[error("tried to update an employee that is not in the database")]
    UpdateMissingEmployee,

    /// Tried to delete an employee that does not exist.
    #[error("tried to delete an employee that is not in the database")]
    DeleteMissingEmployee,

    /// Tried to update a project that does not exist.
    #[error("tried to update a project that is not in the database")]
    UpdateMissingProject,

    /// Tried to delete a project that does not exist.
    #[error("tried to delete a project that is not in the database")]
    DeleteMissingProject,

    /// Tried to update a payment proof that does not exist.
    #[error("tried to update a payment proof that is not in the database")]
    UpdateMissingPaymentProof,

    /// Tried to delete a payment proof that does not exist.
    #[error("tried to delete a payment proof that is not in the database")]
    DeleteMissingPaymentProof,

    /// Tried to update a testimonial that does not exist.
    #[error("tried to update a testimonial that is not in the database")]
    UpdateMissingTestimonial,

    /// Tried to delete a testimonial that does not exist.
    #[error("tried to delete a testimonial that is not in the database")]
    DeleteMissingTestimonial,

    /// Tried to update a user that does not exist.
    #[error("tried to update a user that is not in the database")]
    UpdateMissingUser,

    /// Tried to delete a user that does not exist.
    #[error("tried to delete a user that is not in the database")]
    DeleteMissingUser,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_)) if sql_error.extended_code == 787 => {
                Error::InvalidForeignKey
            }
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("category_service.name") =>
            {
                Error::DuplicateCategoryName
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067
                    && desc.ends_with("transaction.business_id") =>
            {
                Error::DuplicateBusinessId
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezone(timezone) => {
                render_internal_server_error(InternalServerErrorPageTemplate {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings \
                        and ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::ErrorSimple {
                    message: "The requested record could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DuplicateCategoryName => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate category name".to_owned(),
                    details: "A service category with that name already exists. \
                        Choose a different name, or edit or delete the existing category."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate email".to_owned(),
                    details: "A user with that email address already exists.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DuplicateBusinessId => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not create transaction".to_owned(),
                    details: "Another transaction was created at the same moment. \
                        Please submit the form again."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidForeignKey => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "A referenced record could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::Storage(details) => {
                tracing::error!("File storage failed: {details}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Could not store the uploaded file".to_owned(),
                        details: "Nothing was saved. Try again later or check the server logs."
                            .to_owned(),
                    }
                    .into_html(),
                )
                    .into_response()
            }
            error @ (Error::UpdateMissingCategoryService
            | Error::UpdateMissingCustomer
            | Error::UpdateMissingEmployee
            | Error::UpdateMissingProject
            | Error::UpdateMissingPaymentProof
            | Error::UpdateMissingTestimonial
            | Error::UpdateMissingUser) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update record".to_owned(),
                    details: error.to_string(),
                }
                .into_html(),
            )
                .into_response(),
            error @ (Error::DeleteMissingCategoryService
            | Error::DeleteMissingCustomer
            | Error::DeleteMissingEmployee
            | Error::DeleteMissingProject
            | Error::DeleteMissingPaymentProof
            | Error::DeleteMissingTestimonial
            | Error::DeleteMissingUser) => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete record".to_owned(),
                    details: format!(
                        "{error}. Try refreshing the page to see if it has already been deleted."
                    ),
                }
                .into_html(),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "An unexpected error occurred, check the server logs for more \
                            details."
                            .to_owned(),
                    }
                    .into_html(),
                )
                    .into_response()
            }
        }
    }
}
