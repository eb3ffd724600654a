//! Alert fragments for displaying success and error messages to users.
//!
//! Mutating endpoints respond with these fragments, which HTMX swaps into the
//! alert container rendered by [crate::html::base].

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

const ALERT_SUCCESS_STYLE: &str = "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
    text-green-800 bg-green-50 border-green-300 dark:bg-gray-800 dark:text-green-400 \
    dark:border-green-800";

const ALERT_ERROR_STYLE: &str = "flex items-start gap-3 p-4 mb-4 text-sm rounded-lg border \
    text-red-800 bg-red-50 border-red-300 dark:bg-gray-800 dark:text-red-400 \
    dark:border-red-800";

/// A flash message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An operation succeeded.
    Success {
        /// Short summary, e.g. "Customer created".
        message: String,
        /// A longer explanation shown below the summary.
        details: String,
    },
    /// An operation succeeded, no details needed.
    SuccessSimple {
        /// Short summary, e.g. "Customer deleted".
        message: String,
    },
    /// An operation failed.
    Error {
        /// Short summary of what went wrong.
        message: String,
        /// A longer explanation, ideally including how to fix the problem.
        details: String,
    },
    /// An operation failed, no details needed.
    ErrorSimple {
        /// Short summary of what went wrong.
        message: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band swap targeting the alert container.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (ALERT_SUCCESS_STYLE, message, Some(details)),
            Alert::SuccessSimple { message } => (ALERT_SUCCESS_STYLE, message, None),
            Alert::Error { message, details } => (ALERT_ERROR_STYLE, message, Some(details)),
            Alert::ErrorSimple { message } => (ALERT_ERROR_STYLE, message, None),
        };

        html! {
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(style) role="alert"
                {
                    div
                    {
                        p class="font-medium" { (message) }

                        @if let Some(details) = details {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-auto -mx-1.5 -my-1.5 rounded-lg p-1.5 hover:bg-gray-200 dark:hover:bg-gray-700"
                        onclick="this.closest('#alert-container').innerHTML = ''"
                        aria-label="Close"
                    {
                        "✕"
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
