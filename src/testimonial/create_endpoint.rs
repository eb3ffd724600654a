//! Testimonial creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

use super::core::{TestimonialForm, create_testimonial};

/// The state needed for creating a testimonial.
#[derive(Debug, Clone)]
pub struct CreateTestimonialEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTestimonialEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the testimonial creation page.
pub async fn get_new_testimonial_page() -> Response {
    new_testimonial_view().into_response()
}

/// Handle testimonial creation form submission.
pub async fn create_testimonial_endpoint(
    State(state): State<CreateTestimonialEndpointState>,
    Form(form): Form<TestimonialForm>,
) -> Response {
    let testimonial = match form.validate() {
        Ok(testimonial) => testimonial,
        Err(errors) => return errors.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_testimonial(testimonial, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TESTIMONIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a testimonial: {error}");

            error.into_alert_response()
        }
    }
}

fn new_testimonial_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::TESTIMONIES_VIEW).into_html();

    let form = html! {
        form
            hx-post=(endpoints::POST_TESTIMONIAL)
            hx-target-error="#alert-container"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="customer_name" class=(FORM_LABEL_STYLE) { "Customer Name" }

                input
                    id="customer_name"
                    type="text"
                    name="customer_name"
                    placeholder="Customer name"
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Feedback" }

                textarea
                    id="description"
                    name="description"
                    rows="4"
                    placeholder="What did the customer say?"
                    required
                    class=(FORM_TEXT_INPUT_STYLE) {}
            }

            div
            {
                label for="rating" class=(FORM_LABEL_STYLE) { "Rating (1-5)" }

                input
                    id="rating"
                    type="number"
                    name="rating"
                    min="1"
                    max="5"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Testimonial" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Add Testimonial", &content)
}
