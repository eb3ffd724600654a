//! Testimonial edit page and update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
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

use super::core::{
    Testimonial, TestimonialForm, TestimonialId, get_testimonial, update_testimonial,
};

/// The state needed for editing a testimonial.
#[derive(Debug, Clone)]
pub struct EditTestimonialEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTestimonialEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the edit page for a testimonial.
pub async fn get_edit_testimonial_page(
    State(state): State<EditTestimonialEndpointState>,
    Path(testimonial_id): Path<TestimonialId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let testimonial = get_testimonial(testimonial_id, &connection)?;

    Ok(edit_testimonial_view(&testimonial).into_response())
}

/// Handle testimonial update form submission.
pub async fn update_testimonial_endpoint(
    State(state): State<EditTestimonialEndpointState>,
    Path(testimonial_id): Path<TestimonialId>,
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

    match update_testimonial(testimonial_id, testimonial, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::TESTIMONIES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while updating a testimonial: {error}");

            error.into_alert_response()
        }
    }
}

fn edit_testimonial_view(testimonial: &Testimonial) -> Markup {
    let nav_bar = NavBar::new(endpoints::TESTIMONIES_VIEW).into_html();
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_TESTIMONIAL, testimonial.id);

    let form = html! {
        form
            hx-put=(update_endpoint)
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
                    value=(testimonial.customer_name)
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
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (testimonial.description)
                }
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
                    value=(testimonial.rating)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Testimonial" }
        }
    };

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Testimonial", &content)
}


#[cfg(test)]
mod update_testimonial_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        endpoints,
        test_utils::assert_hx_redirect,
        testimonial::core::{
            TestimonialForm, ValidTestimonial, create_testimonial, create_testimonial_table,
            get_testimonial,
        },
    };

    use super::{EditTestimonialEndpointState, update_testimonial_endpoint};

    fn get_test_state() -> EditTestimonialEndpointState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_testimonial_table(&connection).expect("Could not create testimonial table");

        EditTestimonialEndpointState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn can_update_testimonial() {
        let state = get_test_state();
        let testimonial = {
            let connection = state.db_connection.lock().unwrap();
            create_testimonial(
                ValidTestimonial {
                    customer_name: "Budi".to_owned(),
                    description: "Good.".to_owned(),
                    rating: 3,
                },
                &connection,
            )
            .expect("Could not create test testimonial")
        };

        let form = TestimonialForm {
            customer_name: "Budi Santoso".to_owned(),
            description: "Great service, would hire again.".to_owned(),
            rating: "5".to_owned(),
        };

        let response =
            update_testimonial_endpoint(State(state.clone()), Path(testimonial.id), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::TESTIMONIES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_testimonial(testimonial.id, &connection).unwrap();
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.description, "Great service, would hire again.");
    }

    #[tokio::test]
    async fn updating_missing_testimonial_fails() {
        let state = get_test_state();
        let form = TestimonialForm {
            customer_name: "Budi".to_owned(),
            description: "Good.".to_owned(),
            rating: "3".to_owned(),
        };

        let response = update_testimonial_endpoint(State(state), Path(999), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
