//! Testimonials listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, truncate_for_table,
    },
    navigation::NavBar,
    pagination::{
        PageQuery, PaginationConfig, PaginationIndicator, create_pagination_indicators, page_count,
        pagination_nav,
    },
};

use super::core::{
    TESTIMONIALS_PER_PAGE, Testimonial, count_testimonials, get_testimonials_page as query_page,
};

/// How many characters of the feedback text to show in the table.
const DESCRIPTION_PREVIEW_LENGTH: usize = 60;

/// The state needed for the testimonials listing page.
#[derive(Debug, Clone)]
pub struct TestimonialsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TestimonialsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the testimonials listing page.
pub async fn get_testimonials_page(
    State(state): State<TestimonialsPageState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let curr_page = query.page.unwrap_or(state.pagination_config.default_page).max(1);
    let total = count_testimonials(&connection)?;
    let testimonials = query_page(
        TESTIMONIALS_PER_PAGE,
        (curr_page - 1) * TESTIMONIALS_PER_PAGE,
        &connection,
    )?;

    let indicators = create_pagination_indicators(
        curr_page,
        page_count(total, TESTIMONIALS_PER_PAGE),
        state.pagination_config.max_indicators,
    );

    Ok(testimonials_view(&testimonials, &indicators, total).into_response())
}

fn testimonials_view(
    testimonials: &[Testimonial],
    indicators: &[PaginationIndicator],
    total: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TESTIMONIES_VIEW).into_html();

    let table_row = |testimonial: &Testimonial| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_TESTIMONIAL_VIEW, testimonial.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_TESTIMONIAL, testimonial.id);
        let confirm_message = format!(
            "Are you sure you want to delete the testimonial from '{}'?",
            testimonial.customer_name
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (testimonial.customer_name) }
                td class=(TABLE_CELL_STYLE)
                {
                    (truncate_for_table(&testimonial.description, DESCRIPTION_PREVIEW_LENGTH))
                }
                td class=(TABLE_CELL_STYLE) { (testimonial.rating) "/5" }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Testimonials" }

                    a href=(endpoints::NEW_TESTIMONIAL_VIEW) class=(LINK_STYLE) { "Add Testimonial" }
                }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Feedback" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Rating" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for testimonial in testimonials {
                            (table_row(testimonial))
                        }
                    }
                }

                (pagination_nav(indicators, endpoints::TESTIMONIES_VIEW, total))
            }
        }
    );

    base("Testimonials", &content)
}
