//! Service categories listing page.

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
        base, edit_delete_action_links, format_rupiah, truncate_for_table,
    },
    navigation::NavBar,
    pagination::{
        PageQuery, PaginationConfig, PaginationIndicator, create_pagination_indicators, page_count,
        pagination_nav,
    },
};

use super::core::{
    CATEGORY_SERVICES_PER_PAGE, CategoryService, count_category_services,
    get_category_services_page as query_page,
};

/// How many characters of the description to show in the table.
const DESCRIPTION_PREVIEW_LENGTH: usize = 60;

/// The state needed for the service categories listing page.
#[derive(Debug, Clone)]
pub struct CategoryServicesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CategoryServicesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the service categories listing page.
pub async fn get_category_services_page(
    State(state): State<CategoryServicesPageState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let curr_page = query.page.unwrap_or(state.pagination_config.default_page).max(1);
    let total = count_category_services(&connection)?;
    let categories = query_page(
        CATEGORY_SERVICES_PER_PAGE,
        (curr_page - 1) * CATEGORY_SERVICES_PER_PAGE,
        &connection,
    )?;

    let indicators = create_pagination_indicators(
        curr_page,
        page_count(total, CATEGORY_SERVICES_PER_PAGE),
        state.pagination_config.max_indicators,
    );

    Ok(category_services_view(&categories, &indicators, total).into_response())
}

fn category_services_view(
    categories: &[CategoryService],
    indicators: &[PaginationIndicator],
    total: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORY_SERVICES_VIEW).into_html();

    let table_row = |category: &CategoryService| {
        let edit_url =
            endpoints::format_endpoint(endpoints::EDIT_CATEGORY_SERVICE_VIEW, category.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CATEGORY_SERVICE, category.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", category.name);
        let image_url = format!("{}/{}", endpoints::STORAGE, category.image);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    img
                        src=(image_url)
                        alt=(category.name)
                        class="h-12 w-12 object-cover rounded";
                }
                td class=(TABLE_CELL_STYLE) { (category.name) }
                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(description) = &category.description {
                        (truncate_for_table(description, DESCRIPTION_PREVIEW_LENGTH))
                    }
                }
                td class=(TABLE_CELL_STYLE) { (format_rupiah(category.start_from)) }
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
                    h1 class="text-xl font-bold" { "Service Categories" }

                    a href=(endpoints::NEW_CATEGORY_SERVICE_VIEW) class=(LINK_STYLE)
                    {
                        "Add Category"
                    }
                }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Image" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Starting Price" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for category in categories {
                            (table_row(category))
                        }
                    }
                }

                (pagination_nav(indicators, endpoints::CATEGORY_SERVICES_VIEW, total))
            }
        }
    );

    base("Service Categories", &content)
}
