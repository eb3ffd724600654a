//! Employees listing page.

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
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    pagination::{
        PageQuery, PaginationConfig, PaginationIndicator, create_pagination_indicators, page_count,
        pagination_nav,
    },
};

use super::core::{EMPLOYEES_PER_PAGE, Employee, count_employees, get_employees_page as query_page};

/// The state needed for the employees listing page.
#[derive(Debug, Clone)]
pub struct EmployeesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for EmployeesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the employees listing page.
pub async fn get_employees_page(
    State(state): State<EmployeesPageState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let curr_page = query.page.unwrap_or(state.pagination_config.default_page).max(1);
    let total = count_employees(&connection)?;
    let employees = query_page(EMPLOYEES_PER_PAGE, (curr_page - 1) * EMPLOYEES_PER_PAGE, &connection)?;

    let indicators = create_pagination_indicators(
        curr_page,
        page_count(total, EMPLOYEES_PER_PAGE),
        state.pagination_config.max_indicators,
    );

    Ok(employees_view(&employees, &indicators, total).into_response())
}

fn employees_view(
    employees: &[Employee],
    indicators: &[PaginationIndicator],
    total: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EMPLOYEES_VIEW).into_html();

    let table_row = |employee: &Employee| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_EMPLOYEE_VIEW, employee.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_EMPLOYEE, employee.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", employee.name);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (employee.name) }
                td class=(TABLE_CELL_STYLE) { (employee.phone_number) }
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
                    h1 class="text-xl font-bold" { "Employees" }

                    a href=(endpoints::NEW_EMPLOYEE_VIEW) class=(LINK_STYLE) { "Register Employee" }
                }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Phone Number" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for employee in employees {
                            (table_row(employee))
                        }
                    }
                }

                (pagination_nav(indicators, endpoints::EMPLOYEES_VIEW, total))
            }
        }
    );

    base("Employees", &content)
}
