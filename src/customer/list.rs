//! Customers listing page.

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

use super::core::{CUSTOMERS_PER_PAGE, Customer, count_customers, get_customers_page as query_page};

/// The state needed for the customers listing page.
#[derive(Debug, Clone)]
pub struct CustomersPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for CustomersPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the customers listing page.
pub async fn get_customers_page(
    State(state): State<CustomersPageState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let curr_page = query.page.unwrap_or(state.pagination_config.default_page).max(1);
    let total = count_customers(&connection)?;
    let customers = query_page(CUSTOMERS_PER_PAGE, (curr_page - 1) * CUSTOMERS_PER_PAGE, &connection)?;

    let indicators = create_pagination_indicators(
        curr_page,
        page_count(total, CUSTOMERS_PER_PAGE),
        state.pagination_config.max_indicators,
    );

    Ok(customers_view(&customers, &indicators, total).into_response())
}

fn customers_view(
    customers: &[Customer],
    indicators: &[PaginationIndicator],
    total: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();

    let table_row = |customer: &Customer| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_CUSTOMER_VIEW, customer.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CUSTOMER, customer.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", customer.name);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (customer.name) }
                td class=(TABLE_CELL_STYLE) { (customer.phone_number) }
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
                    h1 class="text-xl font-bold" { "Customers" }

                    a href=(endpoints::NEW_CUSTOMER_VIEW) class=(LINK_STYLE) { "Register Customer" }
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
                        @for customer in customers {
                            (table_row(customer))
                        }
                    }
                }

                (pagination_nav(indicators, endpoints::CUSTOMERS_VIEW, total))
            }
        }
    );

    base("Customers", &content)
}

#[cfg(test)]
mod customers_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;

    use crate::{
        customer::core::{ValidCustomer, create_customer, create_customer_table},
        pagination::{PageQuery, PaginationConfig},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{CustomersPageState, get_customers_page};

    fn get_test_state() -> CustomersPageState {
        let connection = Connection::open_in_memory().unwrap();
        create_customer_table(&connection).expect("Could not create customer table");

        CustomersPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        }
    }

    #[tokio::test]
    async fn page_lists_customers() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_customer(
                ValidCustomer {
                    name: "Budi Santoso".to_owned(),
                    phone_number: "081234567890".to_owned(),
                },
                &connection,
            )
            .expect("Could not create test customer");
        }

        let response = get_customers_page(State(state), Query(PageQuery { page: None }))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Budi Santoso"));
        assert!(text.contains("081234567890"));
        assert!(text.contains("1 total"));
    }
}
