//! Transactions listing page.

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
        LINK_STYLE, PAGE_CONTAINER_STYLE, STATUS_BADGE_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_rupiah,
    },
    navigation::NavBar,
    pagination::{
        PageQuery, PaginationConfig, PaginationIndicator, create_pagination_indicators, page_count,
        pagination_nav,
    },
};

use super::core::{
    PaymentStatus, TRANSACTIONS_PER_PAGE, TransactionListing, count_transactions,
    get_transactions_page as query_page,
};

/// The state needed for the transactions listing page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the transactions listing page.
///
/// Transactions are append-only, so the table has no edit or delete actions.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let curr_page = query.page.unwrap_or(state.pagination_config.default_page).max(1);
    let total = count_transactions(&connection)?;
    let transactions = query_page(
        TRANSACTIONS_PER_PAGE,
        (curr_page - 1) * TRANSACTIONS_PER_PAGE,
        &connection,
    )?;

    let indicators = create_pagination_indicators(
        curr_page,
        page_count(total, TRANSACTIONS_PER_PAGE),
        state.pagination_config.max_indicators,
    );

    Ok(transactions_view(&transactions, &indicators, total).into_response())
}

fn transactions_view(
    transactions: &[TransactionListing],
    indicators: &[PaginationIndicator],
    total: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let table_row = |listing: &TransactionListing| {
        let transaction = &listing.transaction;
        let proof_url = format!("{}/{}", endpoints::STORAGE, transaction.payment_proof);
        let status_label = match transaction.status {
            PaymentStatus::Deposit => "Deposit",
            PaymentStatus::Paid => "Paid",
        };

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { (transaction.business_id) }
                td class=(TABLE_CELL_STYLE) { (transaction.project_name) }
                td class=(TABLE_CELL_STYLE) { (listing.customer_name) }
                td class=(TABLE_CELL_STYLE) { (listing.employee_name) }
                td class=(TABLE_CELL_STYLE) { (transaction.deadline) }
                td class=(TABLE_CELL_STYLE) { (format_rupiah(transaction.price)) }
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(STATUS_BADGE_STYLE) { (status_label) }
                }
                td class=(TABLE_CELL_STYLE)
                {
                    a href=(proof_url) target="_blank" class=(LINK_STYLE) { "View" }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Transactions" }

                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Add Transaction"
                    }
                }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Business Id" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Project" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Employee" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Deadline" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Proof" }
                        }
                    }

                    tbody
                    {
                        @for listing in transactions {
                            (table_row(listing))
                        }
                    }
                }

                (pagination_nav(indicators, endpoints::TRANSACTIONS_VIEW, total))
            }
        }
    );

    base("Transactions", &content)
}
