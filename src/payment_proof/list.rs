//! Payment proofs listing page.

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
    PAYMENT_PROOFS_PER_PAGE, PaymentProof, count_payment_proofs,
    get_payment_proofs_page as query_page,
};

/// How many characters of the description to show in the table.
const DESCRIPTION_PREVIEW_LENGTH: usize = 60;

/// The state needed for the payment proofs listing page.
#[derive(Debug, Clone)]
pub struct PaymentProofsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for PaymentProofsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the payment proofs listing page.
pub async fn get_payment_proofs_page(
    State(state): State<PaymentProofsPageState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let curr_page = query.page.unwrap_or(state.pagination_config.default_page).max(1);
    let total = count_payment_proofs(&connection)?;
    let proofs = query_page(
        PAYMENT_PROOFS_PER_PAGE,
        (curr_page - 1) * PAYMENT_PROOFS_PER_PAGE,
        &connection,
    )?;

    let indicators = create_pagination_indicators(
        curr_page,
        page_count(total, PAYMENT_PROOFS_PER_PAGE),
        state.pagination_config.max_indicators,
    );

    Ok(payment_proofs_view(&proofs, &indicators, total).into_response())
}

fn payment_proofs_view(
    proofs: &[PaymentProof],
    indicators: &[PaginationIndicator],
    total: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::PAYMENT_PROOFS_VIEW).into_html();

    let table_row = |proof: &PaymentProof| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_PAYMENT_PROOF_VIEW, proof.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_PAYMENT_PROOF, proof.id);
        let confirm_message = "Are you sure you want to delete this payment proof?".to_owned();
        let image_url = format!("{}/{}", endpoints::STORAGE, proof.image);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    img
                        src=(image_url)
                        alt="Payment proof"
                        class="h-12 w-12 object-cover rounded";
                }
                td class=(TABLE_CELL_STYLE)
                {
                    (truncate_for_table(&proof.description, DESCRIPTION_PREVIEW_LENGTH))
                }
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
                    h1 class="text-xl font-bold" { "Payment Proofs" }

                    a href=(endpoints::NEW_PAYMENT_PROOF_VIEW) class=(LINK_STYLE)
                    {
                        "Upload Proof"
                    }
                }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Proof" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for proof in proofs {
                            (table_row(proof))
                        }
                    }
                }

                (pagination_nav(indicators, endpoints::PAYMENT_PROOFS_VIEW, total))
            }
        }
    );

    base("Payment Proofs", &content)
}

#[cfg(test)]
mod payment_proofs_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        pagination::{PageQuery, PaginationConfig},
        payment_proof::core::{
            ValidPaymentProof, create_payment_proof, create_payment_proof_table,
        },
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{PaymentProofsPageState, get_payment_proofs_page};

    fn get_test_state() -> PaymentProofsPageState {
        let connection = Connection::open_in_memory().unwrap();
        create_payment_proof_table(&connection).expect("Could not create payment proof table");

        PaymentProofsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        }
    }

    #[tokio::test]
    async fn page_lists_proofs_with_storage_image_urls() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_payment_proof(
                ValidPaymentProof {
                    description: "Deposit for invoice #123".to_owned(),
                },
                "payment_proofs/abc.jpg",
                &connection,
            )
            .expect("Could not create test payment proof");
        }

        let response = get_payment_proofs_page(State(state), Query(PageQuery { page: None }))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Deposit for invoice #123"));
        assert!(text.contains("1 total"));

        let img_selector = Selector::parse("img").unwrap();
        let img = html
            .select(&img_selector)
            .next()
            .expect("The page is missing the payment proof image");
        assert_eq!(
            img.value().attr("src"),
            Some("/storage/payment_proofs/abc.jpg")
        );
    }
}
