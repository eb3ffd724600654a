//! Portfolio projects listing page.

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
    PROJECTS_PER_PAGE, ProjectListing, count_projects, get_projects_page as query_page,
};

/// How many characters of the description to show in the table.
const DESCRIPTION_PREVIEW_LENGTH: usize = 60;

/// The state needed for the projects listing page.
#[derive(Debug, Clone)]
pub struct ProjectsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ProjectsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the projects listing page.
pub async fn get_projects_page(
    State(state): State<ProjectsPageState>,
    Query(query): Query<PageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let curr_page = query.page.unwrap_or(state.pagination_config.default_page).max(1);
    let total = count_projects(&connection)?;
    let listings = query_page(
        PROJECTS_PER_PAGE,
        (curr_page - 1) * PROJECTS_PER_PAGE,
        &connection,
    )?;

    let indicators = create_pagination_indicators(
        curr_page,
        page_count(total, PROJECTS_PER_PAGE),
        state.pagination_config.max_indicators,
    );

    Ok(projects_view(&listings, &indicators, total).into_response())
}

fn projects_view(
    listings: &[ProjectListing],
    indicators: &[PaginationIndicator],
    total: u64,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROJECTS_VIEW).into_html();

    let table_row = |listing: &ProjectListing| {
        let project = &listing.project;
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_PROJECT_VIEW, project.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_PROJECT, project.id);
        let confirm_message = format!("Are you sure you want to delete '{}'?", project.title);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    @if let Some(poster) = &project.poster {
                        img
                            src=(format!("{}/{poster}", endpoints::STORAGE))
                            alt=(project.title)
                            class="h-12 w-12 object-cover rounded";
                    }
                }
                td class=(TABLE_CELL_STYLE) { (project.title) }
                td class=(TABLE_CELL_STYLE) { (listing.category_name) }
                td class=(TABLE_CELL_STYLE)
                {
                    (truncate_for_table(&project.description, DESCRIPTION_PREVIEW_LENGTH))
                }
                td class=(TABLE_CELL_STYLE) { (format_rupiah(project.price)) }
                td class=(TABLE_CELL_STYLE)
                {
                    @if project.is_published { "Published" } @else { "Draft" }
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
                    h1 class="text-xl font-bold" { "Projects" }

                    a href=(endpoints::NEW_PROJECT_VIEW) class=(LINK_STYLE)
                    {
                        "Add Project"
                    }
                }

                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Poster" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for listing in listings {
                            (table_row(listing))
                        }
                    }
                }

                (pagination_nav(indicators, endpoints::PROJECTS_VIEW, total))
            }
        }
    );

    base("Projects", &content)
}

#[cfg(test)]
mod projects_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use rusqlite::Connection;

    use crate::{
        category_service::{
            ValidCategoryService, create_category_service, create_category_service_table,
        },
        pagination::{PageQuery, PaginationConfig},
        project::core::{ValidProject, create_project, create_project_table},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{ProjectsPageState, get_projects_page};

    fn get_test_state() -> ProjectsPageState {
        let connection = Connection::open_in_memory().unwrap();
        create_category_service_table(&connection)
            .expect("Could not create category service table");
        create_project_table(&connection).expect("Could not create project table");

        ProjectsPageState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        }
    }

    #[tokio::test]
    async fn page_lists_projects_with_category_names() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            let category = create_category_service(
                ValidCategoryService {
                    name: "Web Design".to_owned(),
                    description: None,
                    start_from: 500_000,
                },
                "category_services/abc.jpg",
                &connection,
            )
            .expect("Could not create test category");
            create_project(
                ValidProject {
                    title: "Landing Page".to_owned(),
                    description: "A landing page".to_owned(),
                    is_published: true,
                    price: 2_000_000,
                    languages: "Rust".to_owned(),
                    category_service_id: category.id,
                },
                None,
                &connection,
            )
            .expect("Could not create test project");
        }

        let response = get_projects_page(State(state), Query(PageQuery { page: None }))
            .await
            .expect("Could not render page");

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Landing Page"));
        assert!(text.contains("Web Design"));
        assert!(text.contains("Published"));
        assert!(text.contains("1 total"));
    }
}
