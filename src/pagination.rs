//! Common functionality for paging table data.

use maud::{Markup, html};
use serde::Deserialize;

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum number of page indicators to show at once.
    pub max_indicators: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            max_indicators: 5,
        }
    }
}

/// The query parameters accepted by every list page.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    /// The page number to display. Starts from 1.
    pub page: Option<u64>,
}

/// The number of pages needed to show `total` rows at `per_page` rows each.
pub fn page_count(total: u64, per_page: u64) -> u64 {
    total.div_ceil(per_page).max(1)
}

/// One element of the pagination control.
#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    /// A link to another page.
    Page(u64),
    /// The page currently shown.
    CurrPage(u64),
    /// A gap between the window and the first or last page.
    Ellipsis,
    /// A link to the next page.
    NextButton(u64),
    /// A link to the previous page.
    BackButton(u64),
}

/// Build the indicator row for `curr_page` out of `page_count` pages, showing
/// a window of at most `max_indicators` numbered pages around the current one.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_indicators: u64,
) -> Vec<PaginationIndicator> {
    let half_window = max_indicators / 2;

    let (window_start, window_end) = if page_count <= max_indicators {
        (1, page_count)
    } else if curr_page <= half_window {
        (1, max_indicators)
    } else if curr_page + half_window > page_count {
        (page_count - max_indicators + 1, page_count)
    } else {
        (curr_page - half_window, curr_page + half_window)
    };

    let mut indicators = Vec::new();

    if curr_page > 1 {
        indicators.push(PaginationIndicator::BackButton(curr_page - 1));
    }

    if window_start > 1 {
        indicators.push(PaginationIndicator::Page(1));
        indicators.push(PaginationIndicator::Ellipsis);
    }

    for page in window_start..=window_end {
        if page == curr_page {
            indicators.push(PaginationIndicator::CurrPage(page));
        } else {
            indicators.push(PaginationIndicator::Page(page));
        }
    }

    if window_end < page_count {
        indicators.push(PaginationIndicator::Ellipsis);
        indicators.push(PaginationIndicator::Page(page_count));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

const PAGE_LINK_STYLE: &str = "flex items-center justify-center px-3 h-8 leading-tight \
    text-gray-500 bg-white border border-gray-300 hover:bg-gray-100 hover:text-gray-700 \
    dark:bg-gray-800 dark:border-gray-700 dark:text-gray-400 dark:hover:bg-gray-700 \
    dark:hover:text-white";

const CURRENT_PAGE_STYLE: &str = "flex items-center justify-center px-3 h-8 leading-tight \
    text-blue-600 border border-gray-300 bg-blue-50 dark:bg-gray-700 dark:border-gray-700 \
    dark:text-white";

/// Render the pagination control for a list page.
///
/// `base_url` is the list page route; page links append `?page=N`.
/// `total` is the total row count, displayed alongside the controls.
pub fn pagination_nav(indicators: &[PaginationIndicator], base_url: &str, total: u64) -> Markup {
    let page_href = |page: u64| format!("{base_url}?page={page}");

    html! {
        nav class="flex items-center justify-between pt-4" aria-label="Table navigation"
        {
            span class="text-sm text-gray-500 dark:text-gray-400"
            {
                (total) " total"
            }

            ul class="inline-flex -space-x-px text-sm h-8"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_href(*page)) class=(PAGE_LINK_STYLE) { "Previous" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_href(*page)) class=(PAGE_LINK_STYLE) { "Next" }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(page_href(*page)) class=(PAGE_LINK_STYLE) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class=(CURRENT_PAGE_STYLE) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(PAGE_LINK_STYLE) { "…" }
                            }
                        }
                    }
                }
            }
        }
    }
}
