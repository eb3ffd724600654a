//! Shared style constants and page scaffolding for maud views.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, html};
use numfmt::{Formatter, Precision};
use unicode_segmentation::UnicodeSegmentation;

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Status badge style for transaction payment status and progress entries.
pub const STATUS_BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 \
    text-xs font-semibold text-blue-800 bg-blue-100 rounded-full \
    dark:bg-blue-900 dark:text-blue-300";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center px-6 py-8 mx-auto lg:py-5 text-gray-900 dark:text-white";

/// The base page scaffold with the shared head, body and alert container.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Tajoki Admin" }
                link href="/static/main.css" rel="stylesheet";

                script src="/static/htmx-2.0.8-min.js" {}
                script src="/static/htmx-ext-response-targets-2.0.4.js" {}
            }

            body
                hx-ext="response-targets"
                class="container max-w-full min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="hidden w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

/// Edit link and delete button pair for a table row.
///
/// `hx_target` tells HTMX what to remove when the delete succeeds, usually
/// "closest tr".
pub fn edit_delete_action_links(
    edit_url: &str,
    delete_url: &str,
    confirm_message: &str,
    hx_target: &str,
) -> Markup {
    html! {
        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

        button
            type="button"
            class=(BUTTON_DELETE_STYLE)
            hx-delete=(delete_url)
            hx-confirm=(confirm_message)
            hx-target=(hx_target)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
        {
            "Delete"
        }
    }
}

/// A full-page error view used by the 404 and 500 pages.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p class="mb-4 text-lg text-gray-500 dark:text-gray-400" { (fix) }

                    a href="/" class=(LINK_STYLE) { "Back to home" }
                }
            }
        }
    );

    base(title, &content)
}

/// Format a whole-rupiah price, e.g. `Rp2.000.000`.
pub fn format_rupiah(price: i64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();
    let formatter = FMT.get_or_init(|| {
        Formatter::new()
            .separator('.')
            .expect("'.' is a valid separator")
            .prefix("Rp")
            .expect("'Rp' is a valid prefix")
            .precision(Precision::Decimals(0))
    });

    let mut formatter = formatter.clone();
    formatter.fmt2(price as f64).to_string()
}

/// Shorten free text for a table cell, keeping grapheme clusters intact.
pub fn truncate_for_table(text: &str, max_graphemes: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let truncated: String = graphemes.by_ref().take(max_graphemes).collect();

    if graphemes.next().is_some() {
        format!("{truncated}…")
    } else {
        truncated
    }
}

#[cfg(test)]
mod format_rupiah_tests {
    use super::format_rupiah;

    #[test]
    fn formats_with_thousands_separator() {
        assert_eq!(format_rupiah(2_000_000), "Rp2.000.000");
    }

    #[test]
    fn formats_zero() {
        assert_eq!(format_rupiah(0), "Rp0");
    }
}

#[cfg(test)]
mod truncate_for_table_tests {
    use unicode_segmentation::UnicodeSegmentation;

    use super::truncate_for_table;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(truncate_for_table("Brand logo", 80), "Brand logo");
    }

    #[test]
    fn long_text_gets_an_ellipsis() {
        let text = "a".repeat(100);

        let got = truncate_for_table(&text, 80);

        assert_eq!(got.graphemes(true).count(), 81);
        assert!(got.ends_with('…'));
    }

    #[test]
    fn truncation_respects_grapheme_boundaries() {
        let text = "🇮🇩🇮🇩🇮🇩";

        let got = truncate_for_table(text, 2);

        assert_eq!(got, "🇮🇩🇮🇩…");
    }
}
