//! HTML helpers for catalog fragments and album pages
//!
//! Search rows arrive as short HTML fragments (`<a href="...">Album</a>`,
//! `<span>Label</span>`). Album pages are full documents with a definition list
//! holding the release date.

use scraper::{ElementRef, Html, Selector};

/// Label of the album-page field holding the release date
const RELEASE_DATE_LABEL: &str = "Release date";

/// Strips markup from a fragment and returns its visible text
///
/// Entities are decoded and surrounding whitespace is trimmed. Never fails;
/// an empty fragment yields an empty string.
///
/// # Example
///
/// ```
/// use release_radar::crawler::strip_markup;
///
/// assert_eq!(strip_markup("<b>Morbid Angel</b>"), "Morbid Angel");
/// assert_eq!(strip_markup(""), "");
/// ```
pub fn strip_markup(fragment: &str) -> String {
    if fragment.is_empty() {
        return String::new();
    }

    let parsed = Html::parse_fragment(fragment);
    parsed
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

/// Returns the `href` of the first hyperlink in a fragment
///
/// The target is returned as written; callers resolve relative links.
///
/// # Example
///
/// ```
/// use release_radar::crawler::extract_link;
///
/// assert_eq!(extract_link(r#"<a href="/x/1">Album</a>"#), Some("/x/1".to_string()));
/// assert_eq!(extract_link("Album"), None);
/// ```
pub fn extract_link(fragment: &str) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    let parsed = Html::parse_fragment(fragment);

    parsed
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
}

/// Extracts the release date from an album page
///
/// Looks for a `<dt>` reading "Release date" (a trailing colon is tolerated)
/// and returns the text of the `<dd>` that follows it.
///
/// # Returns
///
/// * `Some(date)` - The label was found; the date may be empty
/// * `None` - The page has no release date field
pub fn extract_release_date(html: &str) -> Option<String> {
    let dt_selector = Selector::parse("dt").ok()?;
    let document = Html::parse_document(html);

    let label = document.select(&dt_selector).find(|dt| {
        let text = dt.text().collect::<String>();
        text.trim().trim_end_matches(':').trim() == RELEASE_DATE_LABEL
    })?;

    let value = label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "dd")?;

    Some(collapse_whitespace(&value.text().collect::<String>()))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
