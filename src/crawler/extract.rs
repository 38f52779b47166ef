//! HTML extraction for listing and notice pages
//!
//! Pure functions over a parsed document. None of them fail: malformed or
//! unexpected markup degrades to an empty list, `0`, `false` or an empty
//! field set, and the caller decides what that means for the run.

use crate::crawler::record::Record;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Cell class marking a notice link in the search listing
const LINK_CELL_SELECTOR: &str = "td.nowrap";

/// Pagination element holding the "last page" link
const LAST_PAGE_SELECTOR: &str = "div.page-icon.pagelast";

/// Tab anchor marked as the currently selected tab
const SELECTED_TAB_SELECTOR: &str = "a.selected";

/// Table carrying the notice's structured fields
const DATA_TABLE_SELECTOR: &str = "table.data";

/// Label of the structured data tab
const DATA_TAB_LABEL: &str = "Data";

static PAGE_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"page=(\d+)").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One `<code> - <label>` pair, e.g. a CPV classification entry
static CODE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+ - [^\d]+").expect("valid regex"));

fn selector(css: &str) -> Option<Selector> {
    Selector::parse(css).ok()
}

/// Extracts notice links from a search listing page
///
/// Takes the `href` of the first anchor inside every link cell; cells
/// without an anchor (or whose anchor has no `href`) are skipped.
pub fn extract_document_links(page: &Html) -> Vec<String> {
    let (Some(cell_selector), Some(a_selector)) = (selector(LINK_CELL_SELECTOR), selector("a"))
    else {
        return Vec::new();
    };

    page.select(&cell_selector)
        .filter_map(|cell| cell.select(&a_selector).next())
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Reads the last page number from a listing page
///
/// Returns `0` when the pagination element is missing; see
/// [`last_page_from_element`] for the rest.
pub fn extract_last_page_number(page: &Html) -> u32 {
    let Some(pagination_selector) = selector(LAST_PAGE_SELECTOR) else {
        return 0;
    };

    match page.select(&pagination_selector).next() {
        Some(element) => last_page_from_element(element),
        None => {
            tracing::debug!("No pagination element found on listing page");
            0
        }
    }
}

/// Reads `page=<digits>` from the first anchor inside `element`
///
/// Returns `0` ("unknown") when there is no anchor, no `href`, no match, or
/// the number does not fit.
pub fn last_page_from_element(element: ElementRef) -> u32 {
    let Some(a_selector) = selector("a") else {
        return 0;
    };

    let Some(href) = element
        .select(&a_selector)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
    else {
        tracing::debug!("Pagination element has no anchor with an href");
        return 0;
    };

    PAGE_PARAM_RE
        .captures(href)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// True if the selected tab on a notice page is exactly "Data"
pub fn has_data_tab(page: &Html) -> bool {
    let Some(tab_selector) = selector(SELECTED_TAB_SELECTOR) else {
        return false;
    };

    page.select(&tab_selector)
        .any(|tab| tab.text().collect::<String>().trim() == DATA_TAB_LABEL)
}

/// Extracts the key/value fields of a notice's data table
///
/// Every row with exactly two `<td>` cells contributes one field: the first
/// cell's trimmed text is the key, the second cell's text with whitespace
/// runs collapsed is the value (see [`normalize_value`]). Other rows are
/// ignored. A page without the table yields an empty record.
pub fn extract_table(page: &Html) -> Record {
    let mut record = Record::default();

    let (Some(table_selector), Some(row_selector), Some(cell_selector)) = (
        selector(DATA_TABLE_SELECTOR),
        selector("tr"),
        selector("td"),
    ) else {
        return record;
    };

    let Some(table) = page.select(&table_selector).next() else {
        return record;
    };

    for row in table.select(&row_selector) {
        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        if cells.len() != 2 {
            continue;
        }

        let key = cells[0].text().collect::<String>().trim().to_string();
        let value = normalize_value(&cells[1].text().collect::<String>());
        record.insert(key, value);
    }

    record
}

/// Normalizes a raw table cell value
///
/// Trims and collapses whitespace runs to a single space, then splits the
/// value around every `<digits> - <label>` pair (the markup separates them
/// with `<br>`, which leaves no delimiter in the text). Pairs and the text
/// between them are trimmed, empty pieces dropped, and the rest joined with
/// `", "`. A value without any pair comes back collapsed only.
pub fn normalize_value(raw: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ").into_owned();

    let mut pieces: Vec<&str> = Vec::new();
    let mut last_end = 0;
    for m in CODE_LABEL_RE.find_iter(&collapsed) {
        pieces.push(&collapsed[last_end..m.start()]);
        pieces.push(m.as_str());
        last_end = m.end();
    }
    pieces.push(&collapsed[last_end..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
