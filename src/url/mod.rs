//! URL handling for notice pages
//!
//! Every notice has a main page (the human-readable text) and a data page
//! (the structured key/value tab). The listing only links the main page; the
//! data page address is derived from it by plain text substitution.

/// Derives a notice's data-tab href from its main-page href
///
/// Two literal substitutions, applied to every occurrence: `TEXT` becomes
/// `DATA` and `src=0` becomes `tabId=3`. No URL parsing is done, so the
/// result is only meaningful for hrefs in the portal's own format.
///
/// # Example
///
/// ```
/// use ted_scraper::url::derive_data_url;
///
/// assert_eq!(
///     derive_data_url("https://x/TEXT?src=0"),
///     "https://x/DATA?tabId=3"
/// );
/// ```
pub fn derive_data_url(main_page_href: &str) -> String {
    main_page_href
        .replace("TEXT", "DATA")
        .replace("src=0", "tabId=3")
}

/// Absolute addresses of one notice, built from a listing href
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUrls {
    /// Main page address; the deduplication key stored as `URL`
    pub main: String,
    /// Data tab address; the page that is actually scraped
    pub data: String,
}

impl DocumentUrls {
    /// Prefixes `base` onto both the href and its derived data href
    pub fn from_href(base: &str, href: &str) -> Self {
        Self {
            main: join_base(base, href),
            data: join_base(base, &derive_data_url(href)),
        }
    }
}

/// Concatenates the site base address and a site-relative href
///
/// Hrefs that are already absolute are returned unchanged.
pub fn join_base(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }

    let base = base.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}
