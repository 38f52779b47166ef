use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for the scraper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Cookie name -> environment variable holding its value
    #[serde(default = "default_cookies")]
    pub cookies: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            crawler: CrawlerConfig::default(),
            output: OutputConfig::default(),
            cookies: default_cookies(),
        }
    }
}

/// Target site addresses
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Address prepended to every relative document link
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the paginated search-result listing
    #[serde(rename = "search-path")]
    pub search_path: String,
}

impl SiteConfig {
    /// Base URL without a trailing slash, ready for textual concatenation
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Absolute address of the search listing
    pub fn search_url(&self) -> String {
        format!("{}{}", self.base(), self.search_path)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ted.europa.eu".to_string(),
            search_path: "/TED/search/searchResult.do".to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Fixed pause after every document attempt (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            request_timeout_secs: 30,
            user_agent: format!("ted-scraper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the accumulated records JSON file
    #[serde(rename = "records-path")]
    pub records_path: String,

    /// Path to the crawl progress JSON file
    #[serde(rename = "state-path")]
    pub state_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            records_path: "output.json".to_string(),
            state_path: "state.json".to_string(),
        }
    }
}

/// Session cookies the portal expects, keyed by cookie name
pub fn default_cookies() -> BTreeMap<String, String> {
    [
        ("cck1", "CCK1"),
        ("lg_pref", "LG_PREF"),
        ("webtools_session", "WEBTOOLS_SEASON"),
        ("JSESSIONID", "JSESSIONID"),
    ]
    .into_iter()
    .map(|(name, var)| (name.to_string(), var.to_string()))
    .collect()
}
