//! Configuration module for the TED scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files
//! and reading the session cookies the portal expects.
//!
//! # Example
//!
//! ```no_run
//! use ted_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Records go to: {}", config.output.records_path);
//! ```

mod cookies;
mod parser;
mod types;
mod validation;

// Re-export types
pub use cookies::SessionCookies;
pub use types::{default_cookies, Config, CrawlerConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
