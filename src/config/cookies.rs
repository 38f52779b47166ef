//! Session cookies sourced from the environment
//!
//! The portal only serves full search listings to a browser-like session, so
//! the operator copies the relevant cookies into environment variables (or a
//! `.env` file). They are read once at startup and handed to the fetcher.

use std::collections::BTreeMap;

/// Opaque cookie name/value pairs attached to every request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pairs: Vec<(String, String)>,
}

impl SessionCookies {
    /// Builds a cookie set from explicit pairs
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Reads every configured cookie from its environment variable
    ///
    /// Variables that are unset or not valid unicode are skipped.
    pub fn from_env(mapping: &BTreeMap<String, String>) -> Self {
        let mut pairs = Vec::with_capacity(mapping.len());

        for (name, var) in mapping {
            match std::env::var(var) {
                Ok(value) if !value.is_empty() => pairs.push((name.clone(), value)),
                _ => tracing::debug!("Cookie {} not set (env var {})", name, var),
            }
        }

        Self { pairs }
    }

    /// Names of the cookies that were found
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Renders the set as a `Cookie` header value, `None` when empty
    pub fn header_value(&self) -> Option<String> {
        if self.pairs.is_empty() {
            return None;
        }

        Some(
            self.pairs
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
