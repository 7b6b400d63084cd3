//! Configuration for the unAPI client and the holdings getters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default unAPI endpoint of the K10plus union catalog.
pub const DEFAULT_URL: &str = "https://unapi.k10plus.de";

/// Default database.
pub const DEFAULT_DB: &str = "swb";

/// Default identifier type.
pub const DEFAULT_VAR: &str = "ppn";

/// Default schema requested by the command line client.
pub const DEFAULT_SCHEMA: &str = "picajson";

/// Connection settings of a [`Client`](crate::client::Client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the unAPI endpoint
    pub url: String,
    /// Name of the target database, e.g. `swb` or `k10plus`
    pub db: String,
    /// Type of record identifiers, e.g. `ppn`
    pub var: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            url: DEFAULT_URL.to_string(),
            db: DEFAULT_DB.to_string(),
            var: DEFAULT_VAR.to_string(),
        }
    }
}

impl ClientConfig {
    /// Set the endpoint URL. A trailing slash is dropped.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the database name.
    #[must_use]
    pub fn with_db(mut self, db: impl Into<String>) -> Self {
        self.db = db.into();
        self
    }

    /// Set the identifier type.
    #[must_use]
    pub fn with_var(mut self, var: impl Into<String>) -> Self {
        self.var = var.into();
        self
    }

    /// Load settings from JSON; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid configuration object.
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Which holdings rows the holdings getters read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoldingsScope {
    /// All rows of a holdings tag
    #[default]
    All,
    /// Only rows whose occurrence slot has this value
    Occurrence(String),
}

impl HoldingsScope {
    /// Scope to one occurrence.
    #[must_use]
    pub fn occurrence(occurrence: impl Into<String>) -> Self {
        HoldingsScope::Occurrence(occurrence.into())
    }

    /// The occurrence filter, if any.
    #[must_use]
    pub fn as_occurrence(&self) -> Option<&str> {
        match self {
            HoldingsScope::All => None,
            HoldingsScope::Occurrence(o) => Some(o),
        }
    }
}

impl fmt::Display for HoldingsScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Occurrence(o) => write!(f, "occurrence {o}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.url, "https://unapi.k10plus.de");
        assert_eq!(config.db, "swb");
        assert_eq!(config.var, "ppn");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ClientConfig::from_json_str(r#"{"db": "k10plus"}"#).unwrap();
        assert_eq!(config.db, "k10plus");
        assert_eq!(config.url, DEFAULT_URL);
    }

    #[test]
    fn test_with_url_trims_slash() {
        let config = ClientConfig::default().with_url("http://localhost:8080/");
        assert_eq!(config.url, "http://localhost:8080");
    }

    #[test]
    fn test_scope_occurrence() {
        assert_eq!(HoldingsScope::All.as_occurrence(), None);
        assert_eq!(HoldingsScope::occurrence("01").as_occurrence(), Some("01"));
    }
}
