//! Selection of the schema layer for a record.
//!
//! [`Encoding`] names the two JSON encodings this crate reads and
//! [`SchemaRecord`] wraps a record in the matching accessor, so callers that
//! only know the unAPI schema name can still reach the common getters.

use crate::config::HoldingsScope;
use crate::error::Result;
use crate::marcjson::MarcJson;
use crate::picajson::PicaJson;
use crate::record::Record;
use crate::report::Reporter;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// JSON encodings with a schema layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// PICA JSON, unAPI schema `picajson`
    PicaJson,
    /// MARC JSON, unAPI schema `marcjson`
    MarcJson,
}

impl Encoding {
    /// unAPI schema name of this encoding.
    #[must_use]
    pub const fn schema_name(&self) -> &'static str {
        match self {
            Self::PicaJson => "picajson",
            Self::MarcJson => "marcjson",
        }
    }

    /// Encoding for an unAPI schema name, if it has a schema layer.
    #[must_use]
    pub fn from_schema(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "picajson" => Some(Self::PicaJson),
            "marcjson" => Some(Self::MarcJson),
            _ => None,
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.schema_name())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_schema(s).ok_or_else(|| format!("No accessor for schema '{s}'"))
    }
}

/// A record wrapped in the accessor of its encoding.
#[derive(Debug, Clone)]
pub enum SchemaRecord {
    /// PICA JSON record
    Pica(PicaJson),
    /// MARC JSON record
    Marc(MarcJson),
}

impl SchemaRecord {
    /// Wrap `record` in the accessor for `encoding`.
    #[must_use]
    pub fn new(encoding: Encoding, record: Record) -> Self {
        match encoding {
            Encoding::PicaJson => SchemaRecord::Pica(PicaJson::new(record)),
            Encoding::MarcJson => SchemaRecord::Marc(MarcJson::new(record)),
        }
    }

    /// Wrap `record` with an explicit reporter.
    #[must_use]
    pub fn with_reporter(encoding: Encoding, record: Record, reporter: Arc<dyn Reporter>) -> Self {
        match encoding {
            Encoding::PicaJson => SchemaRecord::Pica(PicaJson::with_reporter(record, reporter)),
            Encoding::MarcJson => SchemaRecord::Marc(MarcJson::with_reporter(record, reporter)),
        }
    }

    /// Decode parsed JSON and wrap it.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a record.
    pub fn from_value(encoding: Encoding, value: Value) -> Result<Self> {
        Ok(Self::new(encoding, Record::from_value(value)?))
    }

    /// Encoding of the wrapped record.
    #[must_use]
    pub fn encoding(&self) -> Encoding {
        match self {
            SchemaRecord::Pica(_) => Encoding::PicaJson,
            SchemaRecord::Marc(_) => Encoding::MarcJson,
        }
    }

    /// Set the holdings scope of the wrapped accessor.
    #[must_use]
    pub fn with_holdings_scope(self, scope: HoldingsScope) -> Self {
        match self {
            SchemaRecord::Pica(pica) => SchemaRecord::Pica(pica.with_holdings_scope(scope)),
            SchemaRecord::Marc(marc) => SchemaRecord::Marc(marc.with_holdings_scope(scope)),
        }
    }

    /// Record identifier (003@ $0 or 001).
    #[must_use]
    pub fn ppn(&self) -> Option<String> {
        match self {
            SchemaRecord::Pica(pica) => pica.ppn(),
            SchemaRecord::Marc(marc) => marc.ppn(),
        }
    }

    /// Timestamp of the latest change in ISO 8601 form (001B or 005).
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp cannot be parsed.
    pub fn latest_change_iso(&self) -> Result<Option<String>> {
        match self {
            SchemaRecord::Pica(pica) => pica.latest_change_iso(),
            SchemaRecord::Marc(marc) => marc.latest_trans_iso(),
        }
    }

    /// ISILs of all holdings in scope.
    #[must_use]
    pub fn holdings_isil(&self) -> Option<Vec<String>> {
        match self {
            SchemaRecord::Pica(pica) => pica.holdings_isil(),
            SchemaRecord::Marc(marc) => marc.holdings_isil(),
        }
    }

    /// Holding identifiers (EPN or IDN) of `isil`.
    #[must_use]
    pub fn holdings_from_isil(&self, isil: &str) -> Option<Vec<String>> {
        match self {
            SchemaRecord::Pica(pica) => pica.holdings_from_isil(isil),
            SchemaRecord::Marc(marc) => marc.holdings_from_isil(isil),
        }
    }
}
