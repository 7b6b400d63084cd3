//! Decoding of the unAPI format list.
//!
//! An unAPI endpoint called without parameters lists the schemas it serves:
//!
//! ```xml
//! <formats>
//!   <format name="picajson" type="application/json" docs="http://format.gbv.de/pica/json"/>
//!   <format name="marcxml" type="application/xml" docs="http://www.loc.gov/standards/marcxml/"/>
//!   <format name="pp" type="text/plain"/>
//! </formats>
//! ```

use crate::error::{Result, UnapiError};
use indexmap::IndexMap;
use quick_xml::de::from_str as xml_from_str;
use serde::{Deserialize, Serialize};

/// unAPI `<formats>` document.
#[derive(Debug, Deserialize)]
#[serde(rename = "formats")]
struct FormatList {
    #[serde(default, rename = "format")]
    formats: Vec<FormatEntry>,
}

/// One `<format>` element.
#[derive(Debug, Deserialize)]
struct FormatEntry {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@type", default)]
    mime_type: Option<String>,
    #[serde(rename = "@docs", default)]
    docs: Option<String>,
}

/// Metadata of one schema offered by an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatInfo {
    /// MIME type hint, e.g. `application/json`
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    /// URL of the schema documentation
    pub docs: Option<String>,
}

/// How the body of a record response is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Parsed as JSON
    Json,
    /// Kept as an XML document
    Xml,
    /// Kept as plain text
    Text,
}

impl FormatInfo {
    /// Decode strategy implied by the MIME type hint.
    ///
    /// `xml` takes precedence over `json`; a missing hint means plain text.
    #[must_use]
    pub fn response_kind(&self) -> ResponseKind {
        match self.mime_type.as_deref() {
            Some(t) if t.contains("xml") => ResponseKind::Xml,
            Some(t) if t.contains("json") => ResponseKind::Json,
            _ => ResponseKind::Text,
        }
    }
}

/// Parse a `<formats>` document into a map from schema name to metadata.
///
/// Schemas keep the order of the document.
///
/// # Errors
///
/// Returns an error if `xml` is not a valid format list.
pub fn parse_formats(xml: &str) -> Result<IndexMap<String, FormatInfo>> {
    let list: FormatList = xml_from_str(xml)
        .map_err(|e| UnapiError::Xml(format!("Failed to parse format list: {e}")))?;
    Ok(list
        .formats
        .into_iter()
        .map(|entry| {
            (
                entry.name,
                FormatInfo {
                    mime_type: entry.mime_type,
                    docs: entry.docs,
                },
            )
        })
        .collect())
}
