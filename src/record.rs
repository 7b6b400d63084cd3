//! Positionally encoded records as delivered by PICA JSON and MARC JSON.
//!
//! Both encodings serialize a record as an array of field rows. Element 0 of a
//! row is the field tag, the remaining elements alternate between a subfield
//! code and its value:
//!
//! ```text
//! [
//!   ["003@", null, "0", "1234567890"],
//!   ["045R", null, "a", "ST 250"],
//!   ["045R", null, "a", "ST 230"]
//! ]
//! ```
//!
//! PICA JSON puts the occurrence (or `null`) at element 1, MARC JSON puts the
//! two indicators at elements 1 and 2. Neither detail is interpreted here.

use crate::error::{Result, UnapiError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of a field row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    /// JSON `null`, used for an absent occurrence or indicator
    Null,
    /// A plain string: tag, subfield code, or scalar value
    Text(String),
    /// A list of strings, used for repeatable subfield values
    List(Vec<String>),
}

impl Element {
    /// Get the string content of a [`Element::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Element::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Number of values carried by this element.
    ///
    /// A scalar carries one value, a list carries as many as it holds, `null`
    /// carries none.
    #[must_use]
    pub fn value_count(&self) -> usize {
        match self {
            Element::Null => 0,
            Element::Text(_) => 1,
            Element::List(values) => values.len(),
        }
    }

    /// Get the only value of this element, if it carries exactly one.
    #[must_use]
    pub fn single_value(&self) -> Option<&str> {
        match self {
            Element::Text(s) => Some(s),
            Element::List(values) if values.len() == 1 => Some(&values[0]),
            _ => None,
        }
    }

    /// Render the element as a single string, joining list values with `sep`.
    #[must_use]
    pub fn joined(&self, sep: &str) -> String {
        match self {
            Element::Null => String::new(),
            Element::Text(s) => s.clone(),
            Element::List(values) => values.join(sep),
        }
    }

    /// All values carried by this element, in order.
    #[must_use]
    pub fn values(&self) -> Vec<String> {
        match self {
            Element::Null => Vec::new(),
            Element::Text(s) => vec![s.clone()],
            Element::List(values) => values.clone(),
        }
    }

    fn is_code(&self, code: &str) -> bool {
        matches!(self, Element::Text(s) if s == code)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        Element::Text(value.to_string())
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        Element::Text(value)
    }
}

impl From<Vec<String>> for Element {
    fn from(values: Vec<String>) -> Self {
        Element::List(values)
    }
}

/// A single field: tag followed by subfield code/value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRow(Vec<Element>);

impl FieldRow {
    /// Create a row holding only a tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        FieldRow(vec![Element::Text(tag.into())])
    }

    /// Create a row from raw elements without any validation.
    #[must_use]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        FieldRow(elements)
    }

    /// Append a raw element (occurrence, indicator, `null`).
    #[must_use]
    pub fn with_element(mut self, element: impl Into<Element>) -> Self {
        self.0.push(element.into());
        self
    }

    /// Append a subfield code and its value.
    #[must_use]
    pub fn with_subfield(mut self, code: &str, value: impl Into<Element>) -> Self {
        self.0.push(Element::Text(code.to_string()));
        self.0.push(value.into());
        self
    }

    /// The field tag (element 0), or `""` for a malformed row.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.0.first().and_then(Element::as_text).unwrap_or("")
    }

    /// The occurrence slot (element 1), if it is a string.
    #[must_use]
    pub fn occurrence(&self) -> Option<&str> {
        self.0.get(1).and_then(Element::as_text)
    }

    /// Element at `pos`.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<&Element> {
        self.0.get(pos)
    }

    /// Number of elements including the tag.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the row has no elements at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All elements of the row.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.0
    }

    /// Positions of every element after the tag that equals `code` and is
    /// followed by a value. The returned positions point at the values.
    pub(crate) fn code_value_positions<'a>(
        &'a self,
        code: &'a str,
    ) -> impl Iterator<Item = usize> + 'a {
        self.0
            .iter()
            .enumerate()
            .skip(1)
            .filter(move |(i, element)| element.is_code(code) && i + 1 < self.0.len())
            .map(|(i, _)| i + 1)
    }
}

/// An ordered sequence of field rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    rows: Vec<FieldRow>,
}

impl Record {
    /// Create a record from rows.
    #[must_use]
    pub fn new(rows: Vec<FieldRow>) -> Self {
        Record { rows }
    }

    /// Decode a record from parsed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an array of arrays, if an element
    /// is neither `null`, a string, nor an array of strings, or if a row does
    /// not start with a string tag.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_array() {
            return Err(UnapiError::InvalidRecord(
                "Expected JSON array of fields".to_string(),
            ));
        }
        let rows: Vec<FieldRow> = serde_json::from_value(value)?;
        for (i, row) in rows.iter().enumerate() {
            if row.0.first().and_then(Element::as_text).is_none() {
                return Err(UnapiError::InvalidRecord(format!(
                    "Field at position {i} does not start with a tag"
                )));
            }
        }
        Ok(Record { rows })
    }

    /// Decode a record from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid JSON or not a record.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// All rows in order.
    #[must_use]
    pub fn rows(&self) -> &[FieldRow] {
        &self.rows
    }

    /// Row at `pos`.
    #[must_use]
    pub fn get(&self, pos: usize) -> Option<&FieldRow> {
        self.rows.get(pos)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the record has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<Vec<FieldRow>> for Record {
    fn from(rows: Vec<FieldRow>) -> Self {
        Record::new(rows)
    }
}
