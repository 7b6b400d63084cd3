//! Subfield value extraction from one or several field rows.
//!
//! A subfield code may occur any number of times within a row, and a tag may
//! occur in any number of rows. The extractor returns an [`Extracted`] value
//! whose variant states which of these shapes was found, enforcing the
//! repeat and collapse policies requested by the caller:
//!
//! - `repeat = true` keeps every occurrence as found.
//! - `repeat = false` expects each occurrence to carry a single value and
//!   flattens them into [`Extracted::Flat`]. If an occurrence carries more,
//!   a warning is reported and the unflattened form is returned instead.
//! - `collapse = true` (several rows only) joins values within a row with
//!   [`ROW_DELIMITER`] and rows with [`FIELD_DELIMITER`].

use crate::record::{Element, FieldRow};
use crate::report::{Condition, ConditionKind, Reporter};

/// Joins the values of one row when collapsing.
pub const ROW_DELIMITER: &str = "|";

/// Joins the rows of one tag when collapsing.
pub const FIELD_DELIMITER: &str = "||";

/// Values extracted for one tag/subfield pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    /// The subfield occurs exactly once in a single row
    Value(Element),
    /// The subfield occurs several times in a single row
    Values(Vec<Element>),
    /// One single value per occurrence (single row) or per row (several rows)
    Flat(Vec<String>),
    /// Occurrences grouped by row
    Nested(Vec<Vec<Element>>),
    /// All occurrences joined into one string
    Collapsed(String),
}

impl Extracted {
    /// The value as a string, if it is a single scalar or collapsed string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Extracted::Value(Element::Text(s)) | Extracted::Collapsed(s) => Some(s),
            _ => None,
        }
    }

    /// The flattened values, if the extraction produced a flat list.
    #[must_use]
    pub fn as_flat(&self) -> Option<&[String]> {
        match self {
            Extracted::Flat(values) => Some(values),
            _ => None,
        }
    }

    /// All values in positional order, regardless of shape.
    ///
    /// Grouping by row is lost. A collapsed string is returned as is.
    #[must_use]
    pub fn into_strings(self) -> Vec<String> {
        match self {
            Extracted::Value(element) => element.values(),
            Extracted::Values(elements) => elements.iter().flat_map(Element::values).collect(),
            Extracted::Flat(values) => values,
            Extracted::Nested(rows) => rows
                .iter()
                .flat_map(|row| row.iter().flat_map(Element::values))
                .collect(),
            Extracted::Collapsed(s) => vec![s],
        }
    }
}

/// Positions of the values of every occurrence of `code` in `row`.
///
/// Each returned position `p` satisfies `row[p - 1] == code`. Returns `None`
/// when the code does not occur.
#[must_use]
pub fn subfield_positions(row: &FieldRow, code: &str) -> Option<Vec<usize>> {
    let positions: Vec<usize> = row.code_value_positions(code).collect();
    if positions.is_empty() {
        None
    } else {
        Some(positions)
    }
}

/// Join extracted rows into a single string.
#[must_use]
pub fn collapse(rows: &[Vec<Element>]) -> String {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|element| element.joined(ROW_DELIMITER))
                .collect::<Vec<_>>()
                .join(ROW_DELIMITER)
        })
        .collect::<Vec<_>>()
        .join(FIELD_DELIMITER)
}

/// Split a collapsed string back into rows of values.
///
/// Inverse of [`collapse`] as long as no value is empty or contains `|`.
#[must_use]
pub fn split_collapsed(collapsed: &str) -> Vec<Vec<String>> {
    collapsed
        .split(FIELD_DELIMITER)
        .map(|row| row.split(ROW_DELIMITER).map(str::to_string).collect())
        .collect()
}

/// Extracts subfield values and reports policy violations.
#[derive(Debug, Clone, Copy)]
pub struct SubfieldExtractor<'a> {
    schema: &'a str,
    reporter: &'a dyn Reporter,
}

impl<'a> SubfieldExtractor<'a> {
    /// Create an extractor reporting under the given schema name.
    #[must_use]
    pub fn new(schema: &'a str, reporter: &'a dyn Reporter) -> Self {
        SubfieldExtractor { schema, reporter }
    }

    /// Extract `code` from a single row.
    ///
    /// A single occurrence is returned as [`Extracted::Value`] whatever
    /// `repeat` says.
    #[must_use]
    pub fn value_from_row(&self, row: &FieldRow, code: &str, repeat: bool) -> Option<Extracted> {
        let Some(positions) = subfield_positions(row, code) else {
            self.reporter.report(&Condition::error(
                self.schema,
                ConditionKind::MissingSubfield,
                format!("Subfield {code} not found in field {}!", row.tag()),
            ));
            return None;
        };
        let found: Vec<&Element> = positions.iter().filter_map(|&p| row.get(p)).collect();

        if let [single] = found.as_slice() {
            return Some(Extracted::Value((*single).clone()));
        }
        if !repeat {
            if let Some(flat) = flatten_singles(found.iter().copied()) {
                return Some(Extracted::Flat(flat));
            }
            self.warn_repeated(code, row.tag());
        }
        Some(Extracted::Values(found.into_iter().cloned().collect()))
    }

    /// Extract `code` from several rows sharing a tag.
    ///
    /// Rows without the code are skipped.
    #[must_use]
    pub fn values_from_rows(
        &self,
        rows: &[&FieldRow],
        code: &str,
        repeat: bool,
        collapse_rows: bool,
    ) -> Option<Extracted> {
        let tag = rows.first().map_or("", |row| row.tag());
        let found: Vec<Vec<Element>> = rows
            .iter()
            .map(|row| {
                row.code_value_positions(code)
                    .filter_map(|p| row.get(p).cloned())
                    .collect::<Vec<_>>()
            })
            .filter(|sub| !sub.is_empty())
            .collect();

        if found.is_empty() {
            self.reporter.report(&Condition::error(
                self.schema,
                ConditionKind::MissingSubfield,
                format!("Subfield {code} not found in field {tag}!"),
            ));
            return None;
        }
        if collapse_rows {
            return Some(Extracted::Collapsed(collapse(&found)));
        }
        if !repeat {
            let singles = found
                .iter()
                .map(|sub| match sub.as_slice() {
                    [only] => Some(only),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .and_then(|elements| flatten_singles(elements.into_iter()));
            if let Some(flat) = singles {
                return Some(Extracted::Flat(flat));
            }
            self.warn_repeated(code, tag);
        }
        Some(Extracted::Nested(found))
    }

    fn warn_repeated(&self, code: &str, tag: &str) {
        self.reporter.report(&Condition::warning(
            self.schema,
            ConditionKind::SubfieldCardinality,
            format!(
                "Expected unrepeated subfield {code} in field {tag}. Found multiple occurrences."
            ),
        ));
    }
}

fn flatten_singles<'e>(elements: impl Iterator<Item = &'e Element>) -> Option<Vec<String>> {
    elements
        .map(|element| element.single_value().map(str::to_string))
        .collect()
}
