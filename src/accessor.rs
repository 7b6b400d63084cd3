//! Generic tag/subfield access shared by all schema layers.
//!
//! [`RecordAccessor`] owns one [`Record`] and its [`FieldIndex`]. Schema layers
//! such as [`PicaJson`](crate::picajson::PicaJson) and
//! [`MarcJson`](crate::marcjson::MarcJson) wrap it and map bibliographic
//! concepts onto [`RecordAccessor::get_value`] calls.
//!
//! # Examples
//!
//! ```ignore
//! use unapi::accessor::{RecordAccessor, ValueQuery};
//! use unapi::record::Record;
//!
//! let record = Record::from_json_str(r#"[["003@", "0", "123456789"]]"#)?;
//! let accessor = RecordAccessor::new("PicaJson", record);
//! let ppn = accessor.get_value("003@", "0", &ValueQuery::unique());
//! assert_eq!(ppn.as_ref().and_then(|v| v.as_str()), Some("123456789"));
//! ```

use crate::field_index::FieldIndex;
use crate::record::{Element, FieldRow, Record};
use crate::report::{Condition, ConditionKind, Reporter, Severity, TracingReporter};
use crate::subfield::{Extracted, SubfieldExtractor};
use std::sync::Arc;

/// Rows resolved for a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMatch<'r> {
    /// Exactly one row, requested as unique
    Single(&'r FieldRow),
    /// All rows with the tag, in record order
    Multiple(Vec<&'r FieldRow>),
}

impl<'r> FieldMatch<'r> {
    /// All resolved rows.
    #[must_use]
    pub fn rows(&self) -> Vec<&'r FieldRow> {
        match self {
            FieldMatch::Single(row) => vec![*row],
            FieldMatch::Multiple(rows) => rows.clone(),
        }
    }
}

/// Cardinality policy for one [`RecordAccessor::get_value`] call.
///
/// # Examples
///
/// ```ignore
/// // 045R $a: several rows, one value each, joined into one string
/// let query = ValueQuery::multiple().repeat(false).collapse(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ValueQuery {
    /// The tag must occur exactly once
    pub unique: bool,
    /// Keep repeated occurrences as found instead of flattening
    pub repeat: bool,
    /// Join all values into one delimited string
    pub collapse: bool,
    /// Only consider rows whose occurrence slot equals this value
    pub occurrence: Option<String>,
}

impl ValueQuery {
    /// Query for a tag that must occur exactly once.
    #[must_use]
    pub fn unique() -> Self {
        ValueQuery {
            unique: true,
            repeat: true,
            ..Self::default()
        }
    }

    /// Query for a tag that may occur in several rows.
    #[must_use]
    pub fn multiple() -> Self {
        ValueQuery {
            unique: false,
            repeat: true,
            ..Self::default()
        }
    }

    /// Set the repeat policy.
    #[must_use]
    pub fn repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the collapse policy.
    #[must_use]
    pub fn collapse(mut self, collapse: bool) -> Self {
        self.collapse = collapse;
        self
    }

    /// Restrict the query to rows with the given occurrence.
    #[must_use]
    pub fn occurrence(mut self, occurrence: Option<&str>) -> Self {
        self.occurrence = occurrence.map(str::to_string);
        self
    }
}

/// Indexed, read-only access to one record.
#[derive(Debug, Clone)]
pub struct RecordAccessor {
    name: String,
    record: Record,
    index: FieldIndex,
    reporter: Arc<dyn Reporter>,
}

impl RecordAccessor {
    /// Wrap a record, reporting conditions through `tracing`.
    #[must_use]
    pub fn new(name: impl Into<String>, record: Record) -> Self {
        Self::with_reporter(name, record, Arc::new(TracingReporter))
    }

    /// Wrap a record with an explicit reporter.
    #[must_use]
    pub fn with_reporter(
        name: impl Into<String>,
        record: Record,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        let index = FieldIndex::build(&record);
        RecordAccessor {
            name: name.into(),
            record,
            index,
            reporter,
        }
    }

    /// Schema name used in reported conditions.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wrapped record.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// The tag index built at construction.
    #[must_use]
    pub fn index(&self) -> &FieldIndex {
        &self.index
    }

    /// Report a condition under this accessor's schema name.
    pub fn report(&self, severity: Severity, kind: ConditionKind, message: impl Into<String>) {
        let condition = match severity {
            Severity::Warning => Condition::warning(&self.name, kind, message),
            Severity::Error => Condition::error(&self.name, kind, message),
        };
        self.reporter.report(&condition);
    }

    /// Resolve the rows of `tag`.
    ///
    /// With `unique`, exactly one row must exist. Any other count is reported
    /// as a warning and yields `None`. Without `unique`, `None` means the tag
    /// does not occur.
    #[must_use]
    pub fn get_field(&self, tag: &str, unique: bool) -> Option<FieldMatch<'_>> {
        let rows: Vec<&FieldRow> = self
            .index
            .positions_of(tag)
            .unwrap_or_default()
            .iter()
            .filter_map(|&pos| self.record.get(pos))
            .collect();

        if unique {
            if let [row] = rows.as_slice() {
                return Some(FieldMatch::Single(*row));
            }
            self.report(
                Severity::Warning,
                ConditionKind::FieldCardinality,
                format!(
                    "Expected field {tag} to be unique. Found {} occurrences.",
                    rows.len()
                ),
            );
            return None;
        }
        if rows.is_empty() {
            None
        } else {
            Some(FieldMatch::Multiple(rows))
        }
    }

    /// Extract subfield `code` of `tag` under the given policy.
    ///
    /// A unique single row is read with
    /// [`SubfieldExtractor::value_from_row`], anything else with
    /// [`SubfieldExtractor::values_from_rows`]. A missing tag is reported as
    /// an error.
    #[must_use]
    pub fn get_value(&self, tag: &str, code: &str, query: &ValueQuery) -> Option<Extracted> {
        let Some(found) = self.get_field(tag, query.unique) else {
            if self.index.count(tag) == 0 {
                self.report(
                    Severity::Error,
                    ConditionKind::MissingField,
                    format!("Field {tag} not found!"),
                );
            }
            return None;
        };
        let extractor = SubfieldExtractor::new(&self.name, self.reporter.as_ref());
        let occurrence = query.occurrence.as_deref();

        match found {
            FieldMatch::Single(row) if occurrence.map_or(true, |o| row.occurrence() == Some(o)) => {
                extractor.value_from_row(row, code, query.repeat)
            }
            FieldMatch::Single(_) => {
                self.report_missing_occurrence(tag, occurrence);
                None
            }
            FieldMatch::Multiple(rows) => {
                let rows: Vec<&FieldRow> = match occurrence {
                    Some(o) => rows
                        .into_iter()
                        .filter(|row| row.occurrence() == Some(o))
                        .collect(),
                    None => rows,
                };
                if rows.is_empty() {
                    self.report_missing_occurrence(tag, occurrence);
                    return None;
                }
                extractor.values_from_rows(&rows, code, query.repeat, query.collapse)
            }
        }
    }

    /// Extract a single scalar string.
    ///
    /// More than one value is reported as a warning and yields `None`.
    #[must_use]
    pub fn get_str(&self, tag: &str, code: &str, query: &ValueQuery) -> Option<String> {
        let extracted = self.get_value(tag, code, query)?;
        let count: usize = match &extracted {
            Extracted::Value(element) => element.value_count(),
            Extracted::Collapsed(_) => 1,
            Extracted::Flat(values) => values.len(),
            Extracted::Values(elements) => elements.iter().map(Element::value_count).sum(),
            Extracted::Nested(rows) => rows
                .iter()
                .flatten()
                .map(Element::value_count)
                .sum(),
        };
        if count > 1 {
            self.report(
                Severity::Warning,
                ConditionKind::SubfieldCardinality,
                format!("Expected single value of subfield {code} in field {tag}. Found {count}."),
            );
            return None;
        }
        match extracted {
            Extracted::Value(element) => element.single_value().map(str::to_string),
            Extracted::Collapsed(s) => Some(s),
            Extracted::Flat(values) => values.into_iter().next(),
            other => other.into_strings().into_iter().next(),
        }
    }

    /// Extract all values as a flat list of strings.
    #[must_use]
    pub fn get_list(&self, tag: &str, code: &str, query: &ValueQuery) -> Option<Vec<String>> {
        self.get_value(tag, code, query).map(Extracted::into_strings)
    }

    fn report_missing_occurrence(&self, tag: &str, occurrence: Option<&str>) {
        self.report(
            Severity::Error,
            ConditionKind::MissingField,
            format!(
                "Field {tag}/{} not found!",
                occurrence.unwrap_or_default()
            ),
        );
    }
}
