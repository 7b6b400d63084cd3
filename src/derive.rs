//! Derived values computed from extracted subfields.
//!
//! These helpers are shared by the schema layers: matching a filter value
//! (ISIL, ELN) against a code list, projecting the matches into a parallel
//! list, splitting `code:date` composites and turning the fixed date formats
//! of both encodings into ISO 8601 strings.

use crate::accessor::RecordAccessor;
use crate::error::{Result, UnapiError};
use crate::report::{ConditionKind, Severity};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Separator of composite values such as `1999:15-06-23`.
pub const COMPONENT_SEPARATOR: char = ':';

/// Positions in `values` equal to `target`, or `None` if there are none.
#[must_use]
pub fn indices_of(values: &[String], target: &str) -> Option<Vec<usize>> {
    let index: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, value)| *value == target)
        .map(|(i, _)| i)
        .collect();
    if index.is_empty() {
        None
    } else {
        Some(index)
    }
}

/// Pick `values[i]` for every `i` in `index`, skipping out-of-range positions.
#[must_use]
pub fn project(values: &[String], index: &[usize]) -> Vec<String> {
    index.iter().filter_map(|&i| values.get(i).cloned()).collect()
}

/// chrono reads `%y` 69 as 2069; POSIX `strptime` reads it as 1969.
const MISREAD_TWO_DIGIT_YEAR: i32 = 2069;

/// Component `pos` of a colon separated composite value.
#[must_use]
pub fn component(value: &str, pos: usize) -> Option<&str> {
    value.split(COMPONENT_SEPARATOR).nth(pos)
}

/// Cross-reference two parallel lists: find `filter` in `codes` and return
/// the entries of `ids` at the same positions.
///
/// Returns `None` if `filter` does not occur. Lists of different length
/// cannot be aligned: this is reported as an error and yields `None`.
#[must_use]
pub fn cross_reference(
    accessor: &RecordAccessor,
    codes: &[String],
    ids: &[String],
    filter: &str,
    what: &str,
) -> Option<Vec<String>> {
    let index = indices_of(codes, filter)?;
    if codes.len() != ids.len() {
        accessor.report(
            Severity::Error,
            ConditionKind::LengthMismatch,
            format!("Unequal number of {what}"),
        );
        return None;
    }
    Some(project(ids, &index))
}

/// Join two parallel lists element-wise with a space.
///
/// Lists of different length are reported as an error and yield `None`.
#[must_use]
pub fn zip_join(
    accessor: &RecordAccessor,
    left: &[String],
    right: &[String],
    what: &str,
) -> Option<Vec<String>> {
    if left.len() != right.len() {
        accessor.report(
            Severity::Error,
            ConditionKind::LengthMismatch,
            format!("Unequal number of {what}!"),
        );
        return None;
    }
    let joined: Vec<String> = left
        .iter()
        .zip(right)
        .map(|(l, r)| format!("{l} {r}"))
        .collect();
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Split every composite in `values` and keep component `pos`.
///
/// A composite without that component is reported and yields `None`.
#[must_use]
pub fn components(accessor: &RecordAccessor, values: &[String], pos: usize) -> Option<Vec<String>> {
    values
        .iter()
        .map(|value| component_of(accessor, value, pos).map(str::to_string))
        .collect()
}

/// Component `pos` of `value`, reporting a malformed composite.
#[must_use]
pub fn component_of<'v>(accessor: &RecordAccessor, value: &'v str, pos: usize) -> Option<&'v str> {
    let part = component(value, pos);
    if part.is_none() {
        accessor.report(
            Severity::Error,
            ConditionKind::MalformedValue,
            format!("Value '{value}' has no component {pos}"),
        );
    }
    part
}

/// Parse a date in a fixed format.
///
/// # Errors
///
/// Returns [`UnapiError::DateParse`] if `value` does not match `format`.
pub fn parse_date(value: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, format)
        .map(|date| posix_century(date, format))
        .map_err(|_| date_error(value, format))
}

/// Parse a timestamp in a fixed format.
///
/// A format without time fields yields midnight of the parsed day.
///
/// # Errors
///
/// Returns [`UnapiError::DateParse`] if `value` does not match `format`.
pub fn parse_datetime(value: &str, format: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|datetime| posix_century(datetime, format))
        .ok_or_else(|| date_error(value, format))
}

/// Parse a timestamp with `primary`, retrying with `fallback` on failure.
///
/// # Errors
///
/// Returns [`UnapiError::DateParse`] naming `fallback` if both fail.
pub fn parse_datetime_with_fallback(
    value: &str,
    primary: &str,
    fallback: &str,
) -> Result<NaiveDateTime> {
    parse_datetime(value, primary).or_else(|_| parse_datetime(value, fallback))
}

/// ISO 8601 form of a date, e.g. `2023-06-15`.
#[must_use]
pub fn iso_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// ISO 8601 form of a timestamp, e.g. `2023-06-15T09:30:00`.
///
/// Microseconds are appended only when non-zero.
#[must_use]
pub fn iso_datetime(datetime: &NaiveDateTime) -> String {
    if datetime.nanosecond() / 1_000 == 0 {
        datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        datetime.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// Parse every value of a list as a date.
///
/// # Errors
///
/// Returns the first parse failure.
pub fn parse_dates(values: &[String], format: &str) -> Result<Vec<NaiveDate>> {
    values.iter().map(|value| parse_date(value, format)).collect()
}

/// Parse every value of a list as a timestamp.
///
/// # Errors
///
/// Returns the first parse failure.
pub fn parse_datetimes(values: &[String], format: &str) -> Result<Vec<NaiveDateTime>> {
    values
        .iter()
        .map(|value| parse_datetime(value, format))
        .collect()
}

// Two-digit years 69-99 belong to the 20th century.
fn posix_century<T: Datelike + Copy>(value: T, format: &str) -> T {
    if format.contains("%y") && value.year() == MISREAD_TWO_DIGIT_YEAR {
        value.with_year(MISREAD_TWO_DIGIT_YEAR - 100).unwrap_or(value)
    } else {
        value
    }
}

fn date_error(value: &str, format: &str) -> UnapiError {
    UnapiError::DateParse {
        value: value.to_string(),
        format: format.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldRow, Record};
    use crate::report::MemoryReporter;
    use std::sync::Arc;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn accessor() -> (RecordAccessor, MemoryReporter) {
        let reporter = MemoryReporter::new();
        let accessor = RecordAccessor::with_reporter(
            "PicaJson",
            Record::new(vec![FieldRow::new("003@").with_subfield("0", "1")]),
            Arc::new(reporter.clone()),
        );
        (accessor, reporter)
    }

    #[test]
    fn test_indices_of() {
        let codes = strings(&["DE-14", "DE-15", "DE-14"]);
        assert_eq!(indices_of(&codes, "DE-14"), Some(vec![0, 2]));
        assert_eq!(indices_of(&codes, "DE-1"), None);
    }

    #[test]
    fn test_cross_reference_projects_matches() {
        let (accessor, reporter) = accessor();
        let codes = strings(&["DE-14", "DE-15", "DE-14"]);
        let ids = strings(&["111", "222", "333"]);
        assert_eq!(
            cross_reference(&accessor, &codes, &ids, "DE-14", "holding ISILs and PPNs"),
            Some(strings(&["111", "333"]))
        );
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_cross_reference_unequal_lengths() {
        let (accessor, reporter) = accessor();
        let codes = strings(&["DE-14", "DE-15", "DE-14"]);
        let ids = strings(&["111", "222"]);
        assert_eq!(
            cross_reference(&accessor, &codes, &ids, "DE-14", "holding ISILs and PPNs"),
            None
        );
        let errors = reporter.of_kind(ConditionKind::LengthMismatch);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Unequal number"));
    }

    #[test]
    fn test_component_split() {
        assert_eq!(component("1999:15-06-23", 0), Some("1999"));
        assert_eq!(component("1999:15-06-23", 1), Some("15-06-23"));
        assert_eq!(component("1999", 1), None);
    }

    #[test]
    fn test_components_report_malformed() {
        let (accessor, reporter) = accessor();
        assert_eq!(components(&accessor, &strings(&["1:a", "2"]), 1), None);
        assert_eq!(reporter.of_kind(ConditionKind::MalformedValue).len(), 1);
    }

    #[test]
    fn test_primary_timestamp_format() {
        let dt = parse_datetime_with_fallback("20230615093000.0", "%Y%m%d%H%M%S.0", "%Y%m%d222222:2")
            .unwrap();
        assert_eq!(iso_datetime(&dt), "2023-06-15T09:30:00");
    }

    #[test]
    fn test_fallback_timestamp_format() {
        let dt = parse_datetime_with_fallback("20230615222222:2", "%Y%m%d%H%M%S.0", "%Y%m%d222222:2")
            .unwrap();
        assert_eq!(iso_datetime(&dt), "2023-06-15T00:00:00");
    }

    #[test]
    fn test_both_formats_fail() {
        let err = parse_datetime_with_fallback("garbage", "%Y%m%d%H%M%S.0", "%Y%m%d222222:2")
            .unwrap_err();
        assert!(matches!(err, UnapiError::DateParse { ref format, .. } if format == "%Y%m%d222222:2"));
    }

    #[test]
    fn test_iso_datetime_keeps_microseconds() {
        let dt = parse_datetime("15-06-23 14:22:31.250", "%d-%m-%y %H:%M:%S%.f").unwrap();
        assert_eq!(iso_datetime(&dt), "2023-06-15T14:22:31.250000");
    }

    #[test]
    fn test_two_digit_years() {
        assert_eq!(iso_date(&parse_date("01-02-99", "%d-%m-%y").unwrap()), "1999-02-01");
        assert_eq!(iso_date(&parse_date("01-02-05", "%d-%m-%y").unwrap()), "2005-02-01");
    }

    #[test]
    fn test_two_digit_year_century_boundary() {
        assert_eq!(iso_date(&parse_date("01-01-68", "%d-%m-%y").unwrap()), "2068-01-01");
        assert_eq!(iso_date(&parse_date("01-01-69", "%d-%m-%y").unwrap()), "1969-01-01");
        assert_eq!(iso_date(&parse_date("690101", "%y%m%d").unwrap()), "1969-01-01");
        assert_eq!(
            iso_datetime(&parse_datetime("31-12-69 23:59:59.000", "%d-%m-%y %H:%M:%S%.f").unwrap()),
            "1969-12-31T23:59:59"
        );
        // Four-digit years are taken as written
        assert_eq!(iso_date(&parse_date("2069-01-01", "%Y-%m-%d").unwrap()), "2069-01-01");
    }

    #[test]
    fn test_zip_join_unequal() {
        let (accessor, reporter) = accessor();
        assert_eq!(
            zip_join(&accessor, &strings(&["a"]), &strings(&[]), "edit dates and times"),
            None
        );
        assert_eq!(reporter.of_kind(ConditionKind::LengthMismatch).len(), 1);
    }
}
