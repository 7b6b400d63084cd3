//! Property-based tests for field rows and subfield extraction
//!
//! Invariants that hold for all generated rows:
//! - Every subfield position points just past a matching code
//! - Collapsing then splitting recovers the rows
//! - A tag occurring once resolves to its row; any other count does not
//! - Getters do not mutate the accessor

use proptest::prelude::*;
use std::sync::Arc;
use unapi::accessor::FieldMatch;
use unapi::subfield::{collapse, split_collapsed, subfield_positions};
use unapi::{
    ConditionKind, Element, FieldRow, MemoryReporter, Record, RecordAccessor, ValueQuery,
};

fn code() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["0", "a", "b", "t", "B"]).prop_map(str::to_string)
}

fn value() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 :.-]{1,12}"
}

fn row(tag: &'static str) -> impl Strategy<Value = FieldRow> {
    prop::collection::vec((code(), value()), 0..6).prop_map(move |pairs| {
        pairs
            .into_iter()
            .fold(FieldRow::new(tag).with_element(Element::Null), |row, (c, v)| {
                row.with_subfield(&c, v)
            })
    })
}

proptest! {
    #[test]
    fn prop_positions_follow_code(row in row("045R"), code in code()) {
        match subfield_positions(&row, &code) {
            Some(positions) => {
                for p in positions {
                    prop_assert_eq!(row.get(p - 1).and_then(Element::as_text), Some(code.as_str()));
                    prop_assert!(p < row.len());
                }
            }
            None => {
                // A code in the last slot has no value and does not count
                prop_assert!(row
                    .elements()
                    .iter()
                    .skip(1)
                    .take(row.len().saturating_sub(2))
                    .all(|element| element.as_text() != Some(code.as_str())));
            }
        }
    }

    #[test]
    fn prop_collapse_split_roundtrip(
        rows in prop::collection::vec(prop::collection::vec(value(), 1..4), 1..5)
    ) {
        let elements: Vec<Vec<Element>> = rows
            .iter()
            .map(|row| row.iter().map(|v| Element::from(v.as_str())).collect())
            .collect();
        prop_assert_eq!(split_collapsed(&collapse(&elements)), rows);
    }

    #[test]
    fn prop_unique_field_resolution(count in 0usize..4) {
        let rows: Vec<FieldRow> = (0..count)
            .map(|i| FieldRow::new("003@").with_element(Element::Null).with_subfield("0", i.to_string()))
            .collect();
        let reporter = MemoryReporter::new();
        let accessor = RecordAccessor::with_reporter("Test", Record::new(rows), Arc::new(reporter.clone()));

        let found = accessor.get_field("003@", true);
        if count == 1 {
            prop_assert!(matches!(found, Some(FieldMatch::Single(_))));
            prop_assert!(reporter.is_empty());
        } else {
            prop_assert!(found.is_none());
            let warnings = reporter.of_kind(ConditionKind::FieldCardinality);
            prop_assert_eq!(warnings.len(), 1);
            let expected = format!("Found {count} occurrences");
            prop_assert!(warnings[0].message.contains(&expected));
        }
    }

    #[test]
    fn prop_getters_are_idempotent(rows in prop::collection::vec(row("045R"), 1..5), code in code()) {
        let accessor = RecordAccessor::with_reporter(
            "Test",
            Record::new(rows),
            Arc::new(MemoryReporter::new()),
        );
        let query = ValueQuery::multiple().repeat(false);
        let first = accessor.get_value("045R", &code, &query);
        let second = accessor.get_value("045R", &code, &query);
        prop_assert_eq!(first, second);
    }
}
