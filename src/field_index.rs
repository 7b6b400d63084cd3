//! Tag index over the rows of a [`Record`].
//!
//! The index is built once when an accessor is constructed. It maps every tag
//! to the positions of its rows, in the order the rows appear in the record.
//! The index is never rebuilt: it describes the record as it was at
//! construction time.

use crate::record::Record;
use indexmap::IndexMap;

/// Mapping from field tag to row positions.
///
/// Tags are kept in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldIndex {
    positions: IndexMap<String, Vec<usize>>,
}

impl FieldIndex {
    /// Build the index in a single pass over the record.
    #[must_use]
    pub fn build(record: &Record) -> Self {
        let mut positions: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (i, row) in record.rows().iter().enumerate() {
            positions.entry(row.tag().to_string()).or_default().push(i);
        }
        FieldIndex { positions }
    }

    /// Positions of all rows with `tag`.
    ///
    /// Returns `None` when the tag never occurs. A present tag always has at
    /// least one position.
    #[must_use]
    pub fn positions_of(&self, tag: &str) -> Option<&[usize]> {
        self.positions.get(tag).map(Vec::as_slice)
    }

    /// Number of rows with `tag`.
    #[must_use]
    pub fn count(&self, tag: &str) -> usize {
        self.positions.get(tag).map_or(0, Vec::len)
    }

    /// Iterate over the indexed tags in order of first appearance.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(String::as_str)
    }
}
