//! Named-column row records returned by backend fetches

use serde::{Deserialize, Serialize};

use crate::scalar::{Key, ScalarValue};

/// A single result row: ordered named columns with scalar values
///
/// Rows are narrow (a handful of columns), so lookups are a linear scan
/// over the column list rather than a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    columns: Vec<(String, ScalarValue)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column value, consuming and returning the row
    pub fn with(mut self, column: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.columns.push((column.into(), value.into()));
        self
    }

    /// Look up a column value by name
    pub fn get(&self, column: &str) -> Option<&ScalarValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterate over `(column, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns in this row
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether this row has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A row as returned by a backend fetch
///
/// Plain relationship fetches return bare target rows; junction-table
/// fetches return each target row paired with the parent key value read
/// from the junction table, since the target row itself does not carry
/// the parent's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedRow {
    /// Parent key attached by a junction-table fetch, `None` otherwise
    pub parent_key: Option<Key>,
    /// The target entity row
    pub node: Row,
}

impl FetchedRow {
    /// A bare target row from a plain relationship fetch
    pub fn node(row: Row) -> Self {
        Self {
            parent_key: None,
            node: row,
        }
    }

    /// A `(parent key, target row)` pair from a junction-table fetch
    pub fn with_parent(parent_key: Key, row: Row) -> Self {
        Self {
            parent_key: Some(parent_key),
            node: row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_get() {
        let row = Row::new().with("id", 1i64).with("name", "alpha");
        assert_eq!(row.get("id"), Some(&ScalarValue::Int(1)));
        assert_eq!(row.get("name"), Some(&ScalarValue::Text("alpha".into())));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_row_preserves_column_order() {
        let row = Row::new().with("b", 2i64).with("a", 1i64);
        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_fetched_row_constructors() {
        let plain = FetchedRow::node(Row::new().with("id", 1i64));
        assert!(plain.parent_key.is_none());

        let junction = FetchedRow::with_parent(Key::single(9i64), Row::new().with("id", 1i64));
        assert_eq!(junction.parent_key, Some(Key::single(9i64)));
    }
}
