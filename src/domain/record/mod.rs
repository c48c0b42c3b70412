//! Result sets and value handling.

use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

pub mod normalize;

pub use normalize::{normalize_input, normalize_inputs};

/// Output of a read: an ordered column list and rows aligned to it.
///
/// Immutable once built; callers re-render it but cannot edit it in place.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RecordSet {
    columns: Vec<String>,
    #[schema(value_type = Vec<Vec<Object>>)]
    rows: Vec<Vec<JsonValue>>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<JsonValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<JsonValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value of `column` in row `row`.
    pub fn value(&self, row: usize, column: &str) -> Option<&JsonValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Number of rows whose values for `columns` equal `values`.
    pub fn count_matching(&self, columns: &[&str], values: &[JsonValue]) -> usize {
        let Some(indices) = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Option<Vec<_>>>()
        else {
            return 0;
        };
        self.rows
            .iter()
            .filter(|row| {
                indices
                    .iter()
                    .zip(values)
                    .all(|(idx, expected)| row.get(*idx) == Some(expected))
            })
            .count()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<JsonValue>>) {
        (self.columns, self.rows)
    }
}
