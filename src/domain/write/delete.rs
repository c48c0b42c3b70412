use crate::domain::schema::PrimaryKey;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// How a single row is targeted for deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DeleteStrategy {
    /// `DELETE … WHERE column = ?`. Removes every row carrying the key value,
    /// which is at most one for a real primary key.
    ByPrimaryKey {
        column: String,
        #[schema(value_type = Object)]
        value: JsonValue,
    },
    /// `DELETE … WHERE c1 = ? AND c2 IS NULL … LIMIT 1`.
    ///
    /// Used when the table has no single-column primary key. Duplicate rows
    /// cannot be told apart, so exactly one of them is removed per call.
    ByFullRowMatch {
        columns: Vec<String>,
        #[schema(value_type = Vec<Object>)]
        values: Vec<JsonValue>,
    },
}

impl DeleteStrategy {
    /// Full-row match over `row`, which must be aligned to `columns`.
    pub fn full_row(table: &str, columns: &[String], row: &[JsonValue]) -> Result<Self> {
        if columns.is_empty() {
            return Err(EngineError::invalid_input(
                table,
                "cannot match a row of a table without columns",
            ));
        }
        if columns.len() != row.len() {
            return Err(EngineError::invalid_input(
                table,
                format!(
                    "row has {} values but the table has {} columns",
                    row.len(),
                    columns.len()
                ),
            ));
        }
        Ok(DeleteStrategy::ByFullRowMatch {
            columns: columns.to_vec(),
            values: row.to_vec(),
        })
    }

    /// Picks the strategy for deleting `row` (aligned to `columns`).
    ///
    /// A single-column key whose value is present in the row deletes by key.
    /// A composite key, a missing key, or a NULL key value falls back to
    /// matching the whole row.
    pub fn select(
        table: &str,
        primary_key: Option<&PrimaryKey>,
        columns: &[String],
        row: &[JsonValue],
    ) -> Result<Self> {
        if let Some(pk_column) = primary_key.and_then(PrimaryKey::single_column) {
            if columns.len() != row.len() {
                return Err(EngineError::invalid_input(
                    table,
                    format!(
                        "row has {} values but the table has {} columns",
                        row.len(),
                        columns.len()
                    ),
                ));
            }
            if let Some(idx) = columns.iter().position(|c| c == pk_column) {
                if !row[idx].is_null() {
                    return Ok(DeleteStrategy::ByPrimaryKey {
                        column: pk_column.to_string(),
                        value: row[idx].clone(),
                    });
                }
            }
        }
        Self::full_row(table, columns, row)
    }

    pub fn is_full_row_match(&self) -> bool {
        matches!(self, DeleteStrategy::ByFullRowMatch { .. })
    }

    /// Column names the strategy places into SQL text.
    pub fn referenced_columns(&self) -> Vec<&str> {
        match self {
            DeleteStrategy::ByPrimaryKey { column, .. } => vec![column.as_str()],
            DeleteStrategy::ByFullRowMatch { columns, .. } => {
                columns.iter().map(String::as_str).collect()
            }
        }
    }
}
