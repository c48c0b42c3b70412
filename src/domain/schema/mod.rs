//! Table shape discovered at runtime from the catalog.
//!
//! Nothing in here is persisted or cached: every value is rebuilt from live
//! `information_schema` queries on each call, so a schema change between two
//! calls is always observed.

use serde::Serialize;
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

pub mod table;

pub use table::{RelatedRecords, TableSchema};

/// One column as described by `information_schema.COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Catalog data type (e.g. `int`, `varchar`, `decimal`).
    pub data_type: String,
    pub is_nullable: bool,
    /// The server assigns the value on insert (`auto_increment` or a
    /// generated column). Such columns are left out of write forms.
    pub is_auto_generated: bool,
    pub is_primary_key: bool,
}

impl ColumnDescriptor {
    /// Interprets the catalog `EXTRA` attribute.
    ///
    /// `DEFAULT_GENERATED` only marks an expression default and still accepts
    /// caller-supplied values, so it does not count.
    pub fn is_auto_generated_extra(extra: &str) -> bool {
        let extra = extra.to_ascii_lowercase();
        extra.contains("auto_increment")
            || extra.contains("virtual generated")
            || extra.contains("stored generated")
    }

    /// Byte-string column; reads render it as hex.
    pub fn is_binary(&self) -> bool {
        matches!(
            self.data_type.as_str(),
            "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob"
        )
    }

    pub fn is_json(&self) -> bool {
        self.data_type == "json"
    }
}

/// `source_column` of the described table references
/// `referenced_schema.referenced_table(referenced_column)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ForeignKeyRelation {
    pub constraint_name: String,
    pub source_column: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Finds the relation declared for `column`, if any.
pub fn find_relation<'a>(
    relations: &'a [ForeignKeyRelation],
    column: &str,
) -> Option<&'a ForeignKeyRelation> {
    relations.iter().find(|r| r.source_column == column)
}

/// Columns of the `PRIMARY` constraint in key order. Never empty; a table
/// without a primary key is represented by `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PrimaryKey {
    pub columns: Vec<String>,
}

impl PrimaryKey {
    pub fn new(columns: Vec<String>) -> Option<Self> {
        if columns.is_empty() {
            None
        } else {
            Some(Self { columns })
        }
    }

    /// The key column when the key spans exactly one column.
    pub fn single_column(&self) -> Option<&str> {
        match self.columns.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// Input domain of one writable column.
///
/// `options` is `Some` for foreign-key columns and lists the values currently
/// present in the referenced column.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldDomain {
    pub column: String,
    pub data_type: String,
    pub is_nullable: bool,
    #[schema(value_type = Option<Vec<Object>>)]
    pub options: Option<Vec<JsonValue>>,
}
