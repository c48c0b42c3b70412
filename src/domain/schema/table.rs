use super::{ColumnDescriptor, ForeignKeyRelation, PrimaryKey};
use crate::domain::record::RecordSet;
use serde::Serialize;
use utoipa::ToSchema;

/// Full shape of one table, assembled fresh from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    /// `None` when the table declares no primary key.
    pub primary_key: Option<PrimaryKey>,
    pub foreign_keys: Vec<ForeignKeyRelation>,
}

impl TableSchema {
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Columns a caller may supply on insert, in table order.
    pub fn editable_columns(&self) -> Vec<&ColumnDescriptor> {
        self.columns.iter().filter(|c| !c.is_auto_generated).collect()
    }

    pub fn foreign_key_for(&self, column: &str) -> Option<&ForeignKeyRelation> {
        super::find_relation(&self.foreign_keys, column)
    }
}

/// Rows of a referenced table, listed next to the relation that points at it.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RelatedRecords {
    pub relation: ForeignKeyRelation,
    pub records: RecordSet,
}
