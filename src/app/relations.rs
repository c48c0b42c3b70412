//! Foreign-key value domains.
//!
//! The options offered for a foreign-key column are the distinct values
//! currently stored in the referenced column. They reflect current rows only.

use super::data_engine::{fetch_record_set, load_table_schema, require_table, DataEngine};
use crate::domain::schema::{find_relation, FieldDomain, ForeignKeyRelation, RelatedRecords};
use crate::error::{EngineError, Result};
use crate::storage::mysql::{catalog, codec::decode_cell};
use crate::storage::sql::builder;
use serde_json::Value as JsonValue;
use sqlx::MySqlConnection;

impl DataEngine {
    /// Legal values for `table.column`, or an empty vector when the column
    /// does not reference another table.
    pub async fn get_foreign_key_options(&self, table: &str, column: &str) -> Result<Vec<JsonValue>> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::schema).await?;

        let relations = catalog::foreign_keys(conn, table)
            .await
            .map_err(|e| EngineError::schema(table, e))?;
        let Some(relation) = find_relation(&relations, column) else {
            return Ok(Vec::new());
        };

        let options = referenced_values(conn, relation)
            .await
            .map_err(|e| EngineError::schema(table, e))?;
        tracing::debug!(table, column, options = options.len(), "resolved foreign key options");
        Ok(options)
    }

    /// One entry per column a caller may fill on insert, with the option
    /// list attached to foreign-key columns.
    pub async fn input_domains(&self, table: &str) -> Result<Vec<FieldDomain>> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::schema).await?;

        let schema = load_table_schema(conn, table).await?;

        let mut domains = Vec::new();
        for column in schema.editable_columns() {
            let options = match schema.foreign_key_for(&column.name) {
                Some(relation) => Some(
                    referenced_values(conn, relation)
                        .await
                        .map_err(|e| EngineError::schema(table, e))?,
                ),
                None => None,
            };
            domains.push(FieldDomain {
                column: column.name.clone(),
                data_type: column.data_type.clone(),
                is_nullable: column.is_nullable,
                options,
            });
        }
        Ok(domains)
    }

    /// Every table referenced by `table`, read in full, next to the relation
    /// that references it.
    pub async fn related_records(&self, table: &str) -> Result<Vec<RelatedRecords>> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::schema).await?;

        let relations = catalog::foreign_keys(conn, table)
            .await
            .map_err(|e| EngineError::schema(table, e))?;

        let mut related = Vec::with_capacity(relations.len());
        for relation in relations {
            let sql = format!(
                "SELECT * FROM {}",
                builder::qualified_name(&relation.referenced_schema, &relation.referenced_table)
            );
            let records = fetch_record_set(conn, &sql)
                .await
                .map_err(|e| EngineError::read(&relation.referenced_table, e))?;
            related.push(RelatedRecords { relation, records });
        }
        Ok(related)
    }
}

/// Distinct values of the referenced column, in storage order.
async fn referenced_values(
    conn: &mut MySqlConnection,
    relation: &ForeignKeyRelation,
) -> std::result::Result<Vec<JsonValue>, sqlx::Error> {
    let sql = builder::select_distinct(
        &relation.referenced_schema,
        &relation.referenced_table,
        &relation.referenced_column,
    );
    let rows = sqlx::query(&sql).fetch_all(&mut *conn).await?;
    rows.iter().map(|r| decode_cell(r, 0)).collect()
}
