//! The data-access engine.
//!
//! This module owns the single database connection and is responsible for:
//! 1.  Introspecting the current schema (tables, columns, keys) on every call.
//! 2.  Checking every identifier against the live catalog before it is placed
//!     into SQL text.
//! 3.  Executing the generated CRUD statements and procedure calls, and
//!     mapping driver failures into [`EngineError`].
//!
//! All operations serialize on the connection mutex: an operation holds the
//! connection for its whole validate-then-execute sequence.

use crate::domain::record::RecordSet;
use crate::domain::schema::{ColumnDescriptor, ForeignKeyRelation, PrimaryKey, TableSchema};
use crate::domain::write::{DeleteStrategy, ProcedureWrite};
use crate::error::{EngineError, Result};
use crate::infra::config::ConnectionParams;
use crate::storage::mysql::{bind_all, catalog, decode_row};
use crate::storage::sql::{builder, BuiltQuery};
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlStatement;
use sqlx::{Column, Connection, Executor, MySqlConnection, Statement};
use tokio::sync::Mutex;

/// Builds an [`EngineError`] from a driver error, attributed to a table.
type ErrorMapper = fn(&str, sqlx::Error) -> EngineError;

pub struct DataEngine {
    pub(super) conn: Mutex<MySqlConnection>,
    schema: String,
}

impl DataEngine {
    /// Opens the connection described by `params`.
    pub async fn connect(params: &ConnectionParams) -> Result<Self> {
        let options = params.connect_options().map_err(EngineError::connection)?;
        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(EngineError::connection)?;
        tracing::info!(database = %params.describe(), "connected to database");
        Self::with_connection(conn).await
    }

    /// Takes ownership of an already opened connection. A schema must be
    /// selected on it.
    pub async fn with_connection(mut conn: MySqlConnection) -> Result<Self> {
        let schema = catalog::current_schema(&mut conn)
            .await
            .map_err(EngineError::connection)?
            .ok_or_else(|| EngineError::connection("no schema selected on the connection"))?;
        Ok(Self {
            conn: Mutex::new(conn),
            schema,
        })
    }

    /// Name of the schema every operation is scoped to.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.lock().await;
        conn.ping().await.map_err(EngineError::connection)
    }

    /// Closes the connection gracefully. The engine is unusable afterwards.
    pub async fn close(self) -> Result<()> {
        self.conn
            .into_inner()
            .close()
            .await
            .map_err(EngineError::connection)
    }

    // ----- introspection -----

    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let mut conn = self.conn.lock().await;
        catalog::list_tables(&mut conn)
            .await
            .map_err(EngineError::connection)
    }

    pub async fn describe_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::schema).await?;
        catalog::describe_columns(conn, table)
            .await
            .map_err(|e| EngineError::schema(table, e))
    }

    pub async fn get_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyRelation>> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::schema).await?;
        catalog::foreign_keys(conn, table)
            .await
            .map_err(|e| EngineError::schema(table, e))
    }

    /// `Ok(None)` is the normal answer for a table without a primary key.
    pub async fn get_primary_key(&self, table: &str) -> Result<Option<PrimaryKey>> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::schema).await?;
        catalog::primary_key(conn, table)
            .await
            .map_err(|e| EngineError::schema(table, e))
    }

    pub async fn describe_table(&self, table: &str) -> Result<TableSchema> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::schema).await?;
        load_table_schema(conn, table).await
    }

    pub async fn list_procedures(&self) -> Result<Vec<String>> {
        let mut conn = self.conn.lock().await;
        catalog::list_procedures(&mut conn)
            .await
            .map_err(|e| EngineError::schema(&self.schema, e))
    }

    // ----- read -----

    /// `SELECT *` over the whole table. Column names come from the statement
    /// metadata, so they match what was fetched even for an empty table.
    pub async fn read(&self, table: &str) -> Result<RecordSet> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::read).await?;
        let records = fetch_record_set(conn, &builder::select_all(table))
            .await
            .map_err(|e| EngineError::read(table, e))?;
        tracing::debug!(table, rows = records.len(), "read table");
        Ok(records)
    }

    // ----- writes -----

    /// Inserts one row. `columns` and `values` are aligned by position.
    pub async fn insert(&self, table: &str, columns: &[String], values: &[JsonValue]) -> Result<u64> {
        let query = builder::insert(table, columns, values)?;

        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::write).await?;
        require_columns(conn, table, columns.iter().map(String::as_str), EngineError::write).await?;

        let affected = execute_write(conn, table, &query).await?;
        tracing::info!(table, columns = columns.len(), affected, "inserted row");
        Ok(affected)
    }

    /// Updates the row identified by `primary_key_column = primary_key_value`.
    ///
    /// Empty input becomes NULL for every column (see
    /// [`normalize_input`](crate::domain::record::normalize_input)).
    pub async fn update(
        &self,
        table: &str,
        columns: &[String],
        values: &[JsonValue],
        primary_key_column: &str,
        primary_key_value: &JsonValue,
    ) -> Result<u64> {
        let query = builder::update(table, columns, values, primary_key_column, primary_key_value)?;

        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::write).await?;
        require_columns(
            conn,
            table,
            columns
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(primary_key_column)),
            EngineError::write,
        )
        .await?;

        let affected = execute_write(conn, table, &query).await?;
        tracing::info!(table, key = primary_key_column, affected, "updated row");
        Ok(affected)
    }

    /// Deletes by key. Matching no row is not an error; the result is `0`.
    pub async fn delete(
        &self,
        table: &str,
        primary_key_column: &str,
        primary_key_value: &JsonValue,
    ) -> Result<u64> {
        let strategy = DeleteStrategy::ByPrimaryKey {
            column: primary_key_column.to_string(),
            value: primary_key_value.clone(),
        };
        self.delete_with(table, &strategy).await
    }

    /// Deletes one row of a table that has no usable primary key.
    ///
    /// `row` is aligned to the column order returned by [`read`](Self::read).
    /// At most one row is removed even if several are identical.
    pub async fn delete_without_primary_key(&self, table: &str, row: &[JsonValue]) -> Result<u64> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::write).await?;
        let columns = result_columns(conn, table)
            .await
            .map_err(|e| EngineError::write(table, e))?;
        let descriptors = catalog::describe_columns(conn, table)
            .await
            .map_err(|e| EngineError::write(table, e))?;
        let strategy = DeleteStrategy::full_row(table, &columns, row)?;
        run_delete(conn, table, &strategy, &descriptors).await
    }

    /// Deletes `row` (aligned to the read column order), choosing the strategy
    /// from the table's primary key.
    pub async fn delete_row(&self, table: &str, row: &[JsonValue]) -> Result<u64> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::write).await?;
        let columns = result_columns(conn, table)
            .await
            .map_err(|e| EngineError::write(table, e))?;
        let primary_key = catalog::primary_key(conn, table)
            .await
            .map_err(|e| EngineError::write(table, e))?;
        let descriptors = catalog::describe_columns(conn, table)
            .await
            .map_err(|e| EngineError::write(table, e))?;
        let strategy = DeleteStrategy::select(table, primary_key.as_ref(), &columns, row)?;
        run_delete(conn, table, &strategy, &descriptors).await
    }

    /// Executes an explicit delete strategy.
    pub async fn delete_with(&self, table: &str, strategy: &DeleteStrategy) -> Result<u64> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;
        require_table(conn, table, EngineError::write).await?;
        let descriptors = require_columns(
            conn,
            table,
            strategy.referenced_columns().into_iter(),
            EngineError::write,
        )
        .await?;
        run_delete(conn, table, strategy, &descriptors).await
    }

    /// Calls a stored procedure of the current schema with positional
    /// arguments.
    pub async fn invoke_procedure(&self, write: &ProcedureWrite) -> Result<u64> {
        let mut guard = self.conn.lock().await;
        let conn = &mut *guard;

        let exists = catalog::procedure_exists(conn, &write.name)
            .await
            .map_err(|e| EngineError::write(&write.name, e))?;
        if !exists {
            return Err(EngineError::UnknownProcedure(write.name.clone()));
        }

        let query = builder::call(write);
        let affected = execute_write(conn, &write.name, &query).await?;
        tracing::info!(procedure = %write.name, args = write.args.len(), affected, "called procedure");
        Ok(affected)
    }
}

// ----- helpers shared by the impl blocks -----

pub(crate) async fn require_table(
    conn: &mut MySqlConnection,
    table: &str,
    on_error: ErrorMapper,
) -> Result<()> {
    let exists = catalog::table_exists(conn, table)
        .await
        .map_err(|e| on_error(table, e))?;
    if exists {
        Ok(())
    } else {
        Err(EngineError::UnknownTable(table.to_string()))
    }
}

pub(crate) async fn require_columns<'a>(
    conn: &mut MySqlConnection,
    table: &str,
    columns: impl Iterator<Item = &'a str>,
    on_error: ErrorMapper,
) -> Result<Vec<ColumnDescriptor>> {
    let known = catalog::describe_columns(conn, table)
        .await
        .map_err(|e| on_error(table, e))?;
    for column in columns {
        if !known.iter().any(|c| c.name == column) {
            return Err(EngineError::UnknownColumn {
                table: table.to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(known)
}

pub(crate) async fn load_table_schema(conn: &mut MySqlConnection, table: &str) -> Result<TableSchema> {
    let columns = catalog::describe_columns(conn, table)
        .await
        .map_err(|e| EngineError::schema(table, e))?;
    let primary_key = catalog::primary_key(conn, table)
        .await
        .map_err(|e| EngineError::schema(table, e))?;
    let foreign_keys = catalog::foreign_keys(conn, table)
        .await
        .map_err(|e| EngineError::schema(table, e))?;
    Ok(TableSchema {
        name: table.to_string(),
        columns,
        primary_key,
        foreign_keys,
    })
}

/// Prepares `sql` without reusing cached statement metadata.
///
/// The driver keeps result columns per statement text; after an `ALTER TABLE`
/// a cached entry would describe the old shape.
async fn prepare_fresh<'q>(
    conn: &mut MySqlConnection,
    sql: &'q str,
) -> std::result::Result<MySqlStatement<'q>, sqlx::Error> {
    conn.clear_cached_statements().await?;
    (&mut *conn).prepare(sql).await
}

fn statement_columns(statement: &MySqlStatement<'_>) -> Vec<String> {
    statement
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect()
}

/// Prepares `sql`, then fetches every row and decodes it.
pub(crate) async fn fetch_record_set(
    conn: &mut MySqlConnection,
    sql: &str,
) -> std::result::Result<RecordSet, sqlx::Error> {
    let statement = prepare_fresh(conn, sql).await?;
    let columns = statement_columns(&statement);
    let rows = statement.query().fetch_all(&mut *conn).await?;
    let rows = rows.iter().map(decode_row).collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(RecordSet::new(columns, rows))
}

/// Column names a `SELECT *` on `table` would return, without fetching rows.
async fn result_columns(
    conn: &mut MySqlConnection,
    table: &str,
) -> std::result::Result<Vec<String>, sqlx::Error> {
    let sql = builder::select_all(table);
    let statement = prepare_fresh(conn, &sql).await?;
    Ok(statement_columns(&statement))
}

async fn run_delete(
    conn: &mut MySqlConnection,
    table: &str,
    strategy: &DeleteStrategy,
    descriptors: &[ColumnDescriptor],
) -> Result<u64> {
    let query = builder::delete(table, strategy, descriptors)?;
    let affected = execute_write(conn, table, &query).await?;
    tracing::info!(
        table,
        full_row_match = strategy.is_full_row_match(),
        affected,
        "deleted row"
    );
    Ok(affected)
}

/// Runs one mutating statement in its own transaction and commits it.
async fn execute_write(conn: &mut MySqlConnection, target: &str, query: &BuiltQuery) -> Result<u64> {
    let mut tx = conn.begin().await.map_err(|e| EngineError::write(target, e))?;

    let result = match bind_all(sqlx::query(&query.sql), &query.params)
        .execute(&mut *tx)
        .await
    {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(write_target = target, error = %e, "write failed");
            // Dropping `tx` rolls back; nothing of the statement persists.
            return Err(EngineError::write(target, e));
        }
    };

    tx.commit().await.map_err(|e| EngineError::write(target, e))?;
    Ok(result.rows_affected())
}
