//! `information_schema` queries, always scoped to the connection's current
//! schema (`DATABASE()`), so identically named tables in other schemas never
//! leak into the results.

use super::codec::{get_text, get_text_or_empty};
use crate::domain::schema::{ColumnDescriptor, ForeignKeyRelation, PrimaryKey};
use sqlx::{MySqlConnection, Row};

/// Name of the schema the connection is using, if one is selected.
pub async fn current_schema(conn: &mut MySqlConnection) -> Result<Option<String>, sqlx::Error> {
    let row = sqlx::query("SELECT DATABASE() AS schema_name")
        .fetch_one(&mut *conn)
        .await?;
    get_text(&row, "schema_name")
}

/// Base tables and views of the current schema, ordered by name.
pub async fn list_tables(conn: &mut MySqlConnection) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT TABLE_NAME AS table_name
         FROM information_schema.TABLES
         WHERE TABLE_SCHEMA = DATABASE()
         ORDER BY TABLE_NAME",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|r| get_text_or_empty(r, "table_name"))
        .collect()
}

pub async fn table_exists(conn: &mut MySqlConnection, table: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM information_schema.TABLES
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?",
    )
    .bind(table)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}

/// Columns of `table` in their native ordinal order.
pub async fn describe_columns(
    conn: &mut MySqlConnection,
    table: &str,
) -> Result<Vec<ColumnDescriptor>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT COLUMN_NAME AS column_name,
                DATA_TYPE AS data_type,
                IS_NULLABLE AS is_nullable,
                EXTRA AS extra,
                COLUMN_KEY AS column_key
         FROM information_schema.COLUMNS
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
         ORDER BY ORDINAL_POSITION",
    )
    .bind(table)
    .fetch_all(&mut *conn)
    .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for r in rows {
        let name = get_text_or_empty(&r, "column_name")?;
        if name.is_empty() {
            continue;
        }
        let extra = get_text_or_empty(&r, "extra")?;
        columns.push(ColumnDescriptor {
            name,
            data_type: get_text_or_empty(&r, "data_type")?.to_lowercase(),
            is_nullable: get_text_or_empty(&r, "is_nullable")?.eq_ignore_ascii_case("YES"),
            is_auto_generated: ColumnDescriptor::is_auto_generated_extra(&extra),
            is_primary_key: get_text_or_empty(&r, "column_key")?.eq_ignore_ascii_case("PRI"),
        });
    }
    Ok(columns)
}

/// Foreign keys declared on `table`; empty when it has none.
pub async fn foreign_keys(
    conn: &mut MySqlConnection,
    table: &str,
) -> Result<Vec<ForeignKeyRelation>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT CONSTRAINT_NAME AS constraint_name,
                COLUMN_NAME AS column_name,
                REFERENCED_TABLE_SCHEMA AS referenced_schema,
                REFERENCED_TABLE_NAME AS referenced_table,
                REFERENCED_COLUMN_NAME AS referenced_column
         FROM information_schema.KEY_COLUMN_USAGE
         WHERE TABLE_SCHEMA = DATABASE()
           AND TABLE_NAME = ?
           AND REFERENCED_TABLE_NAME IS NOT NULL
         ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION",
    )
    .bind(table)
    .fetch_all(&mut *conn)
    .await?;

    let mut relations = Vec::with_capacity(rows.len());
    for r in rows {
        let Some(referenced_table) = get_text(&r, "referenced_table")? else {
            continue;
        };
        relations.push(ForeignKeyRelation {
            constraint_name: get_text_or_empty(&r, "constraint_name")?,
            source_column: get_text_or_empty(&r, "column_name")?,
            referenced_schema: get_text_or_empty(&r, "referenced_schema")?,
            referenced_table,
            referenced_column: get_text_or_empty(&r, "referenced_column")?,
        });
    }
    Ok(relations)
}

/// Columns of the `PRIMARY` constraint, or `None` when the table has none.
pub async fn primary_key(
    conn: &mut MySqlConnection,
    table: &str,
) -> Result<Option<PrimaryKey>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT COLUMN_NAME AS column_name
         FROM information_schema.KEY_COLUMN_USAGE
         WHERE TABLE_SCHEMA = DATABASE()
           AND TABLE_NAME = ?
           AND CONSTRAINT_NAME = 'PRIMARY'
         ORDER BY ORDINAL_POSITION",
    )
    .bind(table)
    .fetch_all(&mut *conn)
    .await?;

    let columns = rows
        .iter()
        .map(|r| get_text_or_empty(r, "column_name"))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PrimaryKey::new(columns))
}

/// Stored procedures of the current schema, ordered by name.
pub async fn list_procedures(conn: &mut MySqlConnection) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT ROUTINE_NAME AS routine_name
         FROM information_schema.ROUTINES
         WHERE ROUTINE_SCHEMA = DATABASE() AND ROUTINE_TYPE = 'PROCEDURE'
         ORDER BY ROUTINE_NAME",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.iter()
        .map(|r| get_text_or_empty(r, "routine_name"))
        .collect()
}

pub async fn procedure_exists(conn: &mut MySqlConnection, name: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*)
         FROM information_schema.ROUTINES
         WHERE ROUTINE_SCHEMA = DATABASE()
           AND ROUTINE_TYPE = 'PROCEDURE'
           AND ROUTINE_NAME = ?",
    )
    .bind(name)
    .fetch_one(&mut *conn)
    .await?;
    Ok(count > 0)
}
