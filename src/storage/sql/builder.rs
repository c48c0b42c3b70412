//! SQL text for the generic CRUD statements.
//!
//! Identifiers are the only thing written into the statement text; they are
//! expected to be checked against the catalog before they get here, and are
//! quoted regardless. Every value travels as a bound `?` parameter.

use crate::domain::record::normalize_inputs;
use crate::domain::schema::ColumnDescriptor;
use crate::domain::write::{DeleteStrategy, ProcedureWrite};
use crate::error::{EngineError, Result};
use serde_json::Value as JsonValue;

/// Statement text plus the values to bind, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<JsonValue>,
}

/// Backtick-quotes an identifier, doubling any embedded backtick.
pub fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

pub fn qualified_name(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

fn ensure_aligned(target: &str, columns: usize, values: usize) -> Result<()> {
    if columns != values {
        return Err(EngineError::invalid_input(
            target,
            format!("{} columns but {} values", columns, values),
        ));
    }
    Ok(())
}

pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {}", quote_ident(table))
}

/// Distinct values of a referenced column, in storage order.
pub fn select_distinct(schema: &str, table: &str, column: &str) -> String {
    format!(
        "SELECT DISTINCT {} FROM {}",
        quote_ident(column),
        qualified_name(schema, table)
    )
}

/// `INSERT INTO t (c1, c2) VALUES (?, ?)`.
///
/// An empty column list yields `INSERT INTO t () VALUES ()`, which lets the
/// server fill every column from its defaults.
pub fn insert<S: AsRef<str>>(table: &str, columns: &[S], values: &[JsonValue]) -> Result<BuiltQuery> {
    ensure_aligned(table, columns.len(), values.len())?;
    let column_list = columns
        .iter()
        .map(|c| quote_ident(c.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(BuiltQuery {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            column_list,
            placeholders(values.len())
        ),
        params: values.to_vec(),
    })
}

/// `UPDATE t SET c1 = ?, … WHERE pk = ?`.
///
/// Values are normalized (empty input becomes NULL); the key value is bound
/// as given.
pub fn update<S: AsRef<str>>(
    table: &str,
    columns: &[S],
    values: &[JsonValue],
    primary_key_column: &str,
    primary_key_value: &JsonValue,
) -> Result<BuiltQuery> {
    ensure_aligned(table, columns.len(), values.len())?;
    if columns.is_empty() {
        return Err(EngineError::invalid_input(table, "update needs at least one column"));
    }
    let set_clause = columns
        .iter()
        .map(|c| format!("{} = ?", quote_ident(c.as_ref())))
        .collect::<Vec<_>>()
        .join(", ");

    let mut params = normalize_inputs(values);
    params.push(primary_key_value.clone());

    Ok(BuiltQuery {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quote_ident(table),
            set_clause,
            quote_ident(primary_key_column)
        ),
        params,
    })
}

/// `column = ?` written so that a value exactly as returned by a read
/// compares equal to the stored one.
///
/// Binary cells are read as hex and JSON cells as parsed documents, so the
/// parameter is converted back on the server side (`UNHEX`, `CAST AS JSON`).
fn equals(column: &str, value: &JsonValue, descriptors: &[ColumnDescriptor]) -> (String, JsonValue) {
    let descriptor = descriptors.iter().find(|d| d.name == column);
    let quoted = quote_ident(column);
    match descriptor {
        Some(d) if d.is_binary() => (format!("{} = UNHEX(?)", quoted), value.clone()),
        Some(d) if d.is_json() => (
            format!("{} = CAST(? AS JSON)", quoted),
            JsonValue::String(value.to_string()),
        ),
        _ => (format!("{} = ?", quoted), value.clone()),
    }
}

/// `DELETE` for `strategy`. `descriptors` are the table's columns; they
/// decide how each value is compared.
pub fn delete(
    table: &str,
    strategy: &DeleteStrategy,
    descriptors: &[ColumnDescriptor],
) -> Result<BuiltQuery> {
    match strategy {
        DeleteStrategy::ByPrimaryKey { column, value } => {
            let (condition, param) = equals(column, value, descriptors);
            Ok(BuiltQuery {
                sql: format!("DELETE FROM {} WHERE {}", quote_ident(table), condition),
                params: vec![param],
            })
        }
        DeleteStrategy::ByFullRowMatch { columns, values } => {
            ensure_aligned(table, columns.len(), values.len())?;
            if columns.is_empty() {
                return Err(EngineError::invalid_input(
                    table,
                    "full-row match needs at least one column",
                ));
            }
            let mut conditions = Vec::with_capacity(columns.len());
            let mut params = Vec::with_capacity(values.len());
            for (column, value) in columns.iter().zip(values) {
                // `= NULL` never matches, so NULLs are matched literally.
                if value.is_null() {
                    conditions.push(format!("{} IS NULL", quote_ident(column)));
                } else {
                    let (condition, param) = equals(column, value, descriptors);
                    conditions.push(condition);
                    params.push(param);
                }
            }
            Ok(BuiltQuery {
                sql: format!(
                    "DELETE FROM {} WHERE {} LIMIT 1",
                    quote_ident(table),
                    conditions.join(" AND ")
                ),
                params,
            })
        }
    }
}

/// `CALL proc(?, ?, …)` with the arguments bound positionally.
pub fn call(write: &ProcedureWrite) -> BuiltQuery {
    BuiltQuery {
        sql: format!(
            "CALL {}({})",
            quote_ident(&write.name),
            placeholders(write.args.len())
        ),
        params: write.args.clone(),
    }
}
