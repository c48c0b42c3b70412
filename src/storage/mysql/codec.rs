//! Conversion between JSON values and MySQL parameters / result cells.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::mysql::{MySql, MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, ColumnIndex, Row, TypeInfo};

pub type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// Binds one JSON value with the closest MySQL parameter type.
pub fn bind_value<'q>(query: MySqlQuery<'q>, value: &JsonValue) -> MySqlQuery<'q> {
    match value {
        JsonValue::Null => query.bind::<Option<String>>(None),
        JsonValue::Bool(b) => query.bind(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(u) = n.as_u64() {
                query.bind(u)
            } else if let Some(f) = n.as_f64() {
                query.bind(f)
            } else {
                query.bind(n.to_string())
            }
        }
        JsonValue::String(s) => query.bind(s.clone()),
        // Objects and arrays go to JSON columns.
        other => query.bind(sqlx::types::Json(other.clone())),
    }
}

pub fn bind_all<'q>(mut query: MySqlQuery<'q>, values: &[JsonValue]) -> MySqlQuery<'q> {
    for value in values {
        query = bind_value(query, value);
    }
    query
}

fn opt<T: Into<JsonValue>>(v: Option<T>) -> JsonValue {
    v.map(Into::into).unwrap_or(JsonValue::Null)
}

/// Decodes every cell of `row`, in column order.
pub fn decode_row(row: &MySqlRow) -> Result<Vec<JsonValue>, sqlx::Error> {
    (0..row.columns().len())
        .map(|idx| decode_cell(row, idx))
        .collect()
}

/// Decodes one cell according to the type the server reported for it.
pub fn decode_cell(row: &MySqlRow, idx: usize) -> Result<JsonValue, sqlx::Error> {
    let type_name = row.column(idx).type_info().name().to_string();

    let value = match type_name.as_str() {
        "NULL" => JsonValue::Null,
        "BOOLEAN" => opt(row.try_get::<Option<bool>, _>(idx)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            opt(row.try_get::<Option<i64>, _>(idx)?)
        }
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => opt(row.try_get::<Option<u64>, _>(idx)?),
        "FLOAT" => opt(row.try_get::<Option<f32>, _>(idx)?.map(f64::from)),
        "DOUBLE" => opt(row.try_get::<Option<f64>, _>(idx)?),
        // Kept as text so no precision is lost on the way to JSON.
        "DECIMAL" => opt(row.try_get::<Option<Decimal>, _>(idx)?.map(|d| d.to_string())),
        "DATE" => opt(row.try_get::<Option<NaiveDate>, _>(idx)?.map(|d| d.to_string())),
        "DATETIME" => opt(
            row.try_get::<Option<NaiveDateTime>, _>(idx)?
                .map(|d| d.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
        ),
        "TIMESTAMP" => opt(
            row.try_get::<Option<DateTime<Utc>>, _>(idx)?
                .map(|d| d.to_rfc3339()),
        ),
        "TIME" => opt(row.try_get::<Option<NaiveTime>, _>(idx)?.map(|t| t.to_string())),
        "YEAR" => opt(row.try_get_unchecked::<Option<u16>, _>(idx)?),
        "BIT" => opt(row.try_get_unchecked::<Option<u64>, _>(idx)?),
        "JSON" => row
            .try_get::<Option<JsonValue>, _>(idx)?
            .unwrap_or(JsonValue::Null),
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "GEOMETRY" => {
            opt(row.try_get::<Option<Vec<u8>>, _>(idx)?.map(hex::encode))
        }
        _ => opt(get_text(row, idx)?),
    };
    Ok(value)
}

/// Reads a textual cell, accepting binary-collated strings as well.
///
/// Some `information_schema` columns come back with a binary character set
/// depending on the server version.
pub fn get_text<I>(row: &MySqlRow, idx: I) -> Result<Option<String>, sqlx::Error>
where
    I: ColumnIndex<MySqlRow> + Copy,
{
    match row.try_get::<Option<String>, _>(idx) {
        Ok(v) => Ok(v),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let bytes: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(bytes.map(|b| String::from_utf8_lossy(&b).into_owned()))
        }
        Err(e) => Err(e),
    }
}

/// Like [`get_text`] but NULL reads as an empty string.
pub fn get_text_or_empty<I>(row: &MySqlRow, idx: I) -> Result<String, sqlx::Error>
where
    I: ColumnIndex<MySqlRow> + Copy,
{
    Ok(get_text(row, idx)?.unwrap_or_default())
}
