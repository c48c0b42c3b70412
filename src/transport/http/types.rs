use crate::app::DataEngine;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    /// The engine serializes requests on its own connection lock.
    pub engine: Arc<DataEngine>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error class (e.g. `write_failed`, `unknown_table`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn failure(error: impl Into<String>, error_kind: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            error_kind: Some(error_kind.to_string()),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct InsertRequest {
    /// Column names, aligned by position with `values`. Auto-generated
    /// columns are normally left out.
    pub columns: Vec<String>,
    #[schema(value_type = Vec<Object>)]
    pub values: Vec<JsonValue>,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct UpdateRequest {
    pub columns: Vec<String>,
    /// Empty strings and nulls are stored as NULL.
    #[schema(value_type = Vec<Object>)]
    pub values: Vec<JsonValue>,
    pub primary_key_column: String,
    #[schema(value_type = Object)]
    pub primary_key_value: JsonValue,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct DeleteRequest {
    pub primary_key_column: String,
    #[schema(value_type = Object)]
    pub primary_key_value: JsonValue,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct DeleteRowRequest {
    /// Row values aligned to the column order of the table's record set.
    #[schema(value_type = Vec<Object>)]
    pub row: Vec<JsonValue>,
    /// Always match on the full row (`LIMIT 1`) even if the table has a
    /// primary key. By default the key is used when there is one.
    #[serde(default)]
    pub full_row_match: bool,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct CallProcedureRequest {
    /// Positional arguments.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub args: Vec<JsonValue>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct WriteResult {
    pub rows_affected: u64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TableList {
    /// Schema the engine is connected to.
    pub schema: String,
    pub tables: Vec<String>,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::failure(
            format!("Invalid JSON body: {} (expected: {})", err, expected),
            "invalid_body",
        )),
    )
}
