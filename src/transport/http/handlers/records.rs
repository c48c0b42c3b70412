//! Generic CRUD endpoints over any table of the current schema.

use crate::transport::http::handlers::common::respond;
use crate::transport::http::types::{
    json_422, ApiResponse, AppState, DeleteRequest, DeleteRowRequest, InsertRequest, UpdateRequest,
    WriteResult,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/tables/{table}/records",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "All rows of the table", body = ApiResponse),
        (status = 404, description = "Unknown table", body = ApiResponse),
        (status = 500, description = "Read failed", body = ApiResponse)
    )
)]
pub async fn read_records_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> impl IntoResponse {
    respond(state.engine.read(&table).await)
}

#[utoipa::path(
    post,
    path = "/api/tables/{table}/records",
    params(("table" = String, Path, description = "Table name")),
    request_body = InsertRequest,
    responses(
        (status = 200, description = "Row inserted", body = ApiResponse),
        (status = 400, description = "Columns and values are not aligned", body = ApiResponse),
        (status = 404, description = "Unknown table or column", body = ApiResponse),
        (status = 409, description = "Write rejected by the database", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn insert_record_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
    request: Result<Json<InsertRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"columns\": [...], \"values\": [...]}").into_response(),
    };
    let result = state
        .engine
        .insert(&table, &request.columns, &request.values)
        .await
        .map(|rows_affected| WriteResult { rows_affected });
    respond(result)
}

#[utoipa::path(
    put,
    path = "/api/tables/{table}/records",
    params(("table" = String, Path, description = "Table name")),
    request_body = UpdateRequest,
    responses(
        (status = 200, description = "Row updated (rows_affected may be 0)", body = ApiResponse),
        (status = 400, description = "Columns and values are not aligned", body = ApiResponse),
        (status = 404, description = "Unknown table or column", body = ApiResponse),
        (status = 409, description = "Write rejected by the database", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn update_record_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
    request: Result<Json<UpdateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(
                e,
                "{\"columns\": [...], \"values\": [...], \"primary_key_column\": \"...\", \"primary_key_value\": ...}",
            )
            .into_response()
        }
    };
    let result = state
        .engine
        .update(
            &table,
            &request.columns,
            &request.values,
            &request.primary_key_column,
            &request.primary_key_value,
        )
        .await
        .map(|rows_affected| WriteResult { rows_affected });
    respond(result)
}

#[utoipa::path(
    post,
    path = "/api/tables/{table}/delete",
    params(("table" = String, Path, description = "Table name")),
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "Delete executed (rows_affected may be 0)", body = ApiResponse),
        (status = 404, description = "Unknown table or column", body = ApiResponse),
        (status = 409, description = "Write rejected by the database", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
    request: Result<Json<DeleteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(
                e,
                "{\"primary_key_column\": \"...\", \"primary_key_value\": ...}",
            )
            .into_response()
        }
    };
    let result = state
        .engine
        .delete(&table, &request.primary_key_column, &request.primary_key_value)
        .await
        .map(|rows_affected| WriteResult { rows_affected });
    respond(result)
}

#[utoipa::path(
    post,
    path = "/api/tables/{table}/delete-row",
    params(("table" = String, Path, description = "Table name")),
    request_body = DeleteRowRequest,
    responses(
        (status = 200, description = "At most one matching row deleted", body = ApiResponse),
        (status = 400, description = "Row does not match the table's columns", body = ApiResponse),
        (status = 404, description = "Unknown table", body = ApiResponse),
        (status = 409, description = "Write rejected by the database", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn delete_row_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
    request: Result<Json<DeleteRowRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"row\": [...], \"full_row_match\": false}").into_response(),
    };
    let result = if request.full_row_match {
        state.engine.delete_without_primary_key(&table, &request.row).await
    } else {
        state.engine.delete_row(&table, &request.row).await
    };
    respond(result.map(|rows_affected| WriteResult { rows_affected }))
}
