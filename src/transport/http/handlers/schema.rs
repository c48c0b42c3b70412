//! Introspection endpoints.

use crate::transport::http::handlers::common::respond;
use crate::transport::http::types::{ApiResponse, AppState, TableList};
use axum::extract::{Path, State};
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/tables",
    responses(
        (status = 200, description = "Tables of the current schema", body = ApiResponse),
        (status = 503, description = "Connection unusable", body = ApiResponse)
    )
)]
pub async fn list_tables_handler(State(state): State<AppState>) -> impl IntoResponse {
    let result = state.engine.list_tables().await.map(|tables| TableList {
        schema: state.engine.schema_name().to_string(),
        tables,
    });
    respond(result)
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/schema",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "Columns, primary key and foreign keys", body = ApiResponse),
        (status = 404, description = "Unknown table", body = ApiResponse),
        (status = 500, description = "Catalog query failed", body = ApiResponse)
    )
)]
pub async fn table_schema_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> impl IntoResponse {
    respond(state.engine.describe_table(&table).await)
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/columns",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "Columns in table order", body = ApiResponse),
        (status = 404, description = "Unknown table", body = ApiResponse),
        (status = 500, description = "Catalog query failed", body = ApiResponse)
    )
)]
pub async fn columns_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> impl IntoResponse {
    respond(state.engine.describe_columns(&table).await)
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/foreign-keys",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "Foreign keys (possibly empty)", body = ApiResponse),
        (status = 404, description = "Unknown table", body = ApiResponse),
        (status = 500, description = "Catalog query failed", body = ApiResponse)
    )
)]
pub async fn foreign_keys_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> impl IntoResponse {
    respond(state.engine.get_foreign_keys(&table).await)
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/primary-key",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "Primary key, or null when the table has none", body = ApiResponse),
        (status = 404, description = "Unknown table", body = ApiResponse),
        (status = 500, description = "Catalog query failed", body = ApiResponse)
    )
)]
pub async fn primary_key_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> impl IntoResponse {
    respond(state.engine.get_primary_key(&table).await)
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/columns/{column}/options",
    params(
        ("table" = String, Path, description = "Table name"),
        ("column" = String, Path, description = "Column name")
    ),
    responses(
        (status = 200, description = "Values allowed by the column's foreign key (empty if none)", body = ApiResponse),
        (status = 404, description = "Unknown table", body = ApiResponse),
        (status = 500, description = "Catalog query failed", body = ApiResponse)
    )
)]
pub async fn foreign_key_options_handler(
    State(state): State<AppState>,
    Path((table, column)): Path<(String, String)>,
) -> impl IntoResponse {
    respond(state.engine.get_foreign_key_options(&table, &column).await)
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/input-domains",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "Writable columns with their foreign-key options", body = ApiResponse),
        (status = 404, description = "Unknown table", body = ApiResponse),
        (status = 500, description = "Catalog query failed", body = ApiResponse)
    )
)]
pub async fn input_domains_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> impl IntoResponse {
    respond(state.engine.input_domains(&table).await)
}

#[utoipa::path(
    get,
    path = "/api/tables/{table}/related",
    params(("table" = String, Path, description = "Table name")),
    responses(
        (status = 200, description = "Rows of every referenced table", body = ApiResponse),
        (status = 404, description = "Unknown table", body = ApiResponse),
        (status = 500, description = "Query failed", body = ApiResponse)
    )
)]
pub async fn related_records_handler(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> impl IntoResponse {
    respond(state.engine.related_records(&table).await)
}
