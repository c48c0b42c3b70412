use crate::domain::write::ProcedureWrite;
use crate::transport::http::handlers::common::respond;
use crate::transport::http::types::{json_422, ApiResponse, AppState, CallProcedureRequest, WriteResult};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/procedures",
    responses(
        (status = 200, description = "Stored procedures of the current schema", body = ApiResponse),
        (status = 500, description = "Catalog query failed", body = ApiResponse)
    )
)]
pub async fn list_procedures_handler(State(state): State<AppState>) -> impl IntoResponse {
    respond(state.engine.list_procedures().await)
}

#[utoipa::path(
    post,
    path = "/api/procedures/{name}/call",
    params(("name" = String, Path, description = "Procedure name")),
    request_body = CallProcedureRequest,
    responses(
        (status = 200, description = "Procedure executed", body = ApiResponse),
        (status = 404, description = "Unknown procedure", body = ApiResponse),
        (status = 409, description = "Procedure call failed", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn call_procedure_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Result<Json<CallProcedureRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "{\"args\": [...]}").into_response(),
    };
    let write = ProcedureWrite::new(name, request.args);
    let result = state
        .engine
        .invoke_procedure(&write)
        .await
        .map(|rows_affected| WriteResult { rows_affected });
    respond(result)
}
