use crate::error::{EngineError, ErrorKind};
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::UnknownTable | ErrorKind::UnknownColumn | ErrorKind::UnknownProcedure => {
            StatusCode::NOT_FOUND
        }
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::ConnectionError => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::WriteFailed => StatusCode::CONFLICT,
        ErrorKind::SchemaQueryFailed | ErrorKind::ReadFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: EngineError) -> Response {
    let kind = err.kind();
    (
        status_for(kind),
        Json(ApiResponse::failure(err.to_string(), kind.as_str())),
    )
        .into_response()
}

pub fn ok_response<T: Serialize>(data: &T) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => (StatusCode::OK, Json(ApiResponse::ok(value))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::failure(
                format!("Failed to serialize response: {}", e),
                "serialization_failed",
            )),
        )
            .into_response(),
    }
}

/// Maps an engine result to the uniform JSON envelope.
pub fn respond<T: Serialize>(result: Result<T, EngineError>) -> Response {
    match result {
        Ok(data) => ok_response(&data),
        Err(e) => {
            tracing::warn!(kind = e.code(), error = %e, "request failed");
            error_response(e)
        }
    }
}
