use crate::domain::record::RecordSet;
use crate::domain::schema::{
    ColumnDescriptor, FieldDomain, ForeignKeyRelation, PrimaryKey, RelatedRecords, TableSchema,
};
use crate::domain::write::{DeleteStrategy, ProcedureWrite};
use crate::transport::http::handlers::{health, procedures, records, schema};
use crate::transport::http::types::{
    ApiResponse, CallProcedureRequest, DeleteRequest, DeleteRowRequest, InsertRequest, TableList,
    UpdateRequest, WriteResult,
};
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        schema::list_tables_handler,
        schema::table_schema_handler,
        schema::columns_handler,
        schema::foreign_keys_handler,
        schema::primary_key_handler,
        schema::foreign_key_options_handler,
        schema::input_domains_handler,
        schema::related_records_handler,
        records::read_records_handler,
        records::insert_record_handler,
        records::update_record_handler,
        records::delete_record_handler,
        records::delete_row_handler,
        procedures::list_procedures_handler,
        procedures::call_procedure_handler
    ),
    components(schemas(
        ApiResponse,
        TableList,
        WriteResult,
        InsertRequest,
        UpdateRequest,
        DeleteRequest,
        DeleteRowRequest,
        CallProcedureRequest,
        TableSchema,
        ColumnDescriptor,
        ForeignKeyRelation,
        PrimaryKey,
        FieldDomain,
        RelatedRecords,
        RecordSet,
        DeleteStrategy,
        ProcedureWrite
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/tables", get(schema::list_tables_handler))
        .route("/api/tables/:table/schema", get(schema::table_schema_handler))
        .route("/api/tables/:table/columns", get(schema::columns_handler))
        .route("/api/tables/:table/foreign-keys", get(schema::foreign_keys_handler))
        .route("/api/tables/:table/primary-key", get(schema::primary_key_handler))
        .route(
            "/api/tables/:table/columns/:column/options",
            get(schema::foreign_key_options_handler),
        )
        .route("/api/tables/:table/input-domains", get(schema::input_domains_handler))
        .route("/api/tables/:table/related", get(schema::related_records_handler))
        .route(
            "/api/tables/:table/records",
            get(records::read_records_handler)
                .post(records::insert_record_handler)
                .put(records::update_record_handler),
        )
        .route("/api/tables/:table/delete", post(records::delete_record_handler))
        .route("/api/tables/:table/delete-row", post(records::delete_row_handler))
        .route("/api/procedures", get(procedures::list_procedures_handler))
        .route("/api/procedures/:name/call", post(procedures::call_procedure_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
