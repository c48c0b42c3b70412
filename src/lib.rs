pub mod app;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::DataEngine;
pub use domain::record::{normalize_input, RecordSet};
pub use domain::schema::{
    ColumnDescriptor, FieldDomain, ForeignKeyRelation, PrimaryKey, RelatedRecords, TableSchema,
};
pub use domain::write::{DeleteStrategy, ProcedureWrite};
pub use error::{EngineError, ErrorKind};
pub use infra::config::ConnectionParams;
