//! Write requests that need more than a plain column/value list.

pub mod delete;
pub mod procedure;

pub use delete::DeleteStrategy;
pub use procedure::ProcedureWrite;
