pub mod mysql;
pub mod sql;
