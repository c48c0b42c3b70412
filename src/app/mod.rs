pub mod data_engine;
pub mod relations;

pub use data_engine::DataEngine;
