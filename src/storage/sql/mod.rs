pub mod builder;

pub use builder::{quote_ident, BuiltQuery};
