pub mod catalog;
pub mod codec;

pub use codec::{bind_all, bind_value, decode_row, MySqlQuery};
