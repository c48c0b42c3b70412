use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// A write that goes through a stored procedure instead of a generated
/// INSERT, for entities whose insertion needs server-side logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProcedureWrite {
    pub name: String,
    /// Positional arguments, bound in order.
    #[schema(value_type = Vec<Object>)]
    pub args: Vec<JsonValue>,
}

impl ProcedureWrite {
    pub fn new(name: impl Into<String>, args: Vec<JsonValue>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}
