pub use openrpc_kit_protocol::{HttpMethod, Route};
use openrpc_kit_schema::{Schema, ValidationError};
use serde_json::Value;

use crate::method::MethodKind;

/// Envelope contract for one method.
///
/// `input` validates the inbound envelope; `output` validates the Response
/// and is `None` for notifications, which are never answered.
#[derive(Debug, Clone)]
pub struct Contract {
    pub name: String,
    pub kind: MethodKind,
    pub route: Route,
    pub input: Schema,
    pub output: Option<Schema>,
}

impl Contract {
    pub fn validate_input(&self, envelope: &Value) -> Result<(), ValidationError> {
        self.input.validate(envelope)
    }

    /// Validate a response envelope. Always passes for notifications.
    pub fn validate_output(&self, envelope: &Value) -> Result<(), ValidationError> {
        match &self.output {
            Some(schema) => schema.validate(envelope),
            None => Ok(()),
        }
    }

    pub fn expects_response(&self) -> bool {
        self.output.is_some()
    }
}
