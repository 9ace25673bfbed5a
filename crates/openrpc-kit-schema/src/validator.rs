use jsonschema::Validator;
use serde_json::Value;

use crate::error::{ValidationError, Violation};

const MAX_REPORTED_VIOLATIONS: usize = 4;

pub(crate) fn validate_value(value: &Value, validator: &Validator) -> Result<(), ValidationError> {
    let violations: Vec<Violation> = validator
        .iter_errors(value)
        .take(MAX_REPORTED_VIOLATIONS)
        .map(|err| Violation {
            path: err.instance_path().to_string(),
            message: err.to_string(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(violations))
    }
}
