use std::fmt;
use std::sync::Arc;

use jsonschema::Validator;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError, ValidationError};
use crate::validator::validate_value;

/// A JSON Schema document together with its compiled validator.
///
/// Cloning is cheap; the compiled validator is shared.
#[derive(Clone)]
pub struct Schema {
    document: Value,
    validator: Arc<Validator>,
}

impl Schema {
    /// Compile a schema from a JSON value with default config.
    pub fn from_value(document: Value) -> Result<Self> {
        Self::from_value_with_config(document, &SchemaConfig::default())
    }

    /// Compile a schema from a JSON value with explicit config.
    pub fn from_value_with_config(mut document: Value, config: &SchemaConfig) -> Result<Self> {
        if config.strict_mode {
            apply_strict_mode(&mut document);
        }

        let validator = jsonschema::validator_for(&document).map_err(|err| {
            debug!(error = %err, strict = config.strict_mode, "schema failed to compile");
            SchemaError::CompileFailed(err.to_string())
        })?;

        Ok(Self {
            document,
            validator: Arc::new(validator),
        })
    }

    /// Compile a schema from a JSON string.
    pub fn parse(schema_json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(schema_json)?;
        Self::from_value(document)
    }

    /// Derive the schema of a Rust type.
    pub fn of<T: JsonSchema>() -> Result<Self> {
        Self::of_with_config::<T>(&SchemaConfig::default())
    }

    /// Derive the schema of a Rust type with explicit config.
    pub fn of_with_config<T: JsonSchema>(config: &SchemaConfig) -> Result<Self> {
        let document = serde_json::to_value(schemars::schema_for!(T))?;
        Self::from_value_with_config(document, config)
    }

    /// Schema that accepts every value.
    pub fn any() -> Result<Self> {
        Self::from_value(Value::Object(Map::new()))
    }

    /// Validate a value.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), ValidationError> {
        validate_value(value, &self.validator)
    }

    /// Validate a value and deserialize it into `T`.
    pub fn validate_as<T: DeserializeOwned>(&self, value: Value) -> Result<T> {
        self.validate(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Check validity without collecting violations.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validator.is_valid(value)
    }

    /// The schema document as compiled.
    pub fn as_json(&self) -> &Value {
        &self.document
    }

    /// The JSON Schema form published in discovery documents.
    pub fn to_json_schema(&self) -> Value {
        self.document.clone()
    }

    /// Names listed in the root `required` keyword.
    pub fn required(&self) -> Vec<&str> {
        self.document
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// True if the root `required` keyword lists `name`.
    pub fn requires(&self, name: &str) -> bool {
        self.required().contains(&name)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document
    }
}

fn apply_strict_mode(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if is_object_schema(map) && !map.contains_key("additionalProperties") {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }

            recurse_object_schema_children(map);
        }
        Value::Array(items) => {
            for item in items {
                apply_strict_mode(item);
            }
        }
        _ => {}
    }
}

fn recurse_object_schema_children(map: &mut Map<String, Value>) {
    for key in ["properties", "patternProperties", "$defs", "definitions"] {
        if let Some(Value::Object(obj)) = map.get_mut(key) {
            for value in obj.values_mut() {
                apply_strict_mode(value);
            }
        }
    }

    for key in ["items", "additionalProperties", "not", "if", "then", "else"] {
        if let Some(value) = map.get_mut(key) {
            apply_strict_mode(value);
        }
    }

    // Combinator branches are left alone: closing each branch would reject
    // the keys contributed by its siblings.
    if let Some(Value::Array(items)) = map.get_mut("prefixItems") {
        for item in items {
            apply_strict_mode(item);
        }
    }
}

fn is_object_schema(map: &Map<String, Value>) -> bool {
    match map.get("type") {
        Some(Value::String(kind)) => kind == "object",
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| matches!(item, Value::String(kind) if kind == "object")),
        _ => ["properties", "patternProperties", "required"]
            .iter()
            .any(|keyword| map.contains_key(*keyword)),
    }
}
