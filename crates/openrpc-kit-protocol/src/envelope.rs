//! Validation schemas for the three JSON-RPC envelope kinds.
//!
//! Each constructor embeds a caller-supplied params/result schema into the
//! fixed envelope shape and compiles the result. Definitions (`$defs`) of
//! the embedded schema are hoisted to the envelope root so that local
//! `#/$defs/...` references keep resolving.

use openrpc_kit_schema::{Result, Schema};
use serde_json::{json, Map, Value};

use crate::id::ID_PATTERN;
use crate::jsonrpc::JSONRPC_VERSION;

/// Envelope schema for a Request to `method`.
///
/// `method` is pinned to the literal name and `id` is required.
pub fn request_envelope(method: &str, params: &Schema) -> Result<Schema> {
    let mut defs = Map::new();
    let params = embed(params, &mut defs);

    let mut envelope = json!({
        "type": "object",
        "properties": {
            "jsonrpc": { "const": JSONRPC_VERSION },
            "method": { "const": method },
            "id": id_schema(),
            "params": params
        },
        "required": ["jsonrpc", "method", "id"]
    });
    attach_defs(&mut envelope, defs);
    Schema::from_value(envelope)
}

/// Envelope schema for a Notification.
///
/// Unlike requests, `method` is any string. A payload carrying `id` is
/// rejected: it would be a request.
pub fn notification_envelope(_method: &str, params: &Schema) -> Result<Schema> {
    let mut defs = Map::new();
    let params = embed(params, &mut defs);

    let mut envelope = json!({
        "type": "object",
        "properties": {
            "jsonrpc": { "const": JSONRPC_VERSION },
            "method": { "type": "string" },
            "params": params
        },
        "required": ["jsonrpc", "method"],
        "not": { "required": ["id"] }
    });
    attach_defs(&mut envelope, defs);
    Schema::from_value(envelope)
}

/// Envelope schema for a Response carrying `result`.
///
/// Exactly one of `result` and `error` must be present.
pub fn response_envelope(result: &Schema) -> Result<Schema> {
    let mut defs = Map::new();
    let result = embed(result, &mut defs);

    let mut envelope = json!({
        "type": "object",
        "properties": {
            "jsonrpc": { "const": JSONRPC_VERSION },
            "id": id_schema(),
            "result": result,
            "error": {
                "type": "object",
                "properties": {
                    "code": { "type": "integer" },
                    "message": { "type": "string" },
                    "data": {}
                },
                "required": ["code", "message"]
            }
        },
        "required": ["jsonrpc", "id"],
        "oneOf": [
            { "required": ["result"], "not": { "required": ["error"] } },
            { "required": ["error"], "not": { "required": ["result"] } }
        ]
    });
    attach_defs(&mut envelope, defs);
    Schema::from_value(envelope)
}

/// Result schema of `rpc.discover`: `{name, schema}`.
pub fn discovery_result_schema() -> Result<Schema> {
    Schema::from_value(json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "schema": {}
        },
        "required": ["name", "schema"]
    }))
}

/// True if an envelope schema requires an `id`, i.e. it describes a Request.
pub fn requires_id(envelope: &Schema) -> bool {
    envelope.requires("id")
}

fn id_schema() -> Value {
    json!({ "type": "string", "pattern": ID_PATTERN })
}

fn embed(schema: &Schema, defs: &mut Map<String, Value>) -> Value {
    let mut value = schema.to_json_schema();
    if let Value::Object(map) = &mut value {
        map.remove("$schema");
        if let Some(Value::Object(inner)) = map.remove("$defs") {
            defs.extend(inner);
        }
    }
    value
}

fn attach_defs(envelope: &mut Value, defs: Map<String, Value>) {
    if defs.is_empty() {
        return;
    }
    if let Value::Object(map) = envelope {
        map.insert("$defs".to_string(), Value::Object(defs));
    }
}
