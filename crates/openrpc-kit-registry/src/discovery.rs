//! `rpc.discover` responder.

use openrpc_kit_protocol::{ErrorObject, Response};
use serde_json::{json, Value};
use tracing::warn;

use crate::registry::Registry;

/// Answer a discovery request envelope.
///
/// The envelope is checked against the discovery contract first; a
/// malformed request gets an error Response instead of the document.
pub fn respond(registry: &Registry, request: &Value) -> Response {
    let id = request_id(request);

    let contract = match registry.discover() {
        Ok(contract) => contract,
        Err(err) => {
            warn!(error = %err, "discovery contract unavailable");
            return Response::failure(id, ErrorObject::internal_error());
        }
    };
    if let Err(err) = contract.validate_input(request) {
        return Response::failure(id, ErrorObject::from_validation(&err));
    }

    match id {
        Some(id) => document_response(registry, id),
        None => Response::failure(None, ErrorObject::invalid_request()),
    }
}

/// `{name, schema}` Response for an already validated request id.
pub fn document_response(registry: &Registry, id: impl Into<String>) -> Response {
    let document = match serde_json::to_value(registry.schema()) {
        Ok(document) => document,
        Err(err) => {
            warn!(error = %err, "failed to serialize discovery document");
            return Response::failure(Some(id.into()), ErrorObject::internal_error());
        }
    };

    Response::success(
        id,
        json!({
            "name": registry.info().title,
            "schema": document,
        }),
    )
}

/// The request id of an envelope, if it carries a string one.
pub(crate) fn request_id(envelope: &Value) -> Option<String> {
    envelope
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use openrpc_kit_protocol::{mint_id, Info, Server, INVALID_REQUEST};
    use openrpc_kit_schema::Schema;

    use super::*;
    use crate::method::MethodSpec;

    fn registry() -> Registry {
        let mut registry = Registry::new(
            Server::new("http://localhost:3000"),
            Some(Info::new("Qualify Services RPC", "1.0.1")),
        );
        registry
            .request(
                "get_user",
                MethodSpec::new()
                    .params(Schema::any().unwrap())
                    .result(Schema::any().unwrap())
                    .permissions(["admin", "self"]),
            )
            .unwrap();
        registry
    }

    fn discover_request() -> Value {
        json!({"jsonrpc": "2.0", "method": "rpc.discover", "id": mint_id()})
    }

    #[test]
    fn responds_with_name_and_document() {
        let registry = registry();
        let request = discover_request();
        let response = respond(&registry, &request);

        assert_eq!(response.id.as_deref(), request["id"].as_str());
        let result = response.result.unwrap();
        assert_eq!(result["name"], "Qualify Services RPC");
        assert_eq!(result["schema"]["openrpc"], "1.3.2");
        assert_eq!(result["schema"]["methods"][0]["name"], "get_user");
    }

    #[test]
    fn response_matches_discovery_contract() {
        let registry = registry();
        let response = respond(&registry, &discover_request());
        let contract = registry.discover().unwrap();

        let value = serde_json::to_value(&response).unwrap();
        assert!(contract.validate_output(&value).is_ok());
    }

    #[test]
    fn repeated_discovery_is_identical() {
        let registry = registry();
        let first = respond(&registry, &discover_request()).result.unwrap();
        let second = respond(&registry, &discover_request()).result.unwrap();
        assert_eq!(first["schema"], second["schema"]);
    }

    #[test]
    fn malformed_request_is_rejected() {
        let registry = registry();
        let response = respond(
            &registry,
            &json!({"jsonrpc": "2.0", "method": "rpc.discover"}),
        );

        assert!(response.is_error());
        assert_eq!(response.id, None);
        assert_eq!(response.error.unwrap().code, INVALID_REQUEST);
    }
}
