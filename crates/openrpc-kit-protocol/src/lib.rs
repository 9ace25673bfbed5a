//! JSON-RPC 2.0 envelopes and OpenRPC discovery document types.
//!
//! Everything here is shared by both sides of the wire: the registry
//! renders [`DiscoveryDocument`]s and answers with [`Response`]s, the client
//! parses the same document and builds the same envelope schemas to check
//! its calls before they leave the process.

pub mod document;
pub mod envelope;
pub mod id;
pub mod jsonrpc;
pub mod naming;
pub mod permissions;
pub mod route;

pub use document::{
    null_schema, DiscoveryDocument, ExternalDoc, Info, MethodDescriptor, ParamStructure, Server,
    Tag, DISCOVER_METHOD, OPENRPC_VERSION,
};
pub use envelope::{
    discovery_result_schema, notification_envelope, request_envelope, requires_id,
    response_envelope,
};
pub use id::{is_valid_id, mint_id, ID_PATTERN};
pub use jsonrpc::{
    ErrorObject, Notification, Request, Response, FORBIDDEN, INTERNAL_ERROR, INVALID_PARAMS,
    INVALID_REQUEST, JSONRPC_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};
pub use naming::snake_to_camel;
pub use permissions::{Permissions, Role};
pub use route::{HttpMethod, Route};
