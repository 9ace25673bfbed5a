use std::time::Duration;

use openrpc_kit_protocol::ErrorObject;
use openrpc_kit_schema::{SchemaError, ValidationError};

/// Errors raised while moving an envelope over the wire.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the response not read.
    #[error("http error: {0}")]
    Http(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not JSON.
    #[error("invalid response body: {0}")]
    InvalidBody(String),

    /// No answer within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The transport cannot carry this request.
    #[error("unsupported request: {0}")]
    Unsupported(String),
}

/// Errors that can occur in client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The outbound envelope failed its contract; nothing was sent.
    #[error("invalid call to {method}: {source}")]
    Validation {
        method: String,
        #[source]
        source: ValidationError,
    },

    /// The server's response failed the output contract.
    #[error("invalid response from {method}: {source}")]
    InvalidResponse {
        method: String,
        #[source]
        source: ValidationError,
    },

    /// No method is exposed under this name.
    #[error("unknown method {0}")]
    UnknownMethod(String),

    /// The transport failed.
    #[error("call to {method} failed: {source}")]
    RemoteCall {
        method: String,
        id: Option<String>,
        #[source]
        source: TransportError,
    },

    /// The response broke the JSON-RPC protocol.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server answered with a JSON-RPC error.
    #[error("{method} returned error {error}")]
    Rpc {
        method: String,
        id: Option<String>,
        error: ErrorObject,
    },

    /// The discovery document could not be fetched or understood.
    #[error("discovery failed: {0}")]
    Discovery(String),

    /// Two wire names map to the same exposed name.
    #[error("methods {first} and {second} are both exposed as {exposed}")]
    NameCollision {
        exposed: String,
        first: String,
        second: String,
    },

    /// A published schema failed to compile.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
