//! OpenRPC contract layer over JSON-RPC 2.0.
//!
//! A service registers its methods with a params schema, a result schema
//! and the roles allowed to call them. From that single registry it gets
//! envelope contracts for its transport, a `rpc.discover` document and a
//! transport-agnostic router. A client pointed at the discovery URL
//! rebuilds a validated, callable surface from the document alone.
//!
//! # Crate Structure
//!
//! - [`schema`]: compiled JSON Schema values and validation errors
//! - [`protocol`]: JSON-RPC envelopes, envelope schemas, discovery document types
//! - [`registry`]: method registry, contracts, discovery responder, router
//! - [`client`]: client reconstruction from discovery (behind `client` feature)
//! - [`http`]: axum front end for a router (behind `server` feature)

/// Re-export schema types.
pub mod schema {
    pub use openrpc_kit_schema::*;
}

/// Re-export protocol types.
pub mod protocol {
    pub use openrpc_kit_protocol::*;
}

/// Re-export registry types.
pub mod registry {
    pub use openrpc_kit_registry::*;
}

/// Re-export client types (requires `client` feature).
#[cfg(feature = "client")]
pub mod client {
    pub use openrpc_kit_client::*;
}

#[cfg(feature = "server")]
pub mod http;
