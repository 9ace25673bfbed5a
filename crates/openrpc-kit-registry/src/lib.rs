//! OpenRPC method registry.
//!
//! The [`Registry`] is the single authority on which methods exist, what
//! their params/result contracts are, and who may call them. It renders the
//! discovery document served by `rpc.discover` and hands out a [`Contract`]
//! per method for the transport layer. [`Router`] is the transport-agnostic
//! glue a listener drives: it validates envelopes, answers discovery, runs
//! handlers and shapes every outcome into a JSON-RPC response.

pub mod config;
pub mod contract;
pub mod discovery;
pub mod error;
pub mod global;
pub mod method;
pub mod registry;
pub mod router;

pub use config::RegistryConfig;
pub use contract::{Contract, HttpMethod, Route};
pub use error::{RegistryError, Result};
pub use method::{MethodDefinition, MethodKind, MethodSpec};
pub use registry::Registry;
pub use router::{Authorizer, CallContext, Dispatch, Handler, HandlerResult, RoleAuthorizer, Router};
