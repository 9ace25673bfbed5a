//! OpenRPC client reconstruction.
//!
//! Point [`Client`] at a service's `rpc.discover` URL and it fetches the
//! discovery document, rebuilds a validated envelope contract per method
//! and exposes each method under its camelCase name:
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use openrpc_kit_client::{Client, ClientConfig, HttpTransport};
//! use serde_json::json;
//!
//! let transport = HttpTransport::new(&ClientConfig::default())?;
//! let client = Client::create("http://localhost:3000/rpc.discover", transport).await?;
//! let user = client.call("getUser", json!({"id": "42"})).await?;
//! # let _ = user;
//! # Ok(())
//! # }
//! ```
//!
//! Calls are checked against the published params schema before anything
//! is sent. The wire itself is behind the [`Transport`] trait;
//! [`HttpTransport`] (feature `http`, on by default) uses `reqwest`.

pub mod client;
pub mod config;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod method;
pub mod transport;

pub use client::{Client, Discovered};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{ClientError, Result, TransportError};
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use method::MethodHandle;
pub use transport::{Transport, TransportRequest};
