//! Compiled JSON Schema values for OpenRPC method contracts.
//!
//! A [`Schema`] pairs the JSON Schema document that is published in
//! discovery with the compiled validator that enforces it. Schemas come
//! from raw JSON (`Schema::from_value`) or from Rust types through
//! `schemars` (`Schema::of::<T>()`).

pub mod config;
pub mod error;
pub mod schema;
pub mod validator;

pub use config::SchemaConfig;
pub use error::{Result, SchemaError, ValidationError, Violation};
pub use schema::Schema;
