/// Errors raised while building or accessing a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No registry was installed process-wide.
    #[error("no registry installed: call global::install first")]
    Uninitialized,

    /// A registry is already installed process-wide.
    #[error("a registry is already installed")]
    AlreadyInstalled,

    /// The method name is taken.
    #[error("method {0} is already registered")]
    DuplicateMethod(String),

    /// The method name uses the reserved `rpc.` prefix.
    #[error("method name {0} uses the reserved rpc. prefix")]
    ReservedMethodName(String),

    /// The method name cannot be used as a route segment.
    #[error("invalid method name {name:?}: {reason}")]
    InvalidMethodName { name: String, reason: &'static str },

    /// Two wire names map to the same exposed client name.
    #[error("method {name} would be exposed as {exposed}, already used by {existing}")]
    ExposedNameCollision {
        name: String,
        exposed: String,
        existing: String,
    },

    /// A required schema was not supplied.
    #[error("method {method} is missing its {field} schema")]
    MissingSchema { method: String, field: &'static str },

    /// Notifications never produce a result.
    #[error("notification {0} cannot declare a result schema")]
    UnexpectedResultSchema(String),

    /// The method is not registered.
    #[error("unknown method {0}")]
    UnknownMethod(String),

    /// A schema failed to compile.
    #[error("schema error: {0}")]
    Schema(#[from] openrpc_kit_schema::SchemaError),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
