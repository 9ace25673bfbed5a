use std::fmt;

use openrpc_kit_client::{ClientError, TransportError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = match err {
        TransportError::Timeout(_) => TIMEOUT,
        TransportError::Unsupported(_) => USAGE,
        TransportError::InvalidBody(_) => DATA_INVALID,
        TransportError::Http(_) | TransportError::Status { .. } => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::RemoteCall { source, .. } => transport_error(context, source),
        ClientError::UnknownMethod(_) => CliError::new(USAGE, format!("{context}: {err}")),
        ClientError::Validation { .. }
        | ClientError::InvalidResponse { .. }
        | ClientError::NameCollision { .. }
        | ClientError::Discovery(_)
        | ClientError::Schema(_)
        | ClientError::Json(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        ClientError::Rpc { .. } | ClientError::Protocol(_) => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}
