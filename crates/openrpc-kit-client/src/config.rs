use std::time::Duration;

use openrpc_kit_schema::SchemaConfig;

/// Default time budget for one transport round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a reconstructed client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Per-call transport timeout, discovery included.
    pub timeout: Duration,
    /// Check responses against the published result contract.
    pub validate_output: bool,
    /// Reject params keys the published schema does not declare.
    pub strict_mode: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            validate_output: true,
            strict_mode: false,
        }
    }
}

impl ClientConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_validate_output(mut self, validate_output: bool) -> Self {
        self.validate_output = validate_output;
        self
    }

    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    pub(crate) fn schema(&self) -> SchemaConfig {
        SchemaConfig {
            strict_mode: self.strict_mode,
        }
    }
}
