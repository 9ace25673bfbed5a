use openrpc_kit_schema::SchemaConfig;

/// Controls how the registry compiles method schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    /// Applied to every params/result schema at registration.
    pub schema: SchemaConfig,
}

impl RegistryConfig {
    /// Config that closes object schemas against unknown properties.
    pub fn strict() -> Self {
        Self {
            schema: SchemaConfig::strict(),
        }
    }
}
