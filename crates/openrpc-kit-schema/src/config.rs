/// Controls how schemas are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchemaConfig {
    /// When true, object schemas reject additional properties not in the schema.
    pub strict_mode: bool,
}

impl SchemaConfig {
    /// Config with strict mode enabled.
    pub fn strict() -> Self {
        Self { strict_mode: true }
    }
}
