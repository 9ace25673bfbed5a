//! Process-wide registry.
//!
//! Optional. Services that can pass an `Arc<Registry>` around should do so;
//! this exists for code paths that need to reach the registry without one.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::registry::Registry;

static INSTANCE: OnceLock<Arc<Registry>> = OnceLock::new();

/// Install `registry` as the process-wide instance. Works once.
pub fn install(registry: Registry) -> Result<Arc<Registry>> {
    let registry = Arc::new(registry);
    INSTANCE
        .set(Arc::clone(&registry))
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    debug!(title = %registry.info().title, methods = registry.len(), "installed registry");
    Ok(registry)
}

/// The installed registry.
pub fn instance() -> Result<Arc<Registry>> {
    INSTANCE.get().cloned().ok_or(RegistryError::Uninitialized)
}
