use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{InvokeError, Result};

/// Engine resource configuration.
///
/// These are resource knobs for the embedded engine, not a sandbox: the
/// executed script still runs with whatever the engine exposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvokerConfig {
    /// Engine heap limit in bytes. `None` leaves the engine default.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "memoryLimit")]
    pub memory_limit: Option<usize>,
    /// Engine stack limit in bytes. `None` leaves the engine default.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxStackSize")]
    pub max_stack_size: Option<usize>,
}

impl InvokerConfig {
    pub fn with_memory_limit(mut self, bytes: usize) -> Self {
        self.memory_limit = Some(bytes);
        self
    }

    pub fn with_max_stack_size(mut self, bytes: usize) -> Self {
        self.max_stack_size = Some(bytes);
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| InvokeError::Config(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| InvokeError::Config(format!("parse {}: {}", path.display(), e)))
    }
}
