//! Runtime configuration, loadable from JSON

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Names the runtime resolves in the module's export table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportNames {
    pub memory: String,
    pub create: String,
    pub ptr: String,
    pub len: String,
    pub reserve: String,
    pub destroy: String,
}

impl ExportNames {
    /// Export names generated for `<prefix>_create`, `<prefix>_get_<field>`,
    /// `<prefix>_get_<field>_len`, `<prefix>_set_<field>` and
    /// `<prefix>_destroy`.
    pub fn for_field(prefix: &str, field: &str) -> Self {
        ExportNames {
            memory: "memory".to_string(),
            create: format!("{}_create", prefix),
            ptr: format!("{}_get_{}", prefix, field),
            len: format!("{}_get_{}_len", prefix, field),
            reserve: format!("{}_set_{}", prefix, field),
            destroy: format!("{}_destroy", prefix),
        }
    }
}

impl Default for ExportNames {
    fn default() -> Self {
        Self::for_field("record", "cstring")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub exports: ExportNames,
    /// Upper bound on the module's linear memory.
    pub max_memory_bytes: usize,
    /// Fuel granted to the store; `None` runs unmetered.
    pub fuel: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            exports: ExportNames::default(),
            max_memory_bytes: 64 * 1024 * 1024,
            fuel: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse runtime config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read runtime config {}", path.display()))?;
        Self::from_json_str(&json)
    }
}
