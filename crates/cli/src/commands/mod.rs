//! Command implementations, one module per command group.

pub mod metadata;
pub mod models;
pub mod plans;
pub mod sequences;

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Read and deserialize a JSON file.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Write `value` as indented JSON.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let mut rendered = serde_json::to_string_pretty(value).context("failed to encode JSON")?;
    rendered.push('\n');
    std::fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))
}
