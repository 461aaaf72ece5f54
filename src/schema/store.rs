//! The canonical on-disk copy of the OpenAPI document.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Round-trip a JSON text through parse + stringify so that two documents
/// that differ only in whitespace or key order compare equal.
pub fn canonicalize(text: &str, context: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|source| Error::Json {
        context: context.to_string(),
        source,
    })?;
    serde_json::to_string(&value).map_err(|source| Error::Json {
        context: context.to_string(),
        source,
    })
}

/// Reads and writes the local `openapi.json` baseline.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    path: PathBuf,
}

impl SchemaStore {
    /// Create a store for the given path. The path must end in `.json`.
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            return Err(Error::InvalidOutput(path.display().to_string()));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored schema text. `None` means no prior schema exists,
    /// which is the expected first-run state, not an error.
    pub fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No local schema found");
            return Ok(None);
        }
        fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|err| Error::io(format!("Failed to read {}", self.path.display()), err))
    }

    /// Write the schema text verbatim, creating parent directories as needed.
    pub fn write(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                Error::io(format!("Failed to create {}", parent.display()), err)
            })?;
        }
        debug!(path = %self.path.display(), len = text.len(), "Writing local schema");
        fs::write(&self.path, text)
            .map_err(|err| Error::io(format!("Failed to write {}", self.path.display()), err))
    }
}
