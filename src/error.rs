//! Error taxonomy for the sync and lint pipelines.
//!
//! Every fatal condition is a variant here; commands catch the error at the
//! CLI boundary, print it and map it to exit code 1. Nothing below that
//! boundary terminates the process.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The input schema identifier does not point at a JSON document.
    #[error("Input file must be a JSON file: {0}")]
    InvalidInput(String),

    /// The local schema path does not point at a JSON document.
    #[error("Output file must be a JSON file: {0}")]
    InvalidOutput(String),

    /// The `--output` argument must be a directory path.
    #[error("Output must be a directory: {0}")]
    InvalidOutputDir(String),

    /// Remote fetch failed (transport error or non-success status).
    #[error("Failed to fetch remote OpenAPI file {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A required local file or directory is absent.
    #[error("{0}")]
    NotFound(String),

    #[error("Failed to parse JSON from {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A code generation subprocess failed.
    #[error("{0}")]
    Codegen(String),

    #[error("Post script failed: {0}")]
    PostScript(String),

    /// A source file could not be parsed during the usage scan.
    #[error("Error parsing {}: {reason}", file.display())]
    Parse { file: PathBuf, reason: String },

    #[error("MSW setup constant `{0}` not found in the setup file")]
    MissingSetupConstant(String),

    #[error("MSW setup constant `{0}` does not have a listHandlers() method")]
    InvalidSetupConstant(String),

    /// The MSW setup probe could not be executed or produced garbage.
    #[error("{0}")]
    Setup(String),

    #[error("Failed to read confirmation: {0}")]
    Prompt(String),
}

impl Error {
    /// Wrap an I/O error with a human-readable context line.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
