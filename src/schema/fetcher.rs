//! Resolution of the `--input` identifier into raw schema text.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

/// Where the input schema comes from. Classified once from the identifier
/// string; the rest of the pipeline never branches on string prefixes again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaInput {
    Remote(String),
    Local(PathBuf),
}

impl SchemaInput {
    /// Classify an identifier as a remote URL or a local path.
    ///
    /// Identifiers that do not end in `.json` are rejected before any I/O.
    pub fn parse(identifier: &str) -> Result<Self> {
        if !identifier.ends_with(".json") {
            return Err(Error::InvalidInput(identifier.to_string()));
        }
        if identifier.starts_with("http") {
            Ok(Self::Remote(identifier.to_string()))
        } else {
            Ok(Self::Local(PathBuf::from(identifier)))
        }
    }

    /// Resolve the input into raw JSON text.
    ///
    /// Remote inputs are fetched with a single GET, no retries; a hung fetch
    /// hangs the command, which is acceptable for an interactive/CI tool.
    pub async fn fetch(&self) -> Result<String> {
        match self {
            Self::Remote(url) => fetch_remote(url).await,
            Self::Local(path) => read_local(path),
        }
    }
}

async fn fetch_remote(url: &str) -> Result<String> {
    debug!(url, "Fetching remote OpenAPI schema");
    let response = reqwest::get(url).await.map_err(|source| Error::Fetch {
        url: url.to_string(),
        source,
    })?;
    let response = response
        .error_for_status()
        .map_err(|source| Error::Fetch {
            url: url.to_string(),
            source,
        })?;
    response.text().await.map_err(|source| Error::Fetch {
        url: url.to_string(),
        source,
    })
}

fn read_local(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "Input file does not exist: {}",
            path.display()
        )));
    }
    fs::read_to_string(path)
        .map_err(|err| Error::io(format!("Failed to read {}", path.display()), err))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_rejects_non_json_identifier() {
        let err = SchemaInput::parse("https://example.com/openapi.yaml").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_parse_classifies_remote_and_local() {
        assert_eq!(
            SchemaInput::parse("https://example.com/openapi.json").unwrap(),
            SchemaInput::Remote("https://example.com/openapi.json".to_string())
        );
        assert_eq!(
            SchemaInput::parse("./schemas/openapi.json").unwrap(),
            SchemaInput::Local(PathBuf::from("./schemas/openapi.json"))
        );
    }

    #[tokio::test]
    async fn test_fetch_local_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = SchemaInput::Local(temp_dir.path().join("openapi.json"));
        let err = input.fetch().await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_local_reads_contents() {
        let temp_dir = TempDir::new().unwrap();
        let schema_path = temp_dir.path().join("openapi.json");
        fs::write(&schema_path, r#"{"openapi":"3.1.0"}"#).unwrap();
        let input = SchemaInput::Local(schema_path);
        assert_eq!(input.fetch().await.unwrap(), r#"{"openapi":"3.1.0"}"#);
    }

    #[tokio::test]
    async fn test_fetch_remote_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openapi.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"openapi":"3.0.0"}"#))
            .mount(&server)
            .await;

        let input = SchemaInput::parse(&format!("{}/openapi.json", server.uri())).unwrap();
        assert_eq!(input.fetch().await.unwrap(), r#"{"openapi":"3.0.0"}"#);
    }

    #[tokio::test]
    async fn test_fetch_remote_non_success_status_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/openapi.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let input = SchemaInput::parse(&format!("{}/openapi.json", server.uri())).unwrap();
        let err = input.fetch().await.unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
