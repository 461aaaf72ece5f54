//! Code generation orchestration.
//!
//! Drives the external OpenAPI→TypeScript generators against the
//! synchronized schema. Type definitions and models/services are produced by
//! two independent subprocesses joined fail-fast; the MSW utility wrapper is
//! a fixed template parameterized only by its destination.

mod msw_template;

use std::fs;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::common::{run_command_capture, run_with_spinner_async};
use crate::error::{Error, Result};

pub use msw_template::MSW_HTTP_TEMPLATE;

/// One full generation pass over an output directory.
#[derive(Debug, Clone)]
pub struct CodeGenRequest {
    /// Path of the synchronized `openapi.json`. Generation always reads from
    /// disk so a declined-but-forced sync regenerates from the stale
    /// baseline.
    pub schema_path: PathBuf,
    pub out_dir: PathBuf,
    pub include_msw_utils: bool,
    pub post_script: Option<String>,
}

/// Run the full generation step. A failure in either generator fails the
/// whole step immediately; the optional post script runs last and is also
/// fatal on failure.
pub async fn run(request: &CodeGenRequest) -> Result<()> {
    let typedefs = generate_schema_typedefs(&request.schema_path, &request.out_dir);
    let models = generate_models(&request.schema_path, &request.out_dir);
    tokio::try_join!(typedefs, models)?;

    if request.include_msw_utils {
        run_with_spinner_async("Generating openapi MSW utils", || async {
            write_msw_utils(&request.out_dir)
        })
        .await?;
    }

    if let Some(script) = request.post_script.as_deref() {
        run_with_spinner_async("Running post script", || run_post_script(script)).await?;
    }

    Ok(())
}

/// Generate `schema.d.ts` from the schema via `openapi-typescript`.
async fn generate_schema_typedefs(schema_path: &Path, out_dir: &Path) -> Result<()> {
    let typedefs_path = out_dir.join("schema.d.ts");
    run_with_spinner_async("Generating schema type definitions", || async {
        let mut cmd = Command::new("npx");
        cmd.arg("openapi-typescript")
            .arg(schema_path)
            .arg("-o")
            .arg(&typedefs_path);
        debug!(schema = %schema_path.display(), out = %typedefs_path.display(), "Running openapi-typescript");
        run_command_capture(&mut cmd, "Failed to generate schema type definitions")
            .await
            .map_err(Error::Codegen)?;
        Ok(())
    })
    .await
}

/// Generate models and services from the schema via
/// `openapi-typescript-codegen` with the fetch client style.
async fn generate_models(schema_path: &Path, out_dir: &Path) -> Result<()> {
    run_with_spinner_async("Generating models and services", || async {
        let mut cmd = Command::new("npx");
        cmd.arg("openapi-typescript-codegen")
            .arg("--input")
            .arg(schema_path)
            .arg("--output")
            .arg(out_dir)
            .arg("--client")
            .arg("fetch");
        debug!(schema = %schema_path.display(), out = %out_dir.display(), "Running openapi-typescript-codegen");
        run_command_capture(&mut cmd, "Failed to generate models and services")
            .await
            .map_err(Error::Codegen)?;
        Ok(())
    })
    .await
}

/// Write the typed MSW wrapper template verbatim into the output directory.
pub fn write_msw_utils(out_dir: &Path) -> Result<()> {
    let destination = out_dir.join("openapi-msw-http.ts");
    fs::write(&destination, MSW_HTTP_TEMPLATE)
        .map_err(|err| Error::io(format!("Failed to write {}", destination.display()), err))
}

/// Run a package.json script by name. `node --run` is tried first; when the
/// host node predates it (or node itself is missing) the script runs through
/// `npm run` instead. The fallback only fires when node could not attempt
/// the script, never after the script itself ran and failed.
async fn run_post_script(script: &str) -> Result<()> {
    let mut cmd = Command::new("node");
    cmd.arg("--run").arg(script);
    match run_command_capture(&mut cmd, "node --run failed").await {
        Ok(_) => Ok(()),
        Err(reason) if is_runner_unavailable(&reason) => {
            warn!(script, "node --run unavailable, falling back to npm run");
            let mut fallback = Command::new("npm");
            fallback.arg("run").arg(script);
            run_command_capture(&mut fallback, "npm run failed")
                .await
                .map(|_| ())
                .map_err(Error::PostScript)
        }
        Err(reason) => Err(Error::PostScript(reason)),
    }
}

fn is_runner_unavailable(reason: &str) -> bool {
    // Spawn failure (node not installed) or an old node rejecting the flag.
    reason.contains("No such file or directory")
        || reason.contains("program not found")
        || reason.contains("bad option: --run")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_msw_utils_copies_template_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        write_msw_utils(temp_dir.path()).unwrap();
        let written = fs::read_to_string(temp_dir.path().join("openapi-msw-http.ts")).unwrap();
        assert_eq!(written, MSW_HTTP_TEMPLATE);
        assert!(written.contains("export function http<"));
    }

    #[test]
    fn test_runner_unavailable_detection() {
        assert!(is_runner_unavailable(
            "node --run failed: No such file or directory (os error 2)"
        ));
        assert!(is_runner_unavailable(
            "node --run failed: exit code 9\n\nStderr:\nnode: bad option: --run"
        ));
        assert!(!is_runner_unavailable(
            "node --run failed: exit code 1\n\nStderr:\ntests failed"
        ));
    }
}
