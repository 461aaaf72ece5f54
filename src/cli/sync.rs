//! The `sync` command: fetch, diff, decide, generate.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::debug;

use crate::cli::run_cli_async;
use crate::codegen::{self, CodeGenRequest};
use crate::common::run_with_spinner_async;
use crate::error::{Error, Result};
use crate::schema::{SchemaInput, SchemaStore, canonicalize};
use crate::sync::{ConfirmPrompt, InteractivePrompt, SyncDecision, SyncState, decide};

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH_OR_URL",
        help = "The input (local or remote) openapi schema (JSON)"
    )]
    pub input: String,
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FOLDER",
        help = "The output folder for the generated models, openapi schema and type definitions"
    )]
    pub output: PathBuf,
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation prompts and proceed with defaults"
    )]
    pub yes: bool,
    #[arg(
        short = 'f',
        long = "force-gen",
        help = "Force generation even if the input and output schemas are identical"
    )]
    pub force_gen: bool,
    #[arg(
        long = "include-msw-utils",
        help = "Include MSW mocking utilities based on the generated typescript types"
    )]
    pub include_msw_utils: bool,
    #[arg(
        long = "post-script",
        value_name = "SCRIPT",
        help = "A package.json script to run after the code generation"
    )]
    pub post_script: Option<String>,
    #[arg(
        long = "verify-openapi-sync",
        help = "Only check that the local schema matches the input; exits 1 on mismatch, never writes"
    )]
    pub verify: bool,
}

pub async fn run(args: SyncArgs) -> i32 {
    let mut prompt = InteractivePrompt;
    run_cli_async(|| run_inner(args, &mut prompt)).await
}

async fn run_inner(args: SyncArgs, prompt: &mut dyn ConfirmPrompt) -> Result<i32> {
    println!("{}", style("\n🚀 openapi-sync\n").magenta());

    let input = SchemaInput::parse(&args.input)?;
    let output_directory = prepare_output_directory(&args.output, !args.verify)?;
    let store = SchemaStore::new(output_directory.join("openapi.json"))?;

    let fetched = run_with_spinner_async("Reading input openapi schema", || input.fetch()).await?;
    let remote = canonicalize(&fetched, &args.input)?;
    let local = store
        .read()?
        .map(|text| canonicalize(&text, &store.path().display().to_string()))
        .transpose()?;
    let had_local = local.is_some();

    let state = SyncState {
        local,
        remote,
        force_gen: args.force_gen,
        auto_confirm: args.yes,
        verify_only: args.verify,
    };

    if state.changed() && had_local && !args.verify {
        println!(
            "{}",
            style("\n⚠️  Local and remote schemas does not match!\n").yellow()
        );
    }

    let decision = decide(&state, prompt)?;
    debug!(?decision, "Sync decision");

    match decision {
        SyncDecision::VerifiedInSync => {
            println!("{}", style("\n✅ Local schema is in sync.\n").green());
            Ok(0)
        }
        SyncDecision::VerifiedOutOfSync => {
            println!(
                "{}",
                style("\n✘ Local schema is out of sync with the input.\n").red()
            );
            Ok(1)
        }
        SyncDecision::UpToDate => {
            println!("{}", style("\nNo updates required.\n").blue());
            Ok(0)
        }
        SyncDecision::SkippedByUser => {
            println!("{}", style("\n⚠️  Sync remote schemas skipped.\n").yellow());
            Ok(0)
        }
        SyncDecision::Generate { adopt_remote } => {
            if adopt_remote {
                let step = if had_local {
                    "Replacing local schema with input schema"
                } else {
                    "Creating local schema"
                };
                run_with_spinner_async(step, || async { store.write(&state.remote) }).await?;
            } else if state.changed() && had_local {
                // Declined but forced: regenerate from the stale baseline.
                println!("{}", style("\n⚠️  Sync remote schemas skipped.\n").yellow());
            }

            let request = CodeGenRequest {
                schema_path: store.path().to_path_buf(),
                out_dir: output_directory,
                include_msw_utils: args.include_msw_utils,
                post_script: args.post_script.clone(),
            };
            codegen::run(&request).await?;

            println!(
                "{}",
                style("\n✅ openapi-sync process completed!\n").green()
            );
            Ok(0)
        }
    }
}

/// Validate the output directory path. A path with an extension is rejected
/// up front so a file path is never silently treated as a folder. Verify
/// mode passes `create = false`: it must not touch the filesystem at all.
fn prepare_output_directory(output: &Path, create: bool) -> Result<PathBuf> {
    if output.extension().is_some() {
        return Err(Error::InvalidOutputDir(output.display().to_string()));
    }
    if create && !output.exists() {
        fs::create_dir_all(output)
            .map_err(|err| Error::io(format!("Failed to create {}", output.display()), err))?;
    }
    Ok(output.to_path_buf())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_output_directory_rejects_file_paths() {
        let err = prepare_output_directory(Path::new("/tmp/openapi.json"), true).unwrap_err();
        assert!(matches!(err, Error::InvalidOutputDir(_)));
    }

    #[test]
    fn test_prepare_output_directory_creates_missing_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("api").join("gen");
        let created = prepare_output_directory(&target, true).unwrap();
        assert_eq!(created, target);
        assert!(target.is_dir());
    }

    struct NeverPrompt;

    impl ConfirmPrompt for NeverPrompt {
        fn confirm(&mut self, _message: &str) -> Result<bool> {
            Err(Error::Prompt("prompt must not be used".to_string()))
        }
    }

    #[tokio::test]
    async fn test_verify_against_matching_local_schema_exits_zero() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("remote.json");
        fs::write(&input_path, r#"{ "openapi": "3.1.0" }"#).unwrap();
        let out_dir = temp_dir.path().join("gen");
        fs::create_dir_all(&out_dir).unwrap();
        // Same value, different formatting: canonical comparison must match.
        fs::write(out_dir.join("openapi.json"), "{\"openapi\":\"3.1.0\"}").unwrap();

        let args = SyncArgs {
            input: input_path.display().to_string(),
            output: out_dir,
            yes: false,
            force_gen: false,
            include_msw_utils: false,
            post_script: None,
            verify: true,
        };
        let code = run_inner(args, &mut NeverPrompt).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_verify_against_changed_schema_exits_one_without_writing() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("remote.json");
        fs::write(&input_path, r#"{"openapi":"3.1.0","info":{}}"#).unwrap();
        let out_dir = temp_dir.path().join("gen");
        fs::create_dir_all(&out_dir).unwrap();
        let local_path = out_dir.join("openapi.json");
        fs::write(&local_path, r#"{"openapi":"3.0.0"}"#).unwrap();

        let args = SyncArgs {
            input: input_path.display().to_string(),
            output: out_dir,
            yes: false,
            force_gen: false,
            include_msw_utils: false,
            post_script: None,
            verify: true,
        };
        let code = run_inner(args, &mut NeverPrompt).await.unwrap();
        assert_eq!(code, 1);
        // Zero writes under verify.
        assert_eq!(
            fs::read_to_string(&local_path).unwrap(),
            r#"{"openapi":"3.0.0"}"#
        );
    }

    #[tokio::test]
    async fn test_verify_never_creates_the_output_directory() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("remote.json");
        fs::write(&input_path, r#"{"openapi":"3.1.0"}"#).unwrap();
        let out_dir = temp_dir.path().join("gen");

        let args = SyncArgs {
            input: input_path.display().to_string(),
            output: out_dir.clone(),
            yes: false,
            force_gen: false,
            include_msw_utils: false,
            post_script: None,
            verify: true,
        };
        let code = run_inner(args, &mut NeverPrompt).await.unwrap();
        // No baseline: out of sync, and nothing gets written.
        assert_eq!(code, 1);
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn test_unchanged_schema_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let input_path = temp_dir.path().join("remote.json");
        fs::write(&input_path, r#"{"openapi":"3.1.0"}"#).unwrap();
        let out_dir = temp_dir.path().join("gen");
        fs::create_dir_all(&out_dir).unwrap();
        let local_path = out_dir.join("openapi.json");
        fs::write(&local_path, r#"{ "openapi" : "3.1.0" }"#).unwrap();
        let before = fs::metadata(&local_path).unwrap().modified().unwrap();

        let args = SyncArgs {
            input: input_path.display().to_string(),
            output: out_dir,
            yes: false,
            force_gen: false,
            include_msw_utils: false,
            post_script: None,
            verify: false,
        };
        let code = run_inner(args, &mut NeverPrompt).await.unwrap();
        assert_eq!(code, 0);
        assert_eq!(
            fs::metadata(&local_path).unwrap().modified().unwrap(),
            before
        );
        // The file was not rewritten (canonicalization would strip spaces).
        assert_eq!(
            fs::read_to_string(&local_path).unwrap(),
            r#"{ "openapi" : "3.1.0" }"#
        );
    }
}
