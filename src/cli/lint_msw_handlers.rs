//! The `lint-msw-handlers` command: report generated service methods that
//! are used in source but have no registered MSW handler.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::debug;

use crate::cli::run_cli_async;
use crate::common::run_with_spinner_async;
use crate::error::{Error, Result};
use crate::lint::{
    MswSetupProbe, collect_existing_handlers, display_results, find_services_usages,
    missing_handlers,
};

#[derive(Args, Debug, Clone)]
pub struct LintMswHandlersArgs {
    #[arg(
        long = "gen",
        id = "gen",
        value_name = "FOLDER",
        help = "The folder holding the generated API client (services and models)"
    )]
    pub gen_dir: PathBuf,
    #[arg(
        long = "msw-setup-file",
        value_name = "FILE",
        help = "The module that assembles the MSW setup (server or worker)"
    )]
    pub msw_setup_file: PathBuf,
    #[arg(
        long = "msw-setup-const",
        value_name = "NAME",
        help = "The exported constant in the setup file exposing listHandlers()"
    )]
    pub msw_setup_const: String,
    #[arg(
        long = "src",
        value_name = "FOLDER",
        default_value = ".",
        help = "The source folder to scan for service usages"
    )]
    pub src: PathBuf,
}

pub async fn run(args: LintMswHandlersArgs) -> i32 {
    run_cli_async(|| run_inner(&args)).await
}

async fn run_inner(args: &LintMswHandlersArgs) -> Result<i32> {
    println!("{}", style("\n🔎 lint-msw-handlers\n").magenta());

    if !args.gen_dir.is_dir() {
        return Err(Error::NotFound(format!(
            "Generated API folder does not exist or is not a directory: {}",
            args.gen_dir.display()
        )));
    }
    if !args.msw_setup_file.is_file() {
        return Err(Error::NotFound(format!(
            "MSW setup file does not exist or is not a file: {}",
            args.msw_setup_file.display()
        )));
    }

    let usages = run_with_spinner_async("Scanning source for service usages", || async {
        find_services_usages(&args.gen_dir, &args.src)
    })
    .await?;
    debug!(services = usages.len(), "Indexed service usages");

    let probe = MswSetupProbe::new(args.msw_setup_file.clone(), args.msw_setup_const.clone());
    let existing = run_with_spinner_async("Listing registered MSW handlers", || async {
        collect_existing_handlers(&probe)
    })
    .await?;
    debug!(handlers = existing.len(), "Collected registered handlers");

    // Suggested handler files live next to the setup module.
    let suggest_base = args
        .msw_setup_file
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let missing = missing_handlers(&usages, &existing, &suggest_base);

    println!();
    display_results(&missing);
    println!();

    Ok(i32::from(!missing.is_empty()))
}
