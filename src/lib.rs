use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod cli;
pub mod codegen;
mod common;
pub mod error;
pub mod lint;
pub mod schema;
pub mod sync;

pub use error::{Error, Result};

#[derive(Parser)]
#[command(
    name = "openapi-sync",
    version,
    about = "\x1b[33mopenapi-sync\x1b[0m keeps OpenAPI schemas, generated clients and MSW handlers in sync 🔄"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 🔄 Sync the local schema with an input schema and regenerate clients
    Sync(cli::sync::SyncArgs),
    /// 🔎 Report service usages with no registered MSW handler
    LintMswHandlers(cli::lint_msw_handlers::LintMswHandlersArgs),
}

pub fn run() -> i32 {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to create tokio runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(run_async(std::env::args()))
}

async fn run_async<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Sync(args)) => cli::sync::run(args).await,
            Some(Commands::LintMswHandlers(args)) => cli::lint_msw_handlers::run(args).await,
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let _ = e.print();
            // Usage errors (missing/unknown options) are fatal and exit 1;
            // --help and --version keep their zero exit code.
            if e.exit_code() == 0 { 0 } else { 1 }
        }
    }
}

fn init_tracing() {
    let crate_root = module_path!().to_string();

    // OPENAPI_SYNC_LOG controls log level: "trace", "debug", "info", "warn",
    // "error" or a full tracing filter spec like "openapi_sync=debug"
    let filter = match std::env::var("OPENAPI_SYNC_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("{crate_root}={level}")
        }
        Ok(spec) => spec,
        Err(_) => format!("{crate_root}=info"),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(&filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
