//! CLI command implementations.

pub mod lint_msw_handlers;
pub mod sync;

use crate::error::Error;

/// Run a command body, mapping the typed error to a red line on stderr and
/// exit code 1. Success-path codes (verify mismatch, missing handlers) come
/// back through the `Ok` value.
pub async fn run_cli_async<F, Fut>(f: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<i32, Error>>,
{
    match f().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", console::style(err).red());
            1
        }
    }
}
