//! Spinner and subprocess helpers shared across CLI commands.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::process::Command;

use crate::error::Result;

// Spinner utilities for CLI operations
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());
    spinner
}

pub fn format_elapsed_ms(start: Instant) -> String {
    let elapsed = start.elapsed();
    if elapsed.as_secs() == 0 {
        return format!("{}ms", elapsed.as_millis());
    }
    let seconds = elapsed.as_secs();
    let remaining_ms = elapsed.subsec_millis();
    format!("{seconds}s {remaining_ms}ms")
}

/// Run a step under a spinner, printing the step name and elapsed time on
/// success. Errors propagate unchanged so the boundary can style them.
pub async fn run_with_spinner_async<T, F, Fut>(description: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let sp = spinner(description);
    let start = Instant::now();
    let result = f().await;
    sp.finish_and_clear();
    if result.is_ok() {
        println!("✔ {} ({})", description, format_elapsed_ms(start));
    }
    result
}

/// Output captured from a finished command.
#[derive(Debug, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Run a command to completion and capture its output. Returns an error
/// string carrying stderr and stdout so failures are diagnosable without
/// rerunning the subprocess.
pub async fn run_command_capture(
    cmd: &mut Command,
    error_msg: &str,
) -> std::result::Result<CommandOutput, String> {
    let output = cmd
        .output()
        .await
        .map_err(|err| format!("{error_msg}: {err}"))?;

    let captured = CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !output.status.success() {
        let mut full_error = format!(
            "{error_msg}: exit code {}",
            output.status.code().unwrap_or(-1)
        );
        if !captured.stderr.is_empty() {
            full_error.push_str(&format!("\n\nStderr:\n{}", captured.stderr));
        }
        if !captured.stdout.is_empty() {
            full_error.push_str(&format!("\n\nStdout:\n{}", captured.stdout));
        }
        return Err(full_error);
    }

    Ok(captured)
}
