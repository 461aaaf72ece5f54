//! The sync decision engine.
//!
//! Given the local baseline, the freshly fetched schema and the CLI flags,
//! decides whether to verify, write, prompt, skip or generate. This is the
//! one place where flag combinations interact; the function is pure apart
//! from the injected confirmation prompt so every transition is testable
//! in-process.

use dialoguer::Confirm;

use crate::error::{Error, Result};

/// Inputs to the decision engine. `local` and `remote` carry canonicalized
/// schema text so comparison is order/whitespace-insensitive.
#[derive(Debug, Clone)]
pub struct SyncState {
    /// Canonicalized local baseline, `None` on first run.
    pub local: Option<String>,
    /// Canonicalized freshly fetched schema.
    pub remote: String,
    pub force_gen: bool,
    pub auto_confirm: bool,
    pub verify_only: bool,
}

impl SyncState {
    /// Whether the fetched schema differs from the local baseline.
    /// A missing baseline counts as changed.
    pub fn changed(&self) -> bool {
        self.local.as_deref() != Some(self.remote.as_str())
    }
}

/// Outcome of the decision engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    /// Verify mode: local baseline exists and matches. Exit 0, zero writes.
    VerifiedInSync,
    /// Verify mode: baseline missing or different. Exit 1, zero writes.
    VerifiedOutOfSync,
    /// Schemas match and generation was not forced. Nothing to do.
    UpToDate,
    /// The user declined to adopt the remote schema and generation was not
    /// forced. Terminates successfully without generating.
    SkippedByUser,
    /// Proceed to code generation. When `adopt_remote` is set the fetched
    /// schema becomes the new local baseline first; otherwise generation
    /// runs against whatever the store already holds (the stale baseline in
    /// the declined-but-forced case).
    Generate { adopt_remote: bool },
}

/// Yes/no confirmation seam. The CLI injects an interactive prompt; tests
/// inject a scripted one.
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> Result<bool>;
}

/// `dialoguer`-backed prompt used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractivePrompt;

impl ConfirmPrompt for InteractivePrompt {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|err| Error::Prompt(err.to_string()))
    }
}

/// Decide what the sync command should do next.
pub fn decide(state: &SyncState, prompt: &mut dyn ConfirmPrompt) -> Result<SyncDecision> {
    let changed = state.changed();

    if state.verify_only {
        return Ok(if changed {
            SyncDecision::VerifiedOutOfSync
        } else {
            SyncDecision::VerifiedInSync
        });
    }

    // First run: always create the baseline so later runs have something to
    // compare against, regardless of the other flags.
    if state.local.is_none() {
        return Ok(SyncDecision::Generate { adopt_remote: true });
    }

    if !changed {
        return Ok(if state.force_gen {
            SyncDecision::Generate { adopt_remote: false }
        } else {
            SyncDecision::UpToDate
        });
    }

    let adopt =
        state.auto_confirm || prompt.confirm("Do you want to use the remote schema? (y/n)?")?;
    if adopt {
        Ok(SyncDecision::Generate { adopt_remote: true })
    } else if state.force_gen {
        Ok(SyncDecision::Generate { adopt_remote: false })
    } else {
        Ok(SyncDecision::SkippedByUser)
    }
}
