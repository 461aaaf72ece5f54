//! Schema synchronization control logic.

pub mod decision;

pub use decision::{ConfirmPrompt, InteractivePrompt, SyncDecision, SyncState, decide};
