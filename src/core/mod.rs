//! Core types shared across the installation pipeline.
//!
//! This module provides the strongly-typed error enum used for conditions the
//! CLI matches on ([`StackError`]) and the [`RunMode`] flags that every
//! filesystem-touching step consults before writing anything.
//!
//! Most fallible functions in this crate return [`anyhow::Result`] and attach
//! human-readable context as errors propagate; `StackError` variants are
//! reserved for the failure modes that have dedicated user-facing messages
//! (missing git, missing source, malformed templates, and so on).

pub mod error;

pub use error::StackError;

/// Execution-mode flags resolved once from the command line.
///
/// Handed by value to every step that might touch the filesystem or prompt
/// the user. `dry_run` guarantees no writes; `assume_yes`
/// suppresses all prompts and resolves every conflict with the safe choice
/// (skip, never overwrite).
#[derive(Debug, Clone, Copy, Default)]
pub struct RunMode {
    /// Report what would change without writing anything.
    pub dry_run: bool,
    /// Non-interactive mode: never prompt, never overwrite.
    pub assume_yes: bool,
}

impl RunMode {
    /// True when the run may ask the user questions.
    pub const fn interactive(self) -> bool {
        !self.assume_yes
    }
}
