//! Strongly-typed error variants for user-facing failure modes.

use std::path::PathBuf;
use thiserror::Error;

/// Errors with dedicated user-facing messages.
///
/// Anything not covered here propagates as a plain [`anyhow::Error`] with
/// context attached at each layer. These variants exist so the CLI (and tests)
/// can distinguish the fatal conditions the installer promises to report
/// cleanly: bad usage, a broken environment, or a broken template.
#[derive(Debug, Error)]
pub enum StackError {
    /// `--yes` was given without a resolvable stack name.
    ///
    /// Non-interactive runs cannot prompt for a stack, so this is rejected
    /// before any filesystem or network access.
    #[error("--yes requires --stack <name>; non-interactive runs cannot prompt for a stack")]
    StackRequired,

    /// The explicit `--source` directory does not exist.
    #[error("source directory not found: {}", path.display())]
    SourceNotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// The requested stack has no directory in the resolved source.
    #[error("stack '{name}' not found in source {}", source_dir.display())]
    StackNotFound {
        /// Requested stack name.
        name: String,
        /// Source directory that was searched.
        source_dir: PathBuf,
    },

    /// The source tree contains no installable stacks at all.
    #[error("no stacks found in source {}", source_dir.display())]
    NoStacks {
        /// Source directory that was searched.
        source_dir: PathBuf,
    },

    /// A `git` client is required for remote installation but was not found.
    #[error("git command not found; install git or use --source <path> with a local checkout")]
    GitNotFound,

    /// Shallow clone of the stacks repository failed.
    #[error("git clone of {url} failed: {reason}")]
    CloneFailed {
        /// Repository URL that was cloned.
        url: String,
        /// Trimmed stderr from the git subprocess.
        reason: String,
    },

    /// A settings template in the source tree is not valid JSON.
    ///
    /// Templates are build-time artifacts, so this is fatal rather than a
    /// runtime condition to recover from.
    #[error("malformed JSON in template {}: {reason}", path.display())]
    MalformedTemplate {
        /// Path of the broken template.
        path: PathBuf,
        /// Parser diagnostic.
        reason: String,
    },
}
