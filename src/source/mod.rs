//! Source tree resolution: local directory, bundled stacks, or shallow clone.
//!
//! Resolution priority:
//!
//! 1. An explicit `--source` path, which must exist.
//! 2. The `stacks` directory shipped next to the executable, when it contains
//!    at least one known stack and `--remote` was not explicitly requested.
//! 3. A shallow `git clone` of the requested (or default) repository into a
//!    fresh temporary directory.
//!
//! The clone's temporary directory is owned by the returned
//! [`ResolvedSource`]; dropping it removes the directory, so cleanup runs on
//! every exit path including errors raised by later installation steps.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

use crate::core::StackError;
use crate::stack;

/// Repository cloned when `--remote` is given without a URL.
pub const DEFAULT_REMOTE_URL: &str = "https://github.com/skillstack/stacks.git";

/// A resolved stacks source directory plus the cleanup handle for clones.
///
/// For local and bundled sources the handle is a no-op; for remote sources it
/// owns the [`TempDir`] the repository was cloned into.
#[derive(Debug)]
pub struct ResolvedSource {
    dir: PathBuf,
    /// Dropping this removes the clone's directory tree.
    temp: Option<TempDir>,
}

impl ResolvedSource {
    fn local(dir: PathBuf) -> Self {
        Self { dir, temp: None }
    }

    fn cloned(dir: PathBuf, temp: TempDir) -> Self {
        Self {
            dir,
            temp: Some(temp),
        }
    }

    /// The directory containing the stack subdirectories.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True when this source lives in a temporary clone.
    #[must_use]
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }
}

/// Resolve the stacks source per the priority order in the module docs.
///
/// # Errors
///
/// - [`StackError::SourceNotFound`] when the explicit `--source` path does
///   not exist.
/// - [`StackError::GitNotFound`] when a clone is needed but no git client is
///   on `PATH`.
/// - [`StackError::CloneFailed`] when the clone subprocess exits non-zero;
///   the temporary directory is removed before the error propagates.
pub fn resolve(explicit_source: Option<&Path>, remote_url: Option<&str>) -> Result<ResolvedSource> {
    if let Some(path) = explicit_source {
        if !path.is_dir() {
            return Err(StackError::SourceNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        tracing::debug!("using explicit source {}", path.display());
        return Ok(ResolvedSource::local(path.to_path_buf()));
    }

    if remote_url.is_none() {
        if let Some(bundled) = bundled_stacks_dir() {
            if !stack::discover(&bundled).is_empty() {
                tracing::debug!("using bundled stacks at {}", bundled.display());
                return Ok(ResolvedSource::local(bundled));
            }
        }
    }

    let url = remote_url.unwrap_or(DEFAULT_REMOTE_URL);
    clone_remote(url)
}

/// The `stacks` directory shipped alongside the installed executable, if the
/// executable's location can be determined.
fn bundled_stacks_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join("stacks"))
}

/// Shallow-clone `url` into a fresh temporary directory.
fn clone_remote(url: &str) -> Result<ResolvedSource> {
    which::which("git").map_err(|_| StackError::GitNotFound)?;

    let temp = TempDir::new().context("Failed to create temporary directory for clone")?;
    let checkout = temp.path().join("stacks");

    println!("Cloning {url} ...");
    let output = Command::new("git")
        .args(["clone", "--depth", "1"])
        .arg(url)
        .arg(&checkout)
        .output()
        .context("Failed to run git clone")?;

    if !output.status.success() {
        let reason = String::from_utf8_lossy(&output.stderr).trim().to_string();
        // temp is dropped here, removing the partial clone.
        return Err(StackError::CloneFailed {
            url: url.to_string(),
            reason,
        }
        .into());
    }

    tracing::debug!("cloned {url} into {}", checkout.display());
    Ok(ResolvedSource::cloned(checkout, temp))
}
