//! Gitignore management for installed skill files.
//!
//! Installed skills are generated artifacts, so version-controlled targets
//! get one ignore line for the skills directory. Existing `.gitignore`
//! content is preserved untouched; the line is only appended when no exact
//! line match is already present.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::utils::atomic_write;

/// The single ignore line maintained in the target's `.gitignore`.
pub const IGNORE_PATTERN: &str = ".claude/skills/";

/// What the gitignore step did (or would do).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitignoreOutcome {
    /// The ignore line was appended (creating the file if needed).
    Added,
    /// An exact line match was already present; nothing written.
    AlreadyPresent,
    /// Dry-run: the line would have been appended.
    WouldAdd,
    /// The target is not a git repository; skipped with a warning.
    NotARepo,
}

impl GitignoreOutcome {
    /// Short human-readable label for summaries.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Added => "updated",
            Self::AlreadyPresent => "already present",
            Self::WouldAdd => "would update",
            Self::NotARepo => "skipped (not a git repository)",
        }
    }
}

/// Ensure the target's `.gitignore` contains [`IGNORE_PATTERN`].
///
/// Skips with a warning when `<target>/.git` does not exist. Matching is by
/// exact line content (ignoring trailing whitespace), so a commented-out or
/// prefixed variant of the pattern does not count as present. The updated
/// file is written atomically.
pub fn ensure_gitignore_entry(target_dir: &Path, dry_run: bool) -> Result<GitignoreOutcome> {
    if !target_dir.join(".git").exists() {
        eprintln!(
            "{} {} is not a git repository, leaving .gitignore alone",
            "warning:".yellow().bold(),
            target_dir.display()
        );
        return Ok(GitignoreOutcome::NotARepo);
    }

    let gitignore_path = target_dir.join(".gitignore");
    let existing = if gitignore_path.exists() {
        fs::read_to_string(&gitignore_path)
            .with_context(|| format!("Failed to read {}", gitignore_path.display()))?
    } else {
        String::new()
    };

    if existing.lines().any(|line| line.trim_end() == IGNORE_PATTERN) {
        tracing::debug!("{} already ignores {}", gitignore_path.display(), IGNORE_PATTERN);
        return Ok(GitignoreOutcome::AlreadyPresent);
    }

    if dry_run {
        println!("  {} would add {IGNORE_PATTERN} to .gitignore", "→".cyan());
        return Ok(GitignoreOutcome::WouldAdd);
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(IGNORE_PATTERN);
    updated.push('\n');

    atomic_write(&gitignore_path, updated.as_bytes())
        .with_context(|| format!("Failed to update {}", gitignore_path.display()))?;
    println!("  {} added {IGNORE_PATTERN} to .gitignore", "+".green());
    Ok(GitignoreOutcome::Added)
}
