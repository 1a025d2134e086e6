//! Skill file installation and per-file conflict resolution.
//!
//! The installer walks the chosen stack's skills tree once to build an
//! immutable file manifest, then decides one action per file:
//!
//! - destination absent: copy, creating parent directories;
//! - destination present, non-interactive: skip (the non-destructive default);
//! - destination present, interactive: prompt `[s]kip / [o]verwrite / [d]iff`,
//!   where diff shows a unified diff and re-prompts - only skip or overwrite
//!   resolve the conflict;
//! - dry-run: classify only, never touch the filesystem.
//!
//! Copy failures propagate and abort the run; nothing is retried and nothing
//! half-written goes unreported.

use anyhow::{Context, Result};
use colored::Colorize;
use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::RunMode;
use crate::prompt::Prompter;
use crate::utils::ensure_dir;

pub mod gitignore;

pub use gitignore::{ensure_gitignore_entry, GitignoreOutcome, IGNORE_PATTERN};

/// Subdirectory of a stack (and of the target) that holds skill files.
pub const SKILLS_SUBDIR: &str = ".claude/skills";

/// One file to install, resolved to absolute source and destination paths.
///
/// Produced once per run by walking the stack's skills tree; immutable
/// thereafter.
#[derive(Debug, Clone)]
pub struct FileManifestEntry {
    /// Path relative to the skills root, used in all user-facing output.
    pub relative: PathBuf,
    /// Absolute path of the template file in the source tree.
    pub source: PathBuf,
    /// Absolute path the file installs to under the target project.
    pub destination: PathBuf,
}

/// Aggregated per-file outcomes, consumed only by the summary step.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Files copied (or, in dry-run mode, files that would be copied).
    pub installed: Vec<PathBuf>,
    /// Files left alone because the destination already existed.
    pub skipped: Vec<PathBuf>,
}

/// Walk the stack's skills tree and build the install manifest.
///
/// Every regular file below `<stack>/.claude/skills/` maps to the same
/// relative path below `<target>/.claude/skills/`. The manifest is sorted by
/// relative path so output and reports are deterministic. A stack without a
/// skills directory yields an empty manifest with a warning.
pub fn build_manifest(stack_dir: &Path, target_dir: &Path) -> Result<Vec<FileManifestEntry>> {
    let skills_root = stack_dir.join(SKILLS_SUBDIR);
    if !skills_root.is_dir() {
        eprintln!(
            "{} stack has no skills directory at {}",
            "warning:".yellow().bold(),
            skills_root.display()
        );
        return Ok(Vec::new());
    }

    let dest_root = target_dir.join(SKILLS_SUBDIR);
    let mut entries = Vec::new();
    for entry in WalkDir::new(&skills_root).follow_links(false) {
        let entry = entry
            .with_context(|| format!("Failed to walk skills tree {}", skills_root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&skills_root)
            .with_context(|| format!("Entry {} escapes the skills root", entry.path().display()))?
            .to_path_buf();
        entries.push(FileManifestEntry {
            destination: dest_root.join(&relative),
            source: entry.path().to_path_buf(),
            relative,
        });
    }
    entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    tracing::debug!("manifest has {} skill file(s)", entries.len());
    Ok(entries)
}

/// Install every manifest entry, resolving conflicts per file.
///
/// # Errors
///
/// A copy that cannot complete (permissions, disk) aborts the run; the report
/// built so far is discarded along with the error.
pub fn install_files(
    entries: &[FileManifestEntry],
    mode: RunMode,
    prompter: &mut dyn Prompter,
) -> Result<InstallReport> {
    let mut report = InstallReport::default();
    for entry in entries {
        if mode.dry_run {
            classify_dry_run(entry, &mut report);
            continue;
        }
        if !entry.destination.exists() {
            copy_entry(entry)?;
            println!("  {} {}", "+".green(), entry.relative.display());
            report.installed.push(entry.relative.clone());
            continue;
        }
        if !mode.interactive() {
            println!("  {} {} (exists, skipped)", "-".yellow(), entry.relative.display());
            report.skipped.push(entry.relative.clone());
            continue;
        }
        resolve_conflict(entry, prompter, &mut report)?;
    }
    Ok(report)
}

fn classify_dry_run(entry: &FileManifestEntry, report: &mut InstallReport) {
    if entry.destination.exists() {
        println!("  {} would skip {} (exists)", "-".yellow(), entry.relative.display());
        report.skipped.push(entry.relative.clone());
    } else {
        println!("  {} would copy {}", "+".green(), entry.relative.display());
        report.installed.push(entry.relative.clone());
    }
}

/// Prompt until the user picks skip or overwrite; diff re-prompts.
fn resolve_conflict(
    entry: &FileManifestEntry,
    prompter: &mut dyn Prompter,
    report: &mut InstallReport,
) -> Result<()> {
    loop {
        let answer = prompter.ask(&format!(
            "  {} already exists. [s]kip / [o]verwrite / [d]iff? ",
            entry.relative.display()
        ))?;
        match answer.to_lowercase().as_str() {
            "" | "s" | "skip" => {
                println!("  {} {} (skipped)", "-".yellow(), entry.relative.display());
                report.skipped.push(entry.relative.clone());
                return Ok(());
            }
            "o" | "overwrite" => {
                copy_entry(entry)?;
                println!("  {} {} (overwritten)", "+".green(), entry.relative.display());
                report.installed.push(entry.relative.clone());
                return Ok(());
            }
            "d" | "diff" => {
                print_diff(entry)?;
            }
            other => {
                println!("  Unrecognized answer '{other}'. Please enter s, o, or d.");
            }
        }
    }
}

fn copy_entry(entry: &FileManifestEntry) -> Result<()> {
    if let Some(parent) = entry.destination.parent() {
        ensure_dir(parent)?;
    }
    fs::copy(&entry.source, &entry.destination).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            entry.source.display(),
            entry.destination.display()
        )
    })?;
    Ok(())
}

/// Print a unified diff between the existing destination and the incoming
/// template, or say so when they are identical.
fn print_diff(entry: &FileManifestEntry) -> Result<()> {
    let existing = fs::read(&entry.destination)
        .with_context(|| format!("Failed to read {}", entry.destination.display()))?;
    let incoming = fs::read(&entry.source)
        .with_context(|| format!("Failed to read {}", entry.source.display()))?;
    if existing == incoming {
        println!("  Files are identical.");
        return Ok(());
    }

    let existing = String::from_utf8_lossy(&existing);
    let incoming = String::from_utf8_lossy(&incoming);
    let diff = TextDiff::from_lines(existing.as_ref(), incoming.as_ref());
    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header("existing", "incoming")
        .to_string();
    for line in unified.lines() {
        if line.starts_with('+') && !line.starts_with("+++") {
            println!("  {}", line.green());
        } else if line.starts_with('-') && !line.starts_with("---") {
            println!("  {}", line.red());
        } else {
            println!("  {line}");
        }
    }
    Ok(())
}
