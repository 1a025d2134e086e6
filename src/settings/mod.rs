//! Settings reconciliation for project-level and user-level `settings.json`.
//!
//! Reads the stack's settings template and the existing target file, merges
//! them with [`crate::merge::reverse_merge`] (existing values win), reports
//! which top-level keys were added or changed, and persists the result with
//! an atomic temp-file-then-rename write.
//!
//! # Target-File State Machine
//!
//! | Target state        | Behavior |
//! |---------------------|----------|
//! | missing             | treated as an empty base |
//! | present but empty   | warn, treated as an empty base |
//! | malformed JSON      | warn; non-interactive runs skip, interactive runs may opt into an empty base |
//! | valid JSON          | merged as-is |
//!
//! A malformed *template* on the source side is fatal: templates are
//! build-time artifacts, not user data, so a broken one is a packaging bug.
//!
//! Target files may contain irreplaceable user configuration, which is why a
//! malformed target is never fatal and never overwritten without an explicit
//! yes.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::core::{RunMode, StackError};
use crate::merge::reverse_merge;
use crate::prompt::Prompter;
use crate::utils::write_json_atomic;

/// Outcome of one settings reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// Nothing was done: template missing, or an unreadable target was left alone.
    Skipped,
    /// The merged tree equals the existing target; no write happened.
    Unchanged,
    /// Changes were computed and reported but not written.
    DryRun,
    /// The merged tree was written to the target file.
    Updated,
}

impl MergeStatus {
    /// Short human-readable label for summaries.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Unchanged => "unchanged",
            Self::DryRun => "dry-run",
            Self::Updated => "updated",
        }
    }
}

/// Result of reconciling one settings file.
///
/// Computed once per settings file per run; only the merged tree itself is
/// ever persisted.
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// What happened to the target file.
    pub status: MergeStatus,
    /// The merged tree (empty object when the merge was skipped).
    pub merged: Value,
    /// Top-level keys present in the merge but absent from the target.
    pub added: Vec<String>,
    /// Top-level keys present in both whose values differ after the merge.
    pub changed: Vec<String>,
    /// Top-level keys whose values survived the merge untouched.
    pub unchanged: Vec<String>,
}

impl MergeResult {
    fn skipped() -> Self {
        Self {
            status: MergeStatus::Skipped,
            merged: Value::Object(Map::new()),
            added: Vec::new(),
            changed: Vec::new(),
            unchanged: Vec::new(),
        }
    }
}

/// Reconcile one settings file from a template.
///
/// `label` names the file in user-facing output (for example "project
/// settings"). Never writes in dry-run mode and never discards unreadable
/// target content without an explicit confirmation.
///
/// # Errors
///
/// Fatal on a malformed source template ([`StackError::MalformedTemplate`])
/// and on filesystem failures while reading the template or persisting the
/// merged tree.
pub fn reconcile(
    source_path: &Path,
    target_path: &Path,
    label: &str,
    mode: RunMode,
    prompter: &mut dyn Prompter,
) -> Result<MergeResult> {
    if !source_path.exists() {
        tracing::debug!("no {} template at {}, skipping", label, source_path.display());
        return Ok(MergeResult::skipped());
    }

    let source_text = fs::read_to_string(source_path)
        .with_context(|| format!("Failed to read template {}", source_path.display()))?;
    let source: Value = serde_json::from_str(&source_text).map_err(|e| StackError::MalformedTemplate {
        path: source_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let target = match load_target(target_path, label, mode, prompter)? {
        Some(target) => target,
        None => {
            println!("  {} {} left untouched", "-".yellow(), label);
            return Ok(MergeResult::skipped());
        }
    };

    let merged = reverse_merge(&target, &source);
    if merged == target {
        println!("  {} {} already up to date", "✓".green(), label);
        return Ok(MergeResult {
            status: MergeStatus::Unchanged,
            unchanged: top_level_keys(&merged),
            merged,
            added: Vec::new(),
            changed: Vec::new(),
        });
    }

    let (added, changed, unchanged) = diff_top_level(&target, &merged);
    report_keys(label, &added, &changed, mode.dry_run);

    if mode.dry_run {
        return Ok(MergeResult {
            status: MergeStatus::DryRun,
            merged,
            added,
            changed,
            unchanged,
        });
    }

    write_json_atomic(target_path, &merged)
        .with_context(|| format!("Failed to update {}", target_path.display()))?;
    Ok(MergeResult {
        status: MergeStatus::Updated,
        merged,
        added,
        changed,
        unchanged,
    })
}

/// Load the target tree, or `None` when the target must be left alone.
///
/// Missing and empty files become an empty base. Malformed JSON is never
/// destroyed silently: non-interactive runs skip, interactive runs are asked
/// whether to start over from an empty base.
fn load_target(
    target_path: &Path,
    label: &str,
    mode: RunMode,
    prompter: &mut dyn Prompter,
) -> Result<Option<Value>> {
    if !target_path.exists() {
        tracing::debug!("{} does not exist yet, starting from empty base", target_path.display());
        return Ok(Some(Value::Object(Map::new())));
    }

    let content = fs::read_to_string(target_path)
        .with_context(|| format!("Failed to read {}", target_path.display()))?;
    if content.trim().is_empty() {
        eprintln!(
            "{} {} is empty, treating it as an empty settings file",
            "warning:".yellow().bold(),
            target_path.display()
        );
        return Ok(Some(Value::Object(Map::new())));
    }

    match serde_json::from_str(&content) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            eprintln!(
                "{} {} contains invalid JSON ({e}); it may hold configuration worth keeping",
                "warning:".yellow().bold(),
                target_path.display()
            );
            if !mode.interactive() {
                return Ok(None);
            }
            let overwrite = prompter
                .confirm(&format!("Overwrite {label} with a fresh settings file?"))?;
            if overwrite {
                Ok(Some(Value::Object(Map::new())))
            } else {
                Ok(None)
            }
        }
    }
}

/// Classify the merge's top-level keys against the original target.
fn diff_top_level(target: &Value, merged: &Value) -> (Vec<String>, Vec<String>, Vec<String>) {
    let empty = Map::new();
    let target_map = target.as_object().unwrap_or(&empty);
    let merged_map = merged.as_object().unwrap_or(&empty);

    let mut added = Vec::new();
    let mut changed = Vec::new();
    let mut unchanged = Vec::new();
    for (key, value) in merged_map {
        match target_map.get(key) {
            None => added.push(key.clone()),
            Some(previous) if previous != value => changed.push(key.clone()),
            Some(_) => unchanged.push(key.clone()),
        }
    }
    (added, changed, unchanged)
}

fn top_level_keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

fn report_keys(label: &str, added: &[String], changed: &[String], dry_run: bool) {
    let verb = if dry_run { "would update" } else { "updating" };
    println!("  {} {verb} {label}", "→".cyan());
    for key in added {
        println!("      {} {key}", "+".green());
    }
    for key in changed {
        println!("      {} {key}", "~".yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn no_prompts() -> ScriptedPrompter {
        ScriptedPrompter::default()
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let temp = TempDir::new().unwrap();
        let result = reconcile(
            &temp.path().join("absent.json"),
            &temp.path().join("settings.json"),
            "project settings",
            RunMode::default(),
            &mut no_prompts(),
        )
        .unwrap();
        assert_eq!(result.status, MergeStatus::Skipped);
        assert!(!temp.path().join("settings.json").exists());
    }

    #[test]
    fn test_malformed_source_is_fatal() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("settings.json");
        write(&source, "{broken");
        let err = reconcile(
            &source,
            &temp.path().join("target.json"),
            "project settings",
            RunMode::default(),
            &mut no_prompts(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("malformed JSON in template"));
    }

    #[test]
    fn test_missing_target_gets_template() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src/settings.json");
        let target = temp.path().join("proj/.claude/settings.json");
        write(&source, r#"{"env": {"X": "1"}}"#);

        let result = reconcile(
            &source,
            &target,
            "project settings",
            RunMode::default(),
            &mut no_prompts(),
        )
        .unwrap();
        assert_eq!(result.status, MergeStatus::Updated);
        assert_eq!(result.added, ["env"]);
        assert_eq!(crate::utils::read_json_file(&target).unwrap(), json!({"env": {"X": "1"}}));
    }

    #[test]
    fn test_existing_values_win() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src/settings.json");
        let target = temp.path().join("proj/settings.json");
        write(&source, r#"{"env": {"X": "template", "Y": "2"}}"#);
        write(&target, r#"{"env": {"X": "user"}, "extra": true}"#);

        let result = reconcile(
            &source,
            &target,
            "project settings",
            RunMode::default(),
            &mut no_prompts(),
        )
        .unwrap();
        assert_eq!(result.status, MergeStatus::Updated);
        assert_eq!(result.changed, ["env"]);
        assert_eq!(result.unchanged, ["extra"]);
        assert_eq!(
            crate::utils::read_json_file(&target).unwrap(),
            json!({"env": {"X": "user", "Y": "2"}, "extra": true})
        );
    }

    #[test]
    fn test_unchanged_target_not_rewritten() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src/settings.json");
        let target = temp.path().join("proj/settings.json");
        write(&source, r#"{"env": {"X": "1"}}"#);
        write(&target, r#"{"env": {"X": "1"}, "more": 2}"#);
        let before = fs::read_to_string(&target).unwrap();

        let result = reconcile(
            &source,
            &target,
            "project settings",
            RunMode::default(),
            &mut no_prompts(),
        )
        .unwrap();
        assert_eq!(result.status, MergeStatus::Unchanged);
        // The file keeps its original formatting since no write happened.
        assert_eq!(fs::read_to_string(&target).unwrap(), before);
    }

    #[test]
    fn test_dry_run_reports_without_writing() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src/settings.json");
        let target = temp.path().join("proj/settings.json");
        write(&source, r#"{"a": 1}"#);

        let mode = RunMode {
            dry_run: true,
            assume_yes: false,
        };
        let result = reconcile(&source, &target, "project settings", mode, &mut no_prompts()).unwrap();
        assert_eq!(result.status, MergeStatus::DryRun);
        assert_eq!(result.added, ["a"]);
        assert!(!target.exists());
    }

    #[test]
    fn test_malformed_target_non_interactive_skips() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src/settings.json");
        let target = temp.path().join("proj/settings.json");
        write(&source, r#"{"a": 1}"#);
        write(&target, "{definitely not json");
        let before = fs::read(&target).unwrap();

        let mode = RunMode {
            dry_run: false,
            assume_yes: true,
        };
        let result = reconcile(&source, &target, "project settings", mode, &mut no_prompts()).unwrap();
        assert_eq!(result.status, MergeStatus::Skipped);
        assert_eq!(fs::read(&target).unwrap(), before);
    }

    #[test]
    fn test_malformed_target_interactive_decline_skips() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src/settings.json");
        let target = temp.path().join("proj/settings.json");
        write(&source, r#"{"a": 1}"#);
        write(&target, "oops");
        let before = fs::read(&target).unwrap();

        let mut prompter = ScriptedPrompter::new(["n"]);
        let result =
            reconcile(&source, &target, "project settings", RunMode::default(), &mut prompter)
                .unwrap();
        assert_eq!(result.status, MergeStatus::Skipped);
        assert_eq!(fs::read(&target).unwrap(), before);
    }

    #[test]
    fn test_malformed_target_interactive_accept_starts_fresh() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src/settings.json");
        let target = temp.path().join("proj/settings.json");
        write(&source, r#"{"a": 1}"#);
        write(&target, "oops");

        let mut prompter = ScriptedPrompter::new(["y"]);
        let result =
            reconcile(&source, &target, "project settings", RunMode::default(), &mut prompter)
                .unwrap();
        assert_eq!(result.status, MergeStatus::Updated);
        assert_eq!(crate::utils::read_json_file(&target).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_empty_target_treated_as_empty_base() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("src/settings.json");
        let target = temp.path().join("proj/settings.json");
        write(&source, r#"{"a": 1}"#);
        write(&target, "  \n");

        let result = reconcile(
            &source,
            &target,
            "project settings",
            RunMode::default(),
            &mut no_prompts(),
        )
        .unwrap();
        assert_eq!(result.status, MergeStatus::Updated);
        assert_eq!(crate::utils::read_json_file(&target).unwrap(), json!({"a": 1}));
    }
}
