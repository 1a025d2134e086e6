//! Stack discovery and selection.
//!
//! A stack is one named template bundle: a directory under the source root
//! holding installable skill files plus the `settings.json` and
//! `user-settings.json` templates. The set of recognized stack names is
//! fixed; the CLI validates `--stack` against it, and interactive runs choose
//! among the stacks actually present in the resolved source.

use anyhow::Result;
use std::path::Path;

use crate::core::{RunMode, StackError};
use crate::prompt::Prompter;

/// The fixed set of recognized stack names, in display order.
pub const KNOWN_STACKS: &[&str] = &["typescript", "python", "rust", "go"];

/// Filename of the project-level settings template inside a stack.
pub const PROJECT_SETTINGS_FILE: &str = "settings.json";

/// Filename of the user-level settings template inside a stack.
pub const USER_SETTINGS_FILE: &str = "user-settings.json";

/// List the known stacks that exist as directories under `source_dir`.
///
/// Returned in [`KNOWN_STACKS`] order so interactive menus are stable.
#[must_use]
pub fn discover(source_dir: &Path) -> Vec<String> {
    KNOWN_STACKS
        .iter()
        .filter(|name| source_dir.join(name).is_dir())
        .map(ToString::to_string)
        .collect()
}

/// Resolve the stack to install.
///
/// An explicit `requested` name must exist as a directory in the source, else
/// [`StackError::StackNotFound`]. Otherwise interactive runs get a numbered
/// single-choice prompt over the discovered stacks; a source with no stacks
/// at all is [`StackError::NoStacks`]. Non-interactive runs without an
/// explicit name are rejected by the CLI before this is reached.
pub fn select(
    source_dir: &Path,
    requested: Option<&str>,
    mode: RunMode,
    prompter: &mut dyn Prompter,
) -> Result<String> {
    if let Some(name) = requested {
        if !source_dir.join(name).is_dir() {
            return Err(StackError::StackNotFound {
                name: name.to_string(),
                source_dir: source_dir.to_path_buf(),
            }
            .into());
        }
        return Ok(name.to_string());
    }

    debug_assert!(mode.interactive(), "--yes without --stack is rejected before source resolution");

    let stacks = discover(source_dir);
    if stacks.is_empty() {
        return Err(StackError::NoStacks {
            source_dir: source_dir.to_path_buf(),
        }
        .into());
    }

    println!("Available stacks:");
    for (i, name) in stacks.iter().enumerate() {
        println!("  {}. {name}", i + 1);
    }
    loop {
        let answer = prompter.ask(&format!("Select a stack [1-{}]: ", stacks.len()))?;
        match answer.parse::<usize>() {
            Ok(n) if (1..=stacks.len()).contains(&n) => return Ok(stacks[n - 1].clone()),
            _ => println!("Please enter a number between 1 and {}.", stacks.len()),
        }
    }
}
