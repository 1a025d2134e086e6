//! Command-line interface and install orchestration.
//!
//! The orchestrator runs the pipeline in a fixed order: source resolution,
//! stack selection, skill file installation, project-level settings
//! reconciliation, user-level settings reconciliation, gitignore update, and
//! finally a summary rendered from the per-step results. Each step's result
//! is independent and handed explicitly to the summary; no step depends on
//! filesystem state left behind by a failed later step.

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::core::{RunMode, StackError};
use crate::installer::{self, GitignoreOutcome, InstallReport};
use crate::prompt::Prompter;
use crate::settings::{self, MergeResult};
use crate::source;
use crate::stack;

/// Name of the settings file maintained under both `.claude` directories.
const SETTINGS_FILE: &str = "settings.json";

/// Install a Claude Code skill stack into a project.
///
/// Copies the stack's skill files into `<target>/.claude/skills/` and merges
/// its settings templates into the project's and your user-level
/// `settings.json`, never overwriting existing values or files unless you
/// explicitly say so.
#[derive(Debug, Parser)]
#[command(name = "skillstack", version)]
pub struct Cli {
    /// Target project directory
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub target: PathBuf,

    /// Install from a local stacks directory instead of cloning
    #[arg(long, value_name = "PATH")]
    pub source: Option<PathBuf>,

    /// Clone stacks from a remote repository (bare flag uses the default URL)
    #[arg(
        long,
        value_name = "URL",
        num_args = 0..=1,
        default_missing_value = source::DEFAULT_REMOTE_URL
    )]
    pub remote: Option<String>,

    /// Stack to install
    #[arg(long, value_name = "NAME", value_parser = PossibleValuesParser::new(stack::KNOWN_STACKS.iter().copied()))]
    pub stack: Option<String>,

    /// Show what would change without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Non-interactive mode: never prompt, never overwrite existing files
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Immutable run configuration resolved once from the parsed command line.
#[derive(Debug)]
pub struct Options {
    /// Project directory receiving the stack.
    pub target_dir: PathBuf,
    /// Explicit local stacks directory, when given.
    pub source: Option<PathBuf>,
    /// Remote repository URL, when a clone was requested.
    pub remote: Option<String>,
    /// Explicit stack name, when given.
    pub stack: Option<String>,
    /// Dry-run / non-interactive flags.
    pub mode: RunMode,
    /// The current user's home directory, for user-level settings.
    pub home_dir: PathBuf,
}

impl Cli {
    /// Validate the parsed arguments into an immutable [`Options`].
    ///
    /// Rejects `--yes` without `--stack` before any filesystem or network
    /// access: a non-interactive run has no way to choose a stack later.
    pub fn into_options(self) -> Result<Options> {
        if self.yes && self.stack.is_none() {
            return Err(StackError::StackRequired.into());
        }
        let home_dir = dirs::home_dir().context("Failed to determine the home directory")?;
        Ok(Options {
            target_dir: self.target,
            source: self.source,
            remote: self.remote,
            stack: self.stack,
            mode: RunMode {
                dry_run: self.dry_run,
                assume_yes: self.yes,
            },
            home_dir,
        })
    }
}

/// Run the full installation pipeline.
///
/// The resolved source's cleanup handle lives on this function's stack, so a
/// temporary clone is removed on every exit path, including errors raised by
/// any later step.
pub fn execute(opts: &Options, prompter: &mut dyn Prompter) -> Result<()> {
    let source = source::resolve(opts.source.as_deref(), opts.remote.as_deref())?;
    let stack_name = stack::select(source.dir(), opts.stack.as_deref(), opts.mode, prompter)?;
    let stack_dir = source.dir().join(&stack_name);

    if opts.mode.dry_run {
        println!(
            "{} installing stack '{stack_name}' into {} (dry run)",
            "skillstack".bold(),
            opts.target_dir.display()
        );
    } else {
        println!(
            "{} installing stack '{stack_name}' into {}",
            "skillstack".bold(),
            opts.target_dir.display()
        );
    }

    println!("\nSkills:");
    let manifest = installer::build_manifest(&stack_dir, &opts.target_dir)?;
    let report = installer::install_files(&manifest, opts.mode, prompter)?;

    println!("\nSettings:");
    let project = settings::reconcile(
        &stack_dir.join(stack::PROJECT_SETTINGS_FILE),
        &opts.target_dir.join(".claude").join(SETTINGS_FILE),
        "project settings",
        opts.mode,
        prompter,
    )?;
    let user = settings::reconcile(
        &stack_dir.join(stack::USER_SETTINGS_FILE),
        &opts.home_dir.join(".claude").join(SETTINGS_FILE),
        "user settings",
        opts.mode,
        prompter,
    )?;

    println!("\nGitignore:");
    let gitignore = installer::ensure_gitignore_entry(&opts.target_dir, opts.mode.dry_run)?;

    print_summary(&stack_name, &report, &project, &user, gitignore, opts.mode);
    Ok(())
}

/// Render the final summary from the per-step results.
fn print_summary(
    stack_name: &str,
    report: &InstallReport,
    project: &MergeResult,
    user: &MergeResult,
    gitignore: GitignoreOutcome,
    mode: RunMode,
) {
    let installed_label = if mode.dry_run { "files to install" } else { "files installed" };
    let skipped_label = if mode.dry_run { "files to skip" } else { "files skipped" };

    println!("\n{}", "Summary".bold());
    println!("  stack:            {stack_name}");
    println!("  {installed_label:<17} {}", report.installed.len());
    println!("  {skipped_label:<17} {}", report.skipped.len());
    println!("  project settings: {}", project.status.label());
    println!("  user settings:    {}", user.status.label());
    println!("  .gitignore:       {}", gitignore.label());
    if mode.dry_run {
        println!("\n{}", "Dry run: no changes were made.".yellow());
    }
}
