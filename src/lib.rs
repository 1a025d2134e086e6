//! skillstack - Claude Code stack installer
//!
//! An idempotent installer that copies a templated bundle of skill files (a
//! "stack") into a target project and reconciles the project's and user's
//! `settings.json` files without destroying existing customizations.
//!
//! # Architecture Overview
//!
//! The installer is a strictly sequential pipeline driven by the CLI layer:
//!
//! 1. **Source resolution** ([`source`]) - decide between an explicit local
//!    directory, the bundled stacks directory next to the executable, or a
//!    shallow `git clone` into a temporary directory that is cleaned up on
//!    every exit path.
//! 2. **Stack selection** ([`stack`]) - an explicit `--stack` flag, or an
//!    interactive single-choice prompt over the stacks discovered in the
//!    source tree.
//! 3. **File installation** ([`installer`]) - walk the stack's skill files and
//!    install each one, resolving conflicts per file (skip / overwrite / diff)
//!    with non-destructive defaults.
//! 4. **Settings reconciliation** ([`settings`]) - merge the stack's settings
//!    templates into the project-level and user-level `settings.json` using a
//!    reverse merge where existing values always win ([`merge`]).
//! 5. **Gitignore update** ([`installer::gitignore`]) - ensure the installed
//!    skills directory is ignored in version-controlled targets.
//!
//! ## Key Guarantees
//!
//! - **Never destructive by default**: existing files are skipped unless the
//!   user explicitly chooses to overwrite; existing settings values always win
//!   over template values.
//! - **Atomic settings writes**: settings files are written to a temporary
//!   file and renamed into place, so no reader observes a partial write.
//! - **Faithful dry runs**: with `--dry-run` the target filesystem is
//!   byte-identical before and after the run.
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Install interactively from the default remote
//! skillstack --remote
//!
//! # Install a specific stack from a local checkout, non-interactively
//! skillstack --source ../stacks --stack typescript --yes
//!
//! # Preview what would change
//! skillstack --stack python --dry-run
//! ```

// Core functionality modules
pub mod cli;
pub mod core;
pub mod merge;
pub mod settings;

// Installation pipeline
pub mod installer;
pub mod source;
pub mod stack;

// Supporting modules
pub mod prompt;
pub mod utils;
