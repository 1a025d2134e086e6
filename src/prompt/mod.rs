//! Interactive prompting abstraction.
//!
//! All user questions go through the [`Prompter`] trait so the conflict
//! resolver and settings reconciler are unit-testable without a terminal:
//! production code uses [`StdinPrompter`], tests substitute a
//! [`ScriptedPrompter`] with a fixed answer sequence.

use anyhow::{bail, Context, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// A synchronous question/answer provider.
pub trait Prompter {
    /// Display `prompt` and return the user's answer, trimmed.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question with "no" as the default answer.
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.ask(&format!("{prompt} [y/N] "))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Prompter backed by the process's stdin/stdout.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        io::stdout().flush().context("Failed to flush stdout")?;
        read_answer(&mut io::stdin().lock())
    }
}

/// Read one trimmed line from `reader`.
///
/// A zero-byte read means the input is closed; that is an error rather than an
/// empty answer, so prompt loops terminate instead of re-asking forever when
/// piped input runs out.
fn read_answer(reader: &mut impl BufRead) -> Result<String> {
    let mut input = String::new();
    let bytes = reader.read_line(&mut input).context("Failed to read from stdin")?;
    if bytes == 0 {
        bail!("stdin closed while waiting for an answer");
    }
    Ok(input.trim().to_string())
}

/// Prompter that replays a fixed sequence of answers.
///
/// Used in tests and available to embedders driving the installer
/// programmatically. Running out of scripted answers is an error rather than
/// a silent default, so tests fail loudly when a flow asks more questions
/// than expected.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
}

impl ScriptedPrompter {
    /// Build a prompter that returns `answers` in order.
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No scripted answer left for prompt: {prompt}"))
    }
}
