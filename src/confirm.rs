// ABOUTME: Interactive confirmation gate evaluated once before the first remote mutation.
// ABOUTME: Only y/yes (case-insensitive) proceeds; anything else, including EOF, declines.

use async_trait::async_trait;
use std::io::{self, BufRead, Write};

/// Asks the operator whether to proceed.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> io::Result<bool>;
}

/// `true` for `y` or `yes` in any case, ignoring surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prompts on stderr and reads a line from stdin. Waits indefinitely.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

#[async_trait]
impl Confirm for TerminalPrompt {
    async fn confirm(&self, prompt: &str) -> io::Result<bool> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            let mut stderr = io::stderr();
            write!(stderr, "{prompt} [y/N]: ")?;
            stderr.flush()?;

            let mut answer = String::new();
            let read = io::stdin().lock().read_line(&mut answer)?;
            Ok(read > 0 && is_affirmative(&answer))
        })
        .await
        .map_err(io::Error::other)?
    }
}

/// Accepts without asking, for `--yes`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

#[async_trait]
impl Confirm for AutoConfirm {
    async fn confirm(&self, _prompt: &str) -> io::Result<bool> {
        Ok(true)
    }
}
