// ABOUTME: Error types for external build, push and inspect commands.
// ABOUTME: A non-zero exit is fatal and never retried.

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{command} exited with {}", ExitCode(*code))]
    Exit { command: String, code: Option<i32> },

    #[error("no registry digest for {image}: {output}")]
    MissingDigest { image: String, output: String },
}

struct ExitCode(Option<i32>);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "status {code}"),
            None => f.write_str("signal"),
        }
    }
}
