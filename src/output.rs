// ABOUTME: User-facing CLI feedback for build and deploy runs.
// ABOUTME: Normal mode talks to humans, quiet mode prints outcomes only, JSON mode emits lines.

use serde::Serialize;
use std::time::Instant;

/// How results and progress reach the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Progress lines, pretty results and timings
    Normal,
    /// Outcome lines only, for CI logs
    Quiet,
    /// One JSON object per line
    Json,
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes progress, results and the final outcome according to an [`OutputMode`].
///
/// Tracing logs go to stderr separately; this type only owns what a user or a
/// calling script is expected to read.
pub struct Output {
    mode: OutputMode,
    started: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            started: None,
        }
    }

    /// Start measuring the run; the outcome line reports the elapsed time.
    pub fn start_timer(&mut self) {
        self.started = Some(Instant::now());
    }

    fn elapsed_secs(&self) -> Option<f64> {
        self.started.map(|t| t.elapsed().as_secs_f64())
    }

    /// Narrate a step. Normal mode only.
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// A non-fatal problem. Never suppressed.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Json => self.emit(Stream::Stderr, "warning", message),
            _ => eprintln!("Warning: {message}"),
        }
    }

    /// A structured result such as the final function descriptor.
    ///
    /// Quiet mode drops it; the outcome line is enough for CI.
    pub fn result<T: Serialize>(&self, label: &str, value: &T) {
        match self.mode {
            OutputMode::Normal => match serde_json::to_string_pretty(value) {
                Ok(json) => println!("{label}:\n{json}"),
                Err(e) => tracing::warn!("Cannot render {label}: {e}"),
            },
            OutputMode::Quiet => {}
            OutputMode::Json => {
                let line = ResultLine {
                    event: "result",
                    label,
                    value,
                };
                match serde_json::to_string(&line) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::warn!("Cannot render {label}: {e}"),
                }
            }
        }
    }

    /// The run finished and did what was asked.
    pub fn success(&self, message: &str) {
        match (self.mode, self.elapsed_secs()) {
            (OutputMode::Json, _) => self.emit(Stream::Stdout, "success", message),
            (OutputMode::Normal, Some(secs)) => println!("{message} ({secs:.1}s)"),
            _ => println!("{message}"),
        }
    }

    /// The operator declined at the prompt. Not a failure.
    pub fn canceled(&self, message: &str) {
        match self.mode {
            OutputMode::Json => self.emit(Stream::Stdout, "canceled", message),
            _ => println!("{message}"),
        }
    }

    /// The run failed.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Json => self.emit(Stream::Stderr, "error", message),
            _ => eprintln!("Error: {message}"),
        }
    }

    fn emit(&self, stream: Stream, event: &str, message: &str) {
        let line = EventLine {
            event,
            message,
            duration_secs: self.elapsed_secs(),
        };
        let Ok(json) = serde_json::to_string(&line) else {
            return;
        };
        match stream {
            Stream::Stdout => println!("{json}"),
            Stream::Stderr => eprintln!("{json}"),
        }
    }
}

#[derive(Serialize)]
struct EventLine<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct ResultLine<'a, T: Serialize> {
    event: &'a str,
    label: &'a str,
    value: &'a T,
}
