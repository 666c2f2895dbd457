// ABOUTME: Non-fatal warnings raised while building or deploying.
// ABOUTME: Collected during the run and shown once the command finishes.

use std::fmt;

/// Warnings accumulated by one command invocation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record `warning` and log it immediately.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = %warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings of one kind, in the order they were raised.
    pub fn of_kind(&self, kind: WarningKind) -> impl Iterator<Item = &Warning> {
        self.warnings.iter().filter(move |w| w.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The build id fell back to a random suffix because no revision was found.
    pub fn missing_revision(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MissingRevision,
            message: message.into(),
        }
    }

    /// The provider reported a function status outside the known set.
    pub fn unrecognized_status(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnrecognizedStatus,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    MissingRevision,
    UnrecognizedStatus,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WarningKind::MissingRevision => "missing-revision",
            WarningKind::UnrecognizedStatus => "unrecognized-status",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_by_default() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert_eq!(diag.of_kind(WarningKind::MissingRevision).count(), 0);
    }

    #[test]
    fn warnings_keep_order_and_kind() {
        let mut diag = Diagnostics::default();
        diag.warn(Warning::unrecognized_status("status Frozen"));
        diag.warn(Warning::missing_revision("not a git repository"));
        diag.warn(Warning::unrecognized_status("status Thawing"));

        let statuses: Vec<&str> = diag
            .of_kind(WarningKind::UnrecognizedStatus)
            .map(|w| w.message.as_str())
            .collect();
        assert_eq!(statuses, vec!["status Frozen", "status Thawing"]);
        assert_eq!(diag.warnings()[1].kind, WarningKind::MissingRevision);
    }

    #[test]
    fn display_names_the_kind() {
        let warning = Warning::missing_revision("using random build id suffix");
        assert_eq!(
            warning.to_string(),
            "using random build id suffix (missing-revision)"
        );
    }
}
