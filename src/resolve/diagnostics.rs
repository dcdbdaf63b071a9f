//! Per-occurrence diagnostics.
//!
//! Every problem found while resolving a token becomes a [`Diagnostic`];
//! a pass records it and keeps going, so a single run reports every problem
//! in a file rather than just the first.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Source position of a token: 1-based line, 0-based column.
///
/// Line 0 is used for tokens that did not come from a file (ad-hoc checks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Diagnostic severity. Advisory findings are warnings; everything else
/// is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// What went wrong with one flag occurrence.
///
/// `spelling` fields carry the token as the user typed it (dashes included);
/// `name` fields carry the bare canonical flag name.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// No registry entry matches the name, any alias, or a negated form.
    #[error("unrecognized flag {spelling}")]
    UnknownFlag { spelling: String },

    /// Name resolves but is not declared for the current command.
    #[error("flag --{name} is not applicable to command '{command}'")]
    UnknownFlagForCommand { name: String, command: String },

    /// Value present but fails the type grammar.
    #[error("invalid value '{value}' for --{name}: {reason}")]
    MalformedValue {
        name: String,
        value: String,
        reason: String,
    },

    /// Value fails a one-of membership check.
    #[error("invalid value '{value}' for --{name}: expected one of [{}]", .legal.join(", "))]
    InvalidChoice {
        name: String,
        value: String,
        legal: &'static [&'static str],
    },

    /// A value-taking flag appeared without a value.
    #[error("flag --{name} requires a value")]
    MissingValue { name: String },

    /// A shorthand flag's expansion chain revisits itself. This indicates
    /// a defect in the registry table, not bad user input.
    #[error("expansion of --{name} revisits --{revisited} (registry defect)")]
    ExpansionCycle { name: String, revisited: String },

    /// Advisory: the flag is deprecated.
    #[error("flag --{name} is deprecated")]
    DeprecatedFlag { name: String },

    /// Advisory: the flag is experimental and may change or be removed.
    #[error("flag --{name} is experimental and may change or be removed")]
    ExperimentalFlag { name: String },
}

impl ErrorKind {
    /// Stable machine-readable code for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::UnknownFlag { .. } => "unknown-flag",
            ErrorKind::UnknownFlagForCommand { .. } => "unknown-flag-for-command",
            ErrorKind::MalformedValue { .. } => "malformed-value",
            ErrorKind::InvalidChoice { .. } => "invalid-choice",
            ErrorKind::MissingValue { .. } => "missing-value",
            ErrorKind::ExpansionCycle { .. } => "expansion-cycle",
            ErrorKind::DeprecatedFlag { .. } => "deprecated-flag",
            ErrorKind::ExperimentalFlag { .. } => "experimental-flag",
        }
    }

    /// Default severity for this kind.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorKind::DeprecatedFlag { .. } | ErrorKind::ExperimentalFlag { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

/// One reported finding: kind, severity, and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub severity: Severity,
    pub span: Span,
}

impl Diagnostic {
    /// Build with the kind's default severity.
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let severity = kind.severity();
        Self {
            kind,
            severity,
            span,
        }
    }

    /// Rendered message (from the kind's `Display`).
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_choice_message_lists_legal_set() {
        let kind = ErrorKind::InvalidChoice {
            name: "compilation_mode".into(),
            value: "release".into(),
            legal: &["fastbuild", "dbg", "opt"],
        };
        assert_eq!(
            kind.to_string(),
            "invalid value 'release' for --compilation_mode: expected one of [fastbuild, dbg, opt]"
        );
        assert_eq!(kind.code(), "invalid-choice");
        assert_eq!(kind.severity(), Severity::Error);
    }

    #[test]
    fn advisories_default_to_warning() {
        let diag = Diagnostic::new(
            ErrorKind::DeprecatedFlag {
                name: "expunge_async".into(),
            },
            Span::new(3, 0),
        );
        assert_eq!(diag.severity, Severity::Warning);
        assert!(diag.message().contains("deprecated"));
    }
}
