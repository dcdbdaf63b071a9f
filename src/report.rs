//! Diagnostic rendering for CLI output.

use std::path::Path;

use serde::Serialize;

use crate::resolve::{Diagnostic, Severity};

/// One diagnostic row in `--format json` output.
#[derive(Debug, Serialize)]
struct JsonDiagnostic {
    file: String,
    line: usize,
    column: usize,
    severity: Severity,
    code: &'static str,
    message: String,
}

/// `path:line:column: severity: message`, one line per diagnostic.
pub fn render_text(path: &Path, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diag in diagnostics {
        out.push_str(&format!(
            "{}:{}:{}: {}: {}\n",
            path.display(),
            diag.span.line,
            diag.span.column,
            diag.severity,
            diag.message()
        ));
    }
    out
}

/// JSON array of diagnostic rows.
pub fn render_json(path: &Path, diagnostics: &[Diagnostic]) -> serde_json::Value {
    let rows: Vec<JsonDiagnostic> = diagnostics
        .iter()
        .map(|diag| JsonDiagnostic {
            file: path.display().to_string(),
            line: diag.span.line,
            column: diag.span.column,
            severity: diag.severity,
            code: diag.kind.code(),
            message: diag.message(),
        })
        .collect();
    serde_json::json!(rows)
}

/// True if any diagnostic is error-severity (drives the exit code).
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{ErrorKind, Span};
    use std::path::PathBuf;

    fn sample() -> Vec<Diagnostic> {
        vec![
            Diagnostic::new(
                ErrorKind::UnknownFlag {
                    spelling: "--typo".into(),
                },
                Span::new(3, 6),
            ),
            Diagnostic::new(
                ErrorKind::DeprecatedFlag {
                    name: "batch".into(),
                },
                Span::new(1, 8),
            ),
        ]
    }

    #[test]
    fn text_format_has_position_and_severity() {
        let text = render_text(&PathBuf::from(".bazelrc"), &sample());
        assert!(text.contains(".bazelrc:3:6: error: unrecognized flag --typo"));
        assert!(text.contains(".bazelrc:1:8: warning: flag --batch is deprecated"));
    }

    #[test]
    fn json_format_carries_codes() {
        let value = render_json(&PathBuf::from(".bazelrc"), &sample());
        let rows = value.as_array().unwrap();
        assert_eq!(rows[0]["code"], "unknown-flag");
        assert_eq!(rows[0]["severity"], "error");
        assert_eq!(rows[1]["code"], "deprecated-flag");
    }

    #[test]
    fn error_detection() {
        assert!(has_errors(&sample()));
        assert!(!has_errors(&sample()[1..]));
    }
}
