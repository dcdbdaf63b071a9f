//! `.bazelrc` file parsing front end.
//!
//! Splits a file into per-command flag lines:
//!
//! ```text
//! command[:config] --flag --flag=value ...
//! import /path/to/other.bazelrc
//! try-import %workspace%/.bazelrc.local
//! ```
//!
//! Comments (`#`), blank lines, and trailing-backslash line continuations
//! are handled here; `import` is followed recursively (missing file is an
//! error), `try-import` is followed when the file exists. The engine never
//! sees any of this — it only receives token streams.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::resolve::{RawToken, Span};

/// Import chains deeper than this indicate a loop between rc files.
const MAX_IMPORT_DEPTH: usize = 16;

#[derive(Debug, Error)]
pub enum RcParseError {
    #[error("failed to read rc file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: bad quoting: {source}")]
    TokenizeError {
        path: PathBuf,
        line: usize,
        #[source]
        source: shell_words::ParseError,
    },

    #[error("{path}:{line}: '{directive}' requires a file argument")]
    MissingImportPath {
        path: PathBuf,
        line: usize,
        directive: String,
    },

    #[error("import chain too deep at '{path}' (possible import loop)")]
    ImportDepthExceeded { path: PathBuf },
}

/// One flag-carrying line of an rc file.
#[derive(Debug, Clone)]
pub struct RcLine {
    /// The command the line applies to (`build`, `startup`, `common`, ...).
    pub command: String,
    /// The `:config` qualifier, if any (`build:opt ...`).
    pub config: Option<String>,
    /// The flag tokens after the command word.
    pub tokens: Vec<RawToken>,
    /// 1-based line number in the originating file.
    pub line: usize,
    /// The file the line came from (differs from the root when imported).
    pub file: PathBuf,
}

/// A parsed rc file with all imports spliced in, in reading order.
#[derive(Debug)]
pub struct RcFile {
    pub path: PathBuf,
    pub lines: Vec<RcLine>,
}

impl RcFile {
    pub fn parse(path: &Path) -> Result<Self, RcParseError> {
        let mut lines = Vec::new();
        parse_into(path, 0, &mut lines)?;
        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    /// Distinct commands mentioned in the file, in first-seen order.
    pub fn commands(&self) -> Vec<&str> {
        let mut commands: Vec<&str> = Vec::new();
        for line in &self.lines {
            if !commands.contains(&line.command.as_str()) {
                commands.push(&line.command);
            }
        }
        commands
    }
}

fn parse_into(
    path: &Path,
    depth: usize,
    out: &mut Vec<RcLine>,
) -> Result<(), RcParseError> {
    if depth > MAX_IMPORT_DEPTH {
        return Err(RcParseError::ImportDepthExceeded {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| RcParseError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut pending = String::new();
    let mut pending_start = 0usize;
    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        if pending.is_empty() {
            pending_start = line_no;
        }
        if let Some(stripped) = raw_line.strip_suffix('\\') {
            pending.push_str(stripped);
            pending.push(' ');
            continue;
        }
        pending.push_str(raw_line);
        let logical = std::mem::take(&mut pending);
        parse_line(path, depth, &logical, pending_start, out)?;
    }
    if !pending.is_empty() {
        // Trailing continuation at EOF: treat as a complete line.
        parse_line(path, depth, &pending, pending_start, out)?;
    }
    Ok(())
}

fn parse_line(
    path: &Path,
    depth: usize,
    line: &str,
    line_no: usize,
    out: &mut Vec<RcLine>,
) -> Result<(), RcParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(());
    }

    let words = shell_words::split(trimmed).map_err(|e| RcParseError::TokenizeError {
        path: path.to_path_buf(),
        line: line_no,
        source: e,
    })?;
    let Some(head) = words.first() else {
        return Ok(());
    };

    if head == "import" || head == "try-import" {
        let Some(target) = words.get(1) else {
            return Err(RcParseError::MissingImportPath {
                path: path.to_path_buf(),
                line: line_no,
                directive: head.clone(),
            });
        };
        let target = resolve_import_path(path, target);
        if head == "try-import" && !target.exists() {
            tracing::debug!(path = %target.display(), "try-import target missing, skipped");
            return Ok(());
        }
        tracing::debug!(path = %target.display(), "following rc import");
        return parse_into(&target, depth + 1, out);
    }

    let (command, config) = match head.split_once(':') {
        Some((command, config)) => (command.to_string(), Some(config.to_string())),
        None => (head.clone(), None),
    };

    // Best-effort columns: scan forward for each token so repeated
    // tokens land on their own occurrence. Quoted tokens may not appear
    // verbatim; those fall back to 0.
    let mut search_from = 0usize;
    let tokens = words[1..]
        .iter()
        .map(|word| {
            let column = match line[search_from..].find(word.as_str()) {
                Some(offset) => {
                    let column = search_from + offset;
                    search_from = column + word.len();
                    column
                }
                None => 0,
            };
            RawToken::new(word.as_str(), Span::new(line_no, column))
        })
        .collect();

    out.push(RcLine {
        command,
        config,
        tokens,
        line: line_no,
        file: path.to_path_buf(),
    });
    Ok(())
}

/// Imports are resolved relative to the importing file; `%workspace%` is
/// taken to mean that same directory (the linter has no workspace concept).
fn resolve_import_path(importer: &Path, target: &str) -> PathBuf {
    let base = importer.parent().unwrap_or_else(|| Path::new("."));
    let target = target.strip_prefix("%workspace%/").unwrap_or(target);
    let candidate = Path::new(target);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_rc(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn commands_configs_and_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rc(
            dir.path(),
            ".bazelrc",
            "# comment\n\nbuild --keep_going\nbuild:opt --compilation_mode=opt\ntest --test_output=errors\n",
        );
        let rc = RcFile::parse(&path).unwrap();

        assert_eq!(rc.lines.len(), 3);
        assert_eq!(rc.lines[0].command, "build");
        assert_eq!(rc.lines[0].config, None);
        assert_eq!(rc.lines[0].line, 3);
        assert_eq!(rc.lines[1].config.as_deref(), Some("opt"));
        assert_eq!(rc.commands(), vec!["build", "test"]);
    }

    #[test]
    fn line_continuation_joins_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rc(dir.path(), ".bazelrc", "build --copt=-O2 \\\n  --copt=-Wall\n");
        let rc = RcFile::parse(&path).unwrap();

        assert_eq!(rc.lines.len(), 1);
        assert_eq!(rc.lines[0].tokens.len(), 2);
        assert_eq!(rc.lines[0].tokens[1].text, "--copt=-Wall");
        assert_eq!(rc.lines[0].line, 1);
    }

    #[test]
    fn import_is_spliced_in_order() {
        let dir = tempfile::tempdir().unwrap();
        write_rc(dir.path(), "shared.bazelrc", "build --verbose_failures\n");
        let root = write_rc(
            dir.path(),
            ".bazelrc",
            "import shared.bazelrc\nbuild --keep_going\n",
        );
        let rc = RcFile::parse(&root).unwrap();

        assert_eq!(rc.lines.len(), 2);
        assert_eq!(rc.lines[0].tokens[0].text, "--verbose_failures");
        assert!(rc.lines[0].file.ends_with("shared.bazelrc"));
        assert_eq!(rc.lines[1].tokens[0].text, "--keep_going");
    }

    #[test]
    fn try_import_missing_is_skipped_import_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let ok = write_rc(dir.path(), "a.bazelrc", "try-import missing.bazelrc\n");
        assert!(RcFile::parse(&ok).unwrap().lines.is_empty());

        let bad = write_rc(dir.path(), "b.bazelrc", "import missing.bazelrc\n");
        assert!(matches!(
            RcFile::parse(&bad),
            Err(RcParseError::ReadError { .. })
        ));
    }

    #[test]
    fn import_loop_is_cut_off() {
        let dir = tempfile::tempdir().unwrap();
        write_rc(dir.path(), "a.bazelrc", "import b.bazelrc\n");
        write_rc(dir.path(), "b.bazelrc", "import a.bazelrc\n");
        assert!(matches!(
            RcFile::parse(&dir.path().join("a.bazelrc")),
            Err(RcParseError::ImportDepthExceeded { .. })
        ));
    }

    #[test]
    fn repeated_tokens_get_their_own_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rc(dir.path(), ".bazelrc", "build --copt=-g --copt=-g\n");
        let rc = RcFile::parse(&path).unwrap();

        let tokens = &rc.lines[0].tokens;
        assert_eq!(tokens[0].span.column, 6);
        assert_eq!(tokens[1].span.column, 16);
    }

    #[test]
    fn quoted_values_stay_one_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_rc(
            dir.path(),
            ".bazelrc",
            "test --test_arg='--flag with spaces'\n",
        );
        let rc = RcFile::parse(&path).unwrap();
        assert_eq!(rc.lines[0].tokens.len(), 1);
        assert_eq!(rc.lines[0].tokens[0].text, "--test_arg=--flag with spaces");
    }
}
