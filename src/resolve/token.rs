//! Token shapes — raw text → `(name, inline value)` form.

use crate::resolve::diagnostics::Span;

/// One raw token plus its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken {
    pub text: String,
    pub span: Span,
}

impl RawToken {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// Syntactic shape of a token. Negation (`--no<name>`) is decided at lookup
/// time, since it depends on what the stripped name resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenShape {
    /// `--name` or `--name=value`.
    Long {
        name: String,
        value: Option<String>,
    },
    /// `-x` single-character short form.
    Short { abbrev: char },
    /// Anything else — a target pattern or a detached value.
    Positional,
}

/// Classify a token's shape without consulting the registry.
pub fn shape_of(text: &str) -> TokenShape {
    if let Some(rest) = text.strip_prefix("--") {
        if rest.is_empty() {
            // A bare `--` separator is not a flag.
            return TokenShape::Positional;
        }
        return match rest.split_once('=') {
            Some((name, value)) => TokenShape::Long {
                name: name.to_string(),
                value: Some(value.to_string()),
            },
            None => TokenShape::Long {
                name: rest.to_string(),
                value: None,
            },
        };
    }

    let mut chars = text.chars();
    if chars.next() == Some('-') {
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphanumeric() {
                return TokenShape::Short { abbrev: c };
            }
        }
    }
    TokenShape::Positional
}

/// Wrap plain argv-style strings as tokens; the column is the argv index.
pub fn tokens_from_args<S: AsRef<str>>(args: &[S]) -> Vec<RawToken> {
    args.iter()
        .enumerate()
        .map(|(i, a)| RawToken::new(a.as_ref(), Span::new(0, i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_with_inline_value() {
        assert_eq!(
            shape_of("--copt=-O2"),
            TokenShape::Long {
                name: "copt".into(),
                value: Some("-O2".into()),
            }
        );
    }

    #[test]
    fn long_value_may_contain_equals() {
        assert_eq!(
            shape_of("--define=FOO=bar"),
            TokenShape::Long {
                name: "define".into(),
                value: Some("FOO=bar".into()),
            }
        );
    }

    #[test]
    fn long_without_value() {
        assert_eq!(
            shape_of("--keep_going"),
            TokenShape::Long {
                name: "keep_going".into(),
                value: None,
            }
        );
    }

    #[test]
    fn short_form() {
        assert_eq!(shape_of("-k"), TokenShape::Short { abbrev: 'k' });
    }

    #[test]
    fn positionals() {
        for text in ["//pkg:target", "-", "--", "-abc", "value"] {
            assert_eq!(shape_of(text), TokenShape::Positional, "{text}");
        }
    }
}
