//! Type-directed value parsing.
//!
//! Converts a raw textual value (or absence, for boolean-shaped flags) into
//! a typed [`FlagValue`] according to the flag's declared [`ValueKind`].

use std::path::PathBuf;
use std::time::Duration;

use crate::registry::ValueKind;
use crate::resolve::diagnostics::ErrorKind;

/// A parsed flag value. Mirrors [`ValueKind`] variant for variant.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Duration(Duration),
    Label(String),
    Path(PathBuf),
    /// The matched member of the declared set.
    Choice(&'static str),
    TriState(TriState),
    /// Opaque text, accepted verbatim.
    Opaque(String),
}

/// Three-valued state for flags with an automatic default behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    Auto,
    Yes,
    No,
}

/// Parse `raw` for flag `name` according to `kind`.
///
/// `raw == None` means bare presence; that is only meaningful for `Boolean`
/// (⇒ true) and `TriState` (⇒ yes). Negated boolean forms never reach this
/// function — the engine materializes `Bool(false)` directly.
pub fn parse_value(
    name: &str,
    kind: ValueKind,
    raw: Option<&str>,
) -> Result<FlagValue, ErrorKind> {
    let Some(raw) = raw else {
        return match kind {
            ValueKind::Boolean => Ok(FlagValue::Bool(true)),
            ValueKind::TriState => Ok(FlagValue::TriState(TriState::Yes)),
            _ => Err(ErrorKind::MissingValue { name: name.into() }),
        };
    };

    match kind {
        ValueKind::Boolean => match parse_bool(raw) {
            Some(b) => Ok(FlagValue::Bool(b)),
            None => Err(malformed(name, raw, "expected true/false/yes/no/1/0")),
        },
        ValueKind::Integer => raw
            .parse::<i64>()
            .map(FlagValue::Int)
            .map_err(|_| malformed(name, raw, "expected an integer")),
        ValueKind::Double => raw
            .parse::<f64>()
            .map(FlagValue::Double)
            .map_err(|_| malformed(name, raw, "expected a number")),
        ValueKind::Duration => parse_duration(name, raw).map(FlagValue::Duration),
        ValueKind::Label => match validate_label(raw) {
            Ok(()) => Ok(FlagValue::Label(raw.into())),
            Err(reason) => Err(malformed(name, raw, reason)),
        },
        ValueKind::Path => Ok(FlagValue::Path(PathBuf::from(raw))),
        ValueKind::OneOf(legal) => match legal.iter().find(|m| **m == raw) {
            Some(member) => Ok(FlagValue::Choice(member)),
            None => Err(ErrorKind::InvalidChoice {
                name: name.into(),
                value: raw.into(),
                legal,
            }),
        },
        ValueKind::TriState => {
            if raw.eq_ignore_ascii_case("auto") {
                Ok(FlagValue::TriState(TriState::Auto))
            } else {
                match parse_bool(raw) {
                    Some(true) => Ok(FlagValue::TriState(TriState::Yes)),
                    Some(false) => Ok(FlagValue::TriState(TriState::No)),
                    None => Err(malformed(name, raw, "expected auto/yes/no")),
                }
            }
        }
        ValueKind::Unknown => Ok(FlagValue::Opaque(raw.into())),
    }
}

fn malformed(name: &str, value: &str, reason: impl Into<String>) -> ErrorKind {
    ErrorKind::MalformedValue {
        name: name.into(),
        value: value.into(),
        reason: reason.into(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("yes") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw.eq_ignore_ascii_case("no") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

/// Parse a duration: `<number><unit>` pairs with units `d h m s ms`.
///
/// A single bare number with no unit anywhere is seconds. Once any unit
/// appears, every pair (including the final one) requires a unit. At least
/// one pair is required. Magnitudes accumulate.
fn parse_duration(name: &str, raw: &str) -> Result<Duration, ErrorKind> {
    if raw.is_empty() {
        return Err(malformed(name, raw, "empty duration"));
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        let secs = raw
            .parse::<u64>()
            .map_err(|_| malformed(name, raw, "duration out of range"))?;
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = raw;
    while !rest.is_empty() {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return Err(malformed(name, raw, "expected a number before the unit"));
        }
        let number = rest[..digits]
            .parse::<u64>()
            .map_err(|_| malformed(name, raw, "duration out of range"))?;
        rest = &rest[digits..];

        let (unit_len, part) = if rest.starts_with("ms") {
            (2, Duration::from_millis(number))
        } else if rest.starts_with('d') {
            (1, Duration::from_secs(number.saturating_mul(86_400)))
        } else if rest.starts_with('h') {
            (1, Duration::from_secs(number.saturating_mul(3_600)))
        } else if rest.starts_with('m') {
            (1, Duration::from_secs(number.saturating_mul(60)))
        } else if rest.starts_with('s') {
            (1, Duration::from_secs(number))
        } else {
            return Err(malformed(name, raw, "missing unit (d, h, m, s, ms)"));
        };
        rest = &rest[unit_len..];

        total = total
            .checked_add(part)
            .ok_or_else(|| malformed(name, raw, "duration out of range"))?;
    }
    Ok(total)
}

/// Syntactic shape check for labels: `@repo//pkg:target`, `//pkg:target`,
/// `//pkg`, `:target`, or relative `pkg[:target]`. Target existence is an
/// external collaborator's concern.
fn validate_label(raw: &str) -> Result<(), &'static str> {
    if raw.is_empty() {
        return Err("empty label");
    }
    if raw.chars().any(char::is_whitespace) {
        return Err("label must not contain whitespace");
    }

    let rest = if let Some(after_repo) = raw.strip_prefix('@') {
        let (repo, rest) = match after_repo.find("//") {
            Some(idx) => (&after_repo[..idx], &after_repo[idx..]),
            None => (after_repo, ""),
        };
        if repo.is_empty() {
            return Err("empty repository name");
        }
        if !repo
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err("invalid character in repository name");
        }
        rest
    } else {
        raw
    };

    if rest.is_empty() {
        // Bare `@repo` refers to the repository's default target.
        return Ok(());
    }

    let pkg_and_target = rest.strip_prefix("//").unwrap_or(rest);
    if pkg_and_target.contains("//") {
        return Err("'//' may only appear at the repository boundary");
    }
    let (pkg, target) = match pkg_and_target.split_once(':') {
        Some((pkg, target)) => (pkg, Some(target)),
        None => (pkg_and_target, None),
    };
    if rest.starts_with("//") && pkg.is_empty() && target.is_none() {
        return Err("empty package path");
    }
    if let Some(target) = target {
        if target.is_empty() {
            return Err("empty target name");
        }
        if target.contains(':') {
            return Err("more than one ':' in label");
        }
    }
    Ok(())
}
