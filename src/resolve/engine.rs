//! Resolution engine — ties the pipeline stages together.
//!
//! Each occurrence moves through lookup → expansion → scope check → value
//! parse; any stage may fail into a recorded diagnostic, after which the
//! pass continues with the next token ("keep going" diagnostics).
//!
//! A pass owns all mutable state (accumulated values, diagnostics); the
//! registry is shared immutably, so passes over many files can run in
//! parallel without synchronization.

use std::collections::HashMap;

use crate::registry::{FlagDefinition, RegistryStore, ValueKind};
use crate::resolve::diagnostics::{Diagnostic, ErrorKind, Span};
use crate::resolve::expansion::expand;
use crate::resolve::scope::check_scope;
use crate::resolve::token::{shape_of, RawToken, TokenShape};
use crate::resolve::value::{parse_value, FlagValue};

/// One successfully resolved flag occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFlag {
    /// Canonical name, regardless of how the flag was spelled.
    pub name: &'static str,
    pub value: FlagValue,
    /// The occurrence was spelled with the flag's historical name.
    pub via_alias: bool,
    pub span: Span,
}

/// Accumulated value of one flag across a pass.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagState {
    /// Last occurrence wins.
    Single(FlagValue),
    /// `allow_multiple`: occurrences append in order.
    Multiple(Vec<FlagValue>),
}

/// Final per-flag values of a pass, keyed by canonical name.
#[derive(Debug, Default)]
pub struct FlagAssignments {
    slots: HashMap<&'static str, FlagState>,
}

impl FlagAssignments {
    /// Value accumulated during the pass, if the flag occurred.
    pub fn get(&self, name: &str) -> Option<&FlagState> {
        self.slots.get(name)
    }

    /// Like [`get`](Self::get), falling back to the flag's declared default
    /// (parsed lazily with the flag's own grammar).
    pub fn get_or_default(&self, registry: &RegistryStore, name: &str) -> Option<FlagState> {
        if let Some(state) = self.slots.get(name) {
            return Some(state.clone());
        }
        let (def, _) = registry.lookup(name)?;
        match registry.default_value(def)? {
            Ok(value) => Some(FlagState::Single(value)),
            Err(_) => None,
        }
    }

    fn record(&mut self, def: &FlagDefinition, value: FlagValue) {
        if def.allow_multiple {
            match self
                .slots
                .entry(def.name)
                .or_insert_with(|| FlagState::Multiple(Vec::new()))
            {
                FlagState::Multiple(values) => values.push(value),
                // Unreachable for a consistent registry; overwrite rather
                // than lose the newer value.
                state => *state = FlagState::Multiple(vec![value]),
            }
        } else {
            self.slots.insert(def.name, FlagState::Single(value));
        }
    }
}

/// Everything a finished pass produced.
#[derive(Debug)]
pub struct PassOutcome {
    /// Per-occurrence results, in resolution order (expansions flattened).
    pub resolved: Vec<ResolvedFlag>,
    /// Final accumulated values.
    pub assignments: FlagAssignments,
    pub diagnostics: Vec<Diagnostic>,
}

/// One resolution pass: a command scope plus per-pass accumulation state.
pub struct ResolutionPass<'r> {
    registry: &'r RegistryStore,
    command: String,
    resolved: Vec<ResolvedFlag>,
    assignments: FlagAssignments,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> ResolutionPass<'r> {
    pub fn new(registry: &'r RegistryStore, command: impl Into<String>) -> Self {
        Self {
            registry,
            command: command.into(),
            resolved: Vec::new(),
            assignments: FlagAssignments::default(),
            diagnostics: Vec::new(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn resolved(&self) -> &[ResolvedFlag] {
        &self.resolved
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Resolve a whole token stream (one rc line, or an argv slice).
    ///
    /// A non-boolean flag without an inline `=value` consumes the following
    /// token as its value when that token does not begin with `-`.
    pub fn resolve_tokens(&mut self, tokens: &[RawToken]) {
        let mut i = 0;
        while i < tokens.len() {
            let lookahead = tokens.get(i + 1).map(|t| t.text.as_str());
            let consumed = self.resolve_one(&tokens[i], lookahead);
            i += 1 + usize::from(consumed);
        }
    }

    pub fn finish(self) -> PassOutcome {
        PassOutcome {
            resolved: self.resolved,
            assignments: self.assignments,
            diagnostics: self.diagnostics,
        }
    }

    /// Returns whether the lookahead token was consumed as this flag's value.
    fn resolve_one(&mut self, tok: &RawToken, lookahead: Option<&str>) -> bool {
        let registry = self.registry;
        match shape_of(&tok.text) {
            // Target patterns and residual values are the caller's concern.
            TokenShape::Positional => false,
            TokenShape::Short { abbrev } => {
                match registry.lookup_abbrev(abbrev, &self.command) {
                    Some(def) => self.apply(def, false, false, None, tok, lookahead),
                    None => {
                        self.report(
                            ErrorKind::UnknownFlag {
                                spelling: tok.text.clone(),
                            },
                            tok.span,
                        );
                        false
                    }
                }
            }
            TokenShape::Long { name, value } => match registry.resolve_name(&name) {
                Some(hit) => self.apply(hit.def, hit.via_alias, hit.negated, value, tok, lookahead),
                None => {
                    self.report(
                        ErrorKind::UnknownFlag {
                            spelling: format!("--{name}"),
                        },
                        tok.span,
                    );
                    false
                }
            },
        }
    }

    fn apply(
        &mut self,
        def: &'r FlagDefinition,
        via_alias: bool,
        negated: bool,
        inline: Option<String>,
        tok: &RawToken,
        lookahead: Option<&str>,
    ) -> bool {
        // Advisory tags never change resolution, only add warnings.
        if def.deprecated {
            self.report(
                ErrorKind::DeprecatedFlag {
                    name: def.name.to_string(),
                },
                tok.span,
            );
        }
        if def.experimental {
            self.report(
                ErrorKind::ExperimentalFlag {
                    name: def.name.to_string(),
                },
                tok.span,
            );
        }

        if def.is_expansion() {
            if let Some(value) = inline {
                self.report(
                    ErrorKind::MalformedValue {
                        name: def.name.to_string(),
                        value,
                        reason: "shorthand flag takes no value".into(),
                    },
                    tok.span,
                );
                return false;
            }
            match expand(self.registry, def, &tok.text) {
                Ok(leaves) => {
                    for leaf in leaves {
                        let leaf_tok = RawToken::new(leaf, tok.span);
                        self.resolve_one(&leaf_tok, None);
                    }
                }
                Err(kind) => self.report(kind, tok.span),
            }
            return false;
        }

        // Consume a detached value token where the grammar needs one.
        // A missing value is not diagnosed here: the scope check comes
        // first, and value parsing reports the absence for value-taking
        // kinds.
        let mut consumed = false;
        let value = match inline {
            Some(v) => Some(v),
            None => match def.value_kind {
                ValueKind::Boolean | ValueKind::TriState => None,
                _ => match lookahead {
                    Some(next) if !next.starts_with('-') => {
                        consumed = true;
                        Some(next.to_string())
                    }
                    _ => None,
                },
            },
        };

        if let Err(kind) = check_scope(def, &self.command) {
            self.report(kind, tok.span);
            return consumed;
        }

        let parsed = if negated {
            match value {
                Some(value) => Err(ErrorKind::MalformedValue {
                    name: def.name.to_string(),
                    value,
                    reason: "negated form takes no value".into(),
                }),
                None => Ok(FlagValue::Bool(false)),
            }
        } else {
            parse_value(def.name, def.value_kind, value.as_deref())
        };

        match parsed {
            Ok(value) => {
                self.assignments.record(def, value.clone());
                self.resolved.push(ResolvedFlag {
                    name: def.name,
                    value,
                    via_alias,
                    span: tok.span,
                });
            }
            Err(kind) => self.report(kind, tok.span),
        }
        consumed
    }

    fn report(&mut self, kind: ErrorKind, span: Span) {
        self.diagnostics.push(Diagnostic::new(kind, span));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FlagDefinition;
    use crate::resolve::token::tokens_from_args;

    fn store() -> RegistryStore {
        RegistryStore::new(vec![
            FlagDefinition::new("keep_going", ValueKind::Boolean, &["build", "test"]).abbrev('k'),
            FlagDefinition::new("jobs", ValueKind::Integer, &["build", "test"]).abbrev('j'),
            FlagDefinition::new("copt", ValueKind::Unknown, &["build", "test"]).multiple(),
        ])
        .unwrap()
    }

    #[test]
    fn detached_value_is_consumed() {
        let store = store();
        let mut pass = ResolutionPass::new(&store, "build");
        pass.resolve_tokens(&tokens_from_args(&["-j", "8", "-k"]));
        let outcome = pass.finish();
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.resolved[0].value, FlagValue::Int(8));
        assert_eq!(outcome.resolved[1].value, FlagValue::Bool(true));
    }

    #[test]
    fn missing_value_is_reported_and_pass_continues() {
        let store = store();
        let mut pass = ResolutionPass::new(&store, "build");
        pass.resolve_tokens(&tokens_from_args(&["--jobs", "--keep_going"]));
        let outcome = pass.finish();
        assert!(matches!(
            outcome.diagnostics[0].kind,
            ErrorKind::MissingValue { .. }
        ));
        // --keep_going was not swallowed as the value of --jobs.
        assert_eq!(outcome.resolved[0].name, "keep_going");
    }

    #[test]
    fn boolean_never_consumes_lookahead() {
        let store = store();
        let mut pass = ResolutionPass::new(&store, "build");
        pass.resolve_tokens(&tokens_from_args(&["-k", "8"]));
        let outcome = pass.finish();
        // "8" is a positional, silently left to the caller.
        assert_eq!(outcome.resolved.len(), 1);
        assert!(outcome.diagnostics.is_empty());
    }
}
