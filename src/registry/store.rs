//! Validated, immutable index over flag definitions.
//!
//! Construction runs the load-time integrity checks over the whole table;
//! lookups after that are infallible map probes. A malformed table is fatal:
//! no resolution can proceed against it.

use std::collections::HashMap;

use thiserror::Error;

use crate::registry::def::{FlagDefinition, ValueKind};
use crate::resolve::{parse_value, shape_of, ErrorKind, FlagValue, TokenShape};

/// Registry-integrity defects, detected once at construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate flag definition for --{name}")]
    DuplicateName { name: &'static str },

    #[error("alias '{alias}' of --{name} collides with --{other}")]
    AliasCollision {
        name: &'static str,
        alias: &'static str,
        other: &'static str,
    },

    #[error("abbreviation -{abbrev} is ambiguous for command '{command}': --{first} vs --{second}")]
    AmbiguousAbbreviation {
        abbrev: char,
        command: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("flag --{name} declares no applicable commands")]
    NoCommands { name: &'static str },

    #[error("flag --{name} mixes 'startup' with other command scopes")]
    MixedStartupScope { name: &'static str },

    #[error("shorthand flag --{name} must not allow multiple occurrences")]
    ExpansionWithMultiple { name: &'static str },

    #[error("expansion of --{name} references unrecognized token '{token}'")]
    UnknownExpansionTarget {
        name: &'static str,
        token: &'static str,
    },

    #[error("expansion cycle: {chain}")]
    ExpansionCycle { chain: String },
}

#[derive(Debug, Clone, Copy)]
struct NameSlot {
    index: usize,
    via_alias: bool,
}

/// A successful name lookup, including how the name was spelled.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedName<'a> {
    pub def: &'a FlagDefinition,
    /// The spelling was the flag's historical `old_name`.
    pub via_alias: bool,
    /// The spelling was the `no`-prefixed boolean form.
    pub negated: bool,
}

/// Immutable, queryable index: by canonical name, by alias, by abbreviation
/// scoped to a command. Shared by reference across any number of concurrent
/// resolution passes.
#[derive(Debug)]
pub struct RegistryStore {
    defs: Vec<FlagDefinition>,
    by_name: HashMap<&'static str, NameSlot>,
    by_abbrev: HashMap<char, Vec<(&'static str, usize)>>,
}

impl RegistryStore {
    /// Build the index, failing on any integrity defect in the table.
    pub fn new(defs: Vec<FlagDefinition>) -> Result<Self, RegistryError> {
        let mut by_name: HashMap<&'static str, NameSlot> = HashMap::new();
        let mut by_abbrev: HashMap<char, Vec<(&'static str, usize)>> = HashMap::new();

        for (index, def) in defs.iter().enumerate() {
            if def.commands.is_empty() {
                return Err(RegistryError::NoCommands { name: def.name });
            }
            if def.applies_to(crate::resolve::STARTUP_COMMAND) && def.commands.len() > 1 {
                return Err(RegistryError::MixedStartupScope { name: def.name });
            }
            if def.is_expansion() && def.allow_multiple {
                return Err(RegistryError::ExpansionWithMultiple { name: def.name });
            }

            if by_name
                .insert(def.name, NameSlot { index, via_alias: false })
                .is_some()
            {
                return Err(RegistryError::DuplicateName { name: def.name });
            }
            if let Some(alias) = def.old_name {
                if let Some(prior) = by_name.insert(alias, NameSlot { index, via_alias: true }) {
                    return Err(RegistryError::AliasCollision {
                        name: def.name,
                        alias,
                        other: defs[prior.index].name,
                    });
                }
            }

            if let Some(abbrev) = def.abbrev {
                let slots = by_abbrev.entry(abbrev).or_default();
                for &command in def.commands {
                    if let Some(&(_, prior)) = slots.iter().find(|(c, _)| *c == command) {
                        return Err(RegistryError::AmbiguousAbbreviation {
                            abbrev,
                            command,
                            first: defs[prior].name,
                            second: def.name,
                        });
                    }
                    slots.push((command, index));
                }
            }
        }

        let store = Self {
            defs,
            by_name,
            by_abbrev,
        };
        store.validate_expansions()?;
        Ok(store)
    }

    /// Exact lookup by canonical name or alias.
    pub fn lookup(&self, name: &str) -> Option<(&FlagDefinition, bool)> {
        let slot = self.by_name.get(name)?;
        Some((&self.defs[slot.index], slot.via_alias))
    }

    /// Lookup by abbreviation, scoped to a command. Two flags valid in
    /// disjoint command sets may legally share an abbreviation.
    pub fn lookup_abbrev(&self, abbrev: char, command: &str) -> Option<&FlagDefinition> {
        self.by_abbrev
            .get(&abbrev)?
            .iter()
            .find(|(c, _)| *c == command)
            .map(|(_, index)| &self.defs[*index])
    }

    /// Resolve a spelled name: exact canonical/alias first, then the
    /// `no`-prefixed form, which is recognized only for boolean flags.
    pub fn resolve_name(&self, spelled: &str) -> Option<ResolvedName<'_>> {
        if let Some((def, via_alias)) = self.lookup(spelled) {
            return Some(ResolvedName {
                def,
                via_alias,
                negated: false,
            });
        }
        let rest = spelled.strip_prefix("no")?;
        let (def, via_alias) = self.lookup(rest)?;
        if def.value_kind == ValueKind::Boolean && !def.is_expansion() {
            return Some(ResolvedName {
                def,
                via_alias,
                negated: true,
            });
        }
        None
    }

    /// All definitions, in declaration order.
    pub fn defs(&self) -> &[FlagDefinition] {
        &self.defs
    }

    /// Lazily parse a flag's declared default with its own grammar.
    pub fn default_value(&self, def: &FlagDefinition) -> Option<Result<FlagValue, ErrorKind>> {
        def.default_value
            .map(|raw| parse_value(def.name, def.value_kind, Some(raw)))
    }

    /// Depth-first walk over the expansion graph: every referenced token
    /// must resolve, and the graph must be a DAG.
    fn validate_expansions(&self) -> Result<(), RegistryError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InPath,
            Done,
        }

        fn visit(
            store: &RegistryStore,
            def: &FlagDefinition,
            marks: &mut HashMap<&'static str, Mark>,
            path: &mut Vec<&'static str>,
        ) -> Result<(), RegistryError> {
            match marks.get(def.name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InPath) => {
                    let mut chain: Vec<&str> = path.clone();
                    chain.push(def.name);
                    return Err(RegistryError::ExpansionCycle {
                        chain: chain.join(" -> "),
                    });
                }
                None => {}
            }
            marks.insert(def.name, Mark::InPath);
            path.push(def.name);

            for &token in def.expands_to {
                let TokenShape::Long { name, .. } = shape_of(token) else {
                    return Err(RegistryError::UnknownExpansionTarget {
                        name: def.name,
                        token,
                    });
                };
                let Some(hit) = store.resolve_name(&name) else {
                    return Err(RegistryError::UnknownExpansionTarget {
                        name: def.name,
                        token,
                    });
                };
                if hit.def.is_expansion() {
                    visit(store, hit.def, marks, path)?;
                }
            }

            path.pop();
            marks.insert(def.name, Mark::Done);
            Ok(())
        }

        let mut marks = HashMap::new();
        let mut path = Vec::new();
        for def in &self.defs {
            if def.is_expansion() {
                visit(self, def, &mut marks, &mut path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::def::FlagDefinition;

    const BUILD: &[&str] = &["build"];

    #[test]
    fn lookup_prefers_exact_over_negation() {
        // `noop_flag` starts with "no" but is a real flag of its own.
        let store = RegistryStore::new(vec![
            FlagDefinition::new("noop_flag", ValueKind::Boolean, BUILD),
            FlagDefinition::new("op_flag", ValueKind::Boolean, BUILD),
        ])
        .unwrap();

        let hit = store.resolve_name("noop_flag").unwrap();
        assert_eq!(hit.def.name, "noop_flag");
        assert!(!hit.negated);
    }

    #[test]
    fn negation_requires_boolean_kind() {
        let store = RegistryStore::new(vec![FlagDefinition::new(
            "jobs",
            ValueKind::Integer,
            BUILD,
        )])
        .unwrap();
        assert!(store.resolve_name("nojobs").is_none());
    }

    #[test]
    fn abbrev_is_command_scoped() {
        let store = RegistryStore::new(vec![
            FlagDefinition::new("keep_going", ValueKind::Boolean, &["build", "test"]).abbrev('k'),
            FlagDefinition::new("kernel", ValueKind::Boolean, &["query"]).abbrev('k'),
        ])
        .unwrap();

        assert_eq!(store.lookup_abbrev('k', "build").unwrap().name, "keep_going");
        assert_eq!(store.lookup_abbrev('k', "query").unwrap().name, "kernel");
        assert!(store.lookup_abbrev('k', "clean").is_none());
    }

    #[test]
    fn default_value_parses_lazily() {
        let store = RegistryStore::new(vec![FlagDefinition::new(
            "jobs",
            ValueKind::Integer,
            BUILD,
        )
        .default("200")])
        .unwrap();
        let def = store.lookup("jobs").unwrap().0;
        assert_eq!(store.default_value(def), Some(Ok(FlagValue::Int(200))));
    }
}
