//! Shorthand flag expansion.
//!
//! Expansion is purely textual substitution: the shorthand flag's own
//! command scope and value kind are never consulted — only the expanded
//! leaf flags go through scope and value checks.

use std::collections::HashSet;

use crate::registry::{FlagDefinition, RegistryStore};
use crate::resolve::diagnostics::ErrorKind;
use crate::resolve::token::{shape_of, TokenShape};

/// Expand `def` to its non-shorthand leaf tokens, in declared order.
///
/// A non-shorthand definition yields the single `original` token unchanged.
/// Revisiting a flag along the current expansion path is a hard error —
/// a truncated expansion would silently drop semantics the user expects.
/// Construction of the store already rejects cyclic tables, so hitting this
/// at resolution time means the store was bypassed.
pub fn expand(
    registry: &RegistryStore,
    def: &FlagDefinition,
    original: &str,
) -> Result<Vec<String>, ErrorKind> {
    if !def.is_expansion() {
        return Ok(vec![original.to_string()]);
    }
    let mut path: HashSet<&'static str> = HashSet::new();
    path.insert(def.name);
    let mut out = Vec::new();
    expand_into(registry, def, &mut path, &mut out)?;
    Ok(out)
}

fn expand_into(
    registry: &RegistryStore,
    def: &FlagDefinition,
    path: &mut HashSet<&'static str>,
    out: &mut Vec<String>,
) -> Result<(), ErrorKind> {
    for &token in def.expands_to {
        let leaf = match shape_of(token) {
            TokenShape::Long { ref name, .. } => registry.resolve_name(name),
            _ => None,
        };
        match leaf {
            Some(hit) if hit.def.is_expansion() => {
                if !path.insert(hit.def.name) {
                    tracing::error!(
                        flag = def.name,
                        revisited = hit.def.name,
                        "expansion cycle in flag table"
                    );
                    return Err(ErrorKind::ExpansionCycle {
                        name: def.name.to_string(),
                        revisited: hit.def.name.to_string(),
                    });
                }
                expand_into(registry, hit.def, path, out)?;
                path.remove(hit.def.name);
            }
            // Unresolvable tokens are passed through; the engine diagnoses
            // them as leaves.
            _ => out.push(token.to_string()),
        }
    }
    Ok(())
}
