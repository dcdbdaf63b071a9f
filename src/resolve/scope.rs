//! Command scope checks.

use crate::registry::FlagDefinition;
use crate::resolve::diagnostics::ErrorKind;

/// The startup scope is a disjoint universe: flags scoped only to `startup`
/// are illegal everywhere else, and vice versa.
pub const STARTUP_COMMAND: &str = "startup";

/// The `common` pseudo-command of rc files: legal for any flag that applies
/// to at least one non-startup command.
pub const COMMON_COMMAND: &str = "common";

/// Reject a resolved flag that is illegal for the current command.
pub fn check_scope(def: &FlagDefinition, command: &str) -> Result<(), ErrorKind> {
    let legal = if command == COMMON_COMMAND {
        def.commands.iter().any(|c| *c != STARTUP_COMMAND)
    } else {
        def.applies_to(command)
    };
    if legal {
        Ok(())
    } else {
        Err(ErrorKind::UnknownFlagForCommand {
            name: def.name.to_string(),
            command: command.to_string(),
        })
    }
}
