//! Flag registry — the immutable vocabulary of recognized flags.
//!
//! [`FlagDefinition`] describes one flag; [`builtin_registry`] is the
//! declarative table of builtin flags; [`RegistryStore`] is the validated,
//! queryable index built once at startup and shared by reference.

mod builtin;
mod def;
mod store;

pub use builtin::builtin_registry;
pub use def::{FlagDefinition, ValueKind};
pub use store::{RegistryError, RegistryStore, ResolvedName};
