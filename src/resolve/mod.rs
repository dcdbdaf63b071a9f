//! Flag resolution pipeline.
//!
//! ```text
//! Raw token → RegistryStore lookup → (if shorthand) expand
//!           → command scope check → value parse
//!           → ResolvedFlag | Diagnostic
//! ```
//!
//! Each stage is a pure function that can be unit-tested independently;
//! [`ResolutionPass`] orchestrates them and owns all per-pass state.

mod diagnostics;
mod engine;
mod expansion;
mod scope;
mod token;
mod value;

pub use diagnostics::{Diagnostic, ErrorKind, Severity, Span};
pub use engine::{FlagAssignments, FlagState, PassOutcome, ResolutionPass, ResolvedFlag};
pub use expansion::expand;
pub use scope::{check_scope, COMMON_COMMAND, STARTUP_COMMAND};
pub use token::{shape_of, tokens_from_args, RawToken, TokenShape};
pub use value::{parse_value, FlagValue, TriState};
