//! rclint — flag registry and resolution engine for `.bazelrc`-style files.
//!
//! The crate is split into two halves:
//!
//! - [`registry`] — the immutable flag vocabulary: definitions, the builtin
//!   table, and the validated [`registry::RegistryStore`] index.
//! - [`resolve`] — the per-occurrence resolution pipeline:
//!
//! ```text
//! Raw token → lookup → expand → scope check → value parse → ResolvedFlag
//! ```
//!
//! Everything around those two is plumbing for the `rclint` binary:
//! [`rcfile`] parses `.bazelrc` files into token streams, [`report`] renders
//! diagnostics, and [`config`] loads the optional CLI configuration.
//!
//! The registry is built once and shared immutably; a [`resolve::ResolutionPass`]
//! owns all per-pass state, so resolving many files in parallel needs no
//! synchronization beyond `&RegistryStore`.

pub mod config;
pub mod rcfile;
pub mod registry;
pub mod report;
pub mod resolve;
