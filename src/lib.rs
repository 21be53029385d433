//! ATLAST: an embeddable, extensible Forth-dialect interpreter/compiler.
//!
//! A host links this crate, builds an [`runtime::interpreter::atlast_interpreter::AtlastInterpreter`],
//! registers its own primitive words alongside the base word set, and drives the engine with
//! `eval`/`load` one line at a time.

/// Source tracking and the scanner that turns raw input lines into tokens.
pub mod lang;

/// Everything owned by one interpreter instance: errors, data structures, the interpreter trait
/// and its concrete engine, and the built-in word set.
pub mod runtime;
