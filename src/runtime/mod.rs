/// Status codes, `AtlastError`, and the `trouble()` plumbing shared by every primitive.
pub mod error;

/// The regions an interpreter instance owns: heap, dictionary, stacks, and the mark/unwind
/// snapshot that ties them together.
pub mod data_structures;

/// The `Interpreter` trait composition and the concrete `AtlastInterpreter` engine.
pub mod interpreter;

/// Registration of the primitive word set, one file per family, wired from `register_base_words`.
pub mod built_ins;
