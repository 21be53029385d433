/// Module for tracking source positions and turning raw input lines into tokens.
pub mod scanner;
pub mod source_buffer;
