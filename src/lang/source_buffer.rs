use std::fmt::{self, Display, Formatter};

/// The location of a byte within one line of input. Used throughout the interpreter for error
/// reporting and for tagging tokens with where they were found.
///
/// This is a read-only structure; use the accessor methods to read the values.
#[derive(Clone, PartialEq, Eq, PartialOrd)]
pub struct SourceLocation {
    /// A tag for the source being scanned: a file path, or something like `<repl>`.
    tag: String,

    /// The 1 based line number the cursor is on.
    line: usize,

    /// The 1 based column number the cursor is on.
    column: usize,
}

impl Display for SourceLocation {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{} ({}, {})", self.tag, self.line, self.column)
    }
}

impl SourceLocation {
    pub fn new(tag: &str, line: usize, column: usize) -> SourceLocation {
        SourceLocation {
            tag: tag.to_string(),
            line,
            column,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

/// A forward-only cursor over a single line of input text, tracking line/column as it advances.
///
/// Unlike a whole-file tokenizer, `SourceBuffer` is meant to be re-seated one line at a time: the
/// scanner must be able to resume a multi-line comment or reject an unterminated string without
/// re-reading everything that came before.
pub struct SourceBuffer {
    /// The text of the current line, as bytes (ATLAST operates on raw bytes, not UTF-8 text).
    line: Vec<u8>,

    /// Byte offset of the cursor within `line`.
    cursor: usize,

    /// Tag used for error reporting (file path or `<repl>`).
    tag: String,

    /// The 1 based line number of the current line.
    line_number: usize,
}

impl SourceBuffer {
    pub fn new(tag: &str) -> SourceBuffer {
        SourceBuffer {
            line: Vec::new(),
            cursor: 0,
            tag: tag.to_string(),
            line_number: 0,
        }
    }

    /// Load a new line of text into the buffer, resetting the cursor to its start and bumping
    /// the line counter. Called once per line by `eval`'s caller (the REPL, `load`, etc).
    pub fn set_line(&mut self, line: &str) {
        self.line = line.as_bytes().to_vec();
        self.cursor = 0;
        self.line_number += 1;
    }

    /// Is the cursor at or past the end of the current line?
    pub fn at_end(&self) -> bool {
        self.cursor >= self.line.len()
    }

    /// Look at the next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.line.get(self.cursor).copied()
    }

    /// Look ahead `n` bytes without consuming anything.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.line.get(self.cursor + n).copied()
    }

    /// Consume and return the next byte.
    pub fn next_byte(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.cursor += 1;
        }
        b
    }

    /// The remainder of the current line, unconsumed.
    pub fn rest(&self) -> &[u8] {
        &self.line[self.cursor.min(self.line.len())..]
    }

    /// Skip forward to the end of the current line (used by the line-comment `\`).
    pub fn skip_to_end(&mut self) {
        self.cursor = self.line.len();
    }

    /// The current cursor location, for tagging tokens and errors.
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(&self.tag, self.line_number.max(1), self.cursor + 1)
    }

    pub fn tag_str(&self) -> &str {
        &self.tag
    }
}
