use std::rc::Rc;

use crate::lang::source_buffer::SourceLocation;
use crate::runtime::error::{AtlastError, Result, Status};
use crate::runtime::interpreter::Interpreter;

pub const FLAG_IMMEDIATE: u8 = 0b001;
pub const FLAG_USED: u8 = 0b010;
pub const FLAG_HIDDEN: u8 = 0b100;

/// A native handler bound to a dictionary entry. Shared by `Rc` rather than boxed outright since
/// the same handler value is cheap to clone into closures that need to recall their own word
/// (e.g. `RECURSE`).
pub type NativeFn = Rc<dyn Fn(&mut dyn Interpreter) -> Result<()>>;

/// What a word's code reference dispatches to when the word is invoked — a tagged enum standing
/// in for the source's function-pointer `wcode` field.
#[derive(Clone)]
pub enum CodeRef {
    /// A built-in Rust handler.
    Primitive(NativeFn),

    /// A compiled colon-definition: run the body as threaded code starting at `body_addr`.
    Nest,

    /// `CREATE`d (or not-yet-closed `:`) word: invoking it pushes its body address.
    Var,

    /// `CONSTANT`: invoking it pushes the one cell stored at `body_addr`.
    Const,

    /// `2CONSTANT`: invoking it pushes the two cells stored at `body_addr` and `body_addr + 1`.
    TwoConst,

    /// `ARRAY`: invoking it pops N subscripts, range-checks them against `dims`, and pushes the
    /// linear cell address of the selected element.
    ArraySub { esize: i64, dims: Vec<i64> },

    /// `DOES>`-defined: invoking it redirects `ip` into the hidden method body while pushing this
    /// word's body address, exactly like `Var` would have.
    Dodoes,
}

/// One dictionary entry. `body_addr` is always the address new invocations
/// operate against; for `Dodoes` words the hidden method-pointer cell sits immediately before it
/// in the heap (`does_cell`), one cell lower, matching the C original's layout.
#[derive(Clone)]
pub struct WordHeader {
    pub name: String,
    pub flags: u8,
    pub code: CodeRef,
    pub body_addr: usize,
    pub does_cell: Option<usize>,
}

impl WordHeader {
    pub fn is_immediate(&self) -> bool {
        self.flags & FLAG_IMMEDIATE != 0
    }

    pub fn is_hidden(&self) -> bool {
        self.flags & FLAG_HIDDEN != 0
    }
}

/// The dictionary: a singly linked chain in spirit, a `Vec` in practice — appending is linking a
/// new head, and `FORGET`/`UNWIND` truncating the tail is exactly "rewind the chain to an older
/// link". Because entries are only ever
/// removed from the end, indices into this vector are stable for the lifetime of the entry they
/// name, so a plain `usize` doubles as a word reference (the value a `'`/`[']`/`FIND` pushes).
pub struct Dictionary {
    entries: Vec<WordHeader>,
    protected: usize,
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary {
            entries: Vec::new(),
            protected: 0,
        }
    }

    pub fn get(&self, index: usize) -> Option<&WordHeader> {
        self.entries.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut WordHeader> {
        self.entries.get_mut(index)
    }

    /// Resolve `name` (already upper-cased by the scanner) to the most recently defined,
    /// non-hidden entry, marking it `USED` as a side effect.
    pub fn lookup(&mut self, name: &str) -> Option<usize> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .rev()
            .find(|(_, entry)| !entry.is_hidden() && entry.name == name)
            .map(|(index, _)| index);

        if let Some(index) = index {
            self.entries[index].flags |= FLAG_USED;
        }

        index
    }

    /// Link a new entry at the head of the chain, returning its index.
    pub fn enter(&mut self, name: String, code: CodeRef, body_addr: usize) -> usize {
        self.entries.push(WordHeader {
            name,
            flags: 0,
            code,
            body_addr,
            does_cell: None,
        });
        self.entries.len() - 1
    }

    pub fn head(&self) -> usize {
        self.entries.len()
    }

    pub fn protect(&mut self) {
        self.protected = self.entries.len();
    }

    pub fn protected_mark(&self) -> usize {
        self.protected
    }

    /// Rewind the chain to `mark`, as `UNWIND` does; never crosses the protected boundary.
    pub fn rewind(&mut self, mark: usize) {
        let floor = mark.max(self.protected);
        self.entries.truncate(floor);
    }

    /// `FORGET name`: find the named entry, verify it and everything newer is
    /// unprotected, then drop it and every newer entry. Returns the heap-cell address the caller
    /// should rewind the bump pointer to.
    pub fn forget(&mut self, name: &str, location: Option<SourceLocation>) -> Result<usize> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .rev()
            .find(|(_, entry)| entry.name == name)
            .map(|(index, _)| index)
            .ok_or_else(|| AtlastError::new(Status::Undefined, location.clone(), format!("{} is not defined", name)))?;

        if index < self.protected {
            return Err(AtlastError::new(
                Status::ForgetProt,
                location,
                format!("cannot forget {}: protected", name),
            ));
        }

        let rewind_to = match self.entries[index].does_cell {
            Some(hidden) => hidden,
            None => self.entries[index].body_addr,
        };

        self.entries.truncate(index);

        Ok(rewind_to)
    }

    /// All live (non-hidden) entries, most recently defined first — backs `WORDS`.
    pub fn live_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .rev()
            .filter(|entry| !entry.is_hidden())
            .map(|entry| entry.name.as_str())
            .collect()
    }
}

impl Default for Dictionary {
    fn default() -> Dictionary {
        Dictionary::new()
    }
}
