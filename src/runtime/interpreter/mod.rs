use crate::lang::source_buffer::SourceLocation;
use crate::runtime::data_structures::dictionary::Dictionary;
use crate::runtime::data_structures::heap::Heap;
use crate::runtime::data_structures::mark::Markable;
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::{AtlastError, Result, Status};

pub mod atlast_interpreter;

/// Encode the instruction pointer as a return-stack cell: an empty `ip` (top level) is `-1`, any
/// real address is itself. Lets `nest`/`exit` move `ip` through the same homogeneous `i64` return
/// stack the loop-control triples use.
pub fn ip_to_i64(ip: Option<usize>) -> i64 {
    ip.map(|address| address as i64).unwrap_or(-1)
}

pub fn i64_to_ip(value: i64) -> Option<usize> {
    if value < 0 {
        None
    } else {
        Some(value as usize)
    }
}

/// The dozen-odd internal helper words whose compiled addresses get looked up once at `init` and
/// cached on the instance rather than re-resolved by name on every use.
#[derive(Default, Clone, Copy)]
pub struct CachedWords {
    pub exit: Option<usize>,
    pub lit: Option<usize>,
    pub flit: Option<usize>,
    pub strlit: Option<usize>,
    pub dot_paren: Option<usize>,
    pub branch: Option<usize>,
    pub qbranch: Option<usize>,
    pub xdo: Option<usize>,
    pub xqdo: Option<usize>,
    pub xloop: Option<usize>,
    pub xplusloop: Option<usize>,
    pub abort_quote: Option<usize>,
}

/// What the next string token should do once scanned, set by `."` (print it) or `ABORT"`
/// (conditionally abort with it) — both immediate words that only set up the pending flag; the
/// actual string token is scanned and dispatched generically afterward.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StringLiteralAction {
    Print,
    Abort,
}

/// The single-bit pending flags of the state record. `comment_pending` lives on the scanner
/// itself (see `lang::scanner::ScannerState`) since it is purely a tokenizing concern; the rest
/// drive the compiler state machine's token dispatch.
#[derive(Default, Clone)]
pub struct PendingFlags {
    pub forget: bool,
    pub tick: bool,
    pub compile_tick: bool,
    pub bracket_compile: bool,
    pub string_literal: Option<StringLiteralAction>,
    pub async_break: bool,
}

/// Manage the interpreter's data stack and return stack. Intended to be called by word handlers,
/// both native and compiled.
pub trait InterpreterStack {
    fn push(&mut self, value: Value) -> Result<()>;
    fn pop(&mut self) -> Result<Value>;
    fn peek(&self) -> Result<Value>;
    fn pick(&self, depth: usize) -> Result<Value>;
    fn set_pick(&mut self, depth: usize, value: Value) -> Result<()>;
    fn depth(&self) -> usize;

    fn rpush(&mut self, value: i64) -> Result<()>;
    fn rpop(&mut self) -> Result<i64>;
    fn rpick(&self, depth: usize) -> Result<i64>;
    fn r_set_pick(&mut self, depth: usize, value: i64) -> Result<()>;
    fn rdepth(&self) -> usize;

    /// Pushed on every `nest`, popped on every `exit`.
    fn walkback_push(&mut self, index: usize) -> Result<()>;
    fn walkback_pop(&mut self) -> Result<usize>;

    /// Clear the data, return, and walkback stacks — part of the common fault handler.
    fn clear_stacks(&mut self);
}

/// Manage compilation: the heap bump pointer used to lay down threaded code, the interpret/compile
/// state word, and the instruction pointer the dispatch loop drives.
pub trait CodeManagement {
    /// The heap address the next compiled cell will land at.
    fn here(&self) -> usize;

    /// Append one cell to the heap, returning its address (used to lay down threaded code).
    fn compile_cell(&mut self, value: Value) -> Result<usize>;

    fn compiling(&self) -> bool;
    fn set_compiling(&mut self, flag: bool);

    fn ip(&self) -> Option<usize>;
    fn set_ip(&mut self, ip: Option<usize>);

    /// The word whose body is currently being defined (between `:`/`CREATE` and `;`), if any.
    fn defining_word(&self) -> Option<usize>;
    fn set_defining_word(&mut self, index: Option<usize>);
}

/// Core interpreter trait: everything a word handler (native or threaded) needs to manipulate the
/// engine it's running inside of — `InterpreterStack` + `CodeManagement` + `Markable`, narrowed to
/// ATLAST's own surface (no bytecode compilation contexts, no FFI variable lists — `host_words.rs`
/// owns its own small library registry instead).
pub trait Interpreter: InterpreterStack + CodeManagement + Markable {
    fn heap(&self) -> &Heap;
    fn heap_mut(&mut self) -> &mut Heap;

    fn dictionary(&self) -> &Dictionary;
    fn dictionary_mut(&mut self) -> &mut Dictionary;

    fn status(&self) -> Status;
    fn set_status(&mut self, status: Status);

    fn current_location(&self) -> Option<SourceLocation>;

    fn current_word(&self) -> Option<usize>;
    fn set_current_word(&mut self, index: Option<usize>);

    fn base(&self) -> u32;
    fn set_base(&mut self, base: u32);

    fn diagnostics_enabled(&self) -> bool;

    fn cached(&self) -> &CachedWords;
    fn cached_mut(&mut self) -> &mut CachedWords;

    fn pending(&self) -> &PendingFlags;
    fn pending_mut(&mut self) -> &mut PendingFlags;

    /// Set the async-break flag; observed between primitives, never mid dispatch.
    fn request_break(&mut self);

    /// The region-reset half of the common fault handler: clear the data/return/walkback
    /// stacks, reset `ip`, and clear every pending flag. Idempotent, so it's safe to call both
    /// from a primitive that detects its own precondition failure (via `trouble`) and again from
    /// the `eval`/`exec`/`evaluate` boundary that catches whatever `Result` escapes dispatch —
    /// including the stack/heap guards that raise an `AtlastError` directly rather than routing
    /// through `trouble`. A checked fault, never undefined behavior, no matter which layer
    /// detected it.
    fn fault_cleanup(&mut self) {
        self.clear_stacks();
        self.set_ip(None);
        *self.pending_mut() = PendingFlags::default();
    }

    /// The common fault handler: reset every region via `fault_cleanup` and record `status`.
    /// Diagnostic printing happens once, at the `eval`/`exec`/`evaluate` boundary that ultimately
    /// catches the returned error, not here — a primitive may call `trouble` several frames below
    /// that boundary, and printing at each layer would duplicate the message.
    fn trouble(&mut self, status: Status, message: &str) -> AtlastError {
        self.fault_cleanup();
        self.set_status(status);

        AtlastError::new(status, self.current_location(), message.to_string())
    }

    /// Dispatch (`exword`): invoke `index`'s code reference directly, then drain the
    /// threaded-code loop — reloading `current_word` from `*ip++` and invoking it — until `ip`
    /// empties.
    fn exec_word(&mut self, index: usize) -> Result<()>;

    /// Register a native primitive, returning its dictionary index.
    fn add_primitive(
        &mut self,
        name: &str,
        immediate: bool,
        handler: crate::runtime::data_structures::dictionary::NativeFn,
    ) -> usize;

    /// The most recent word installed by `CREATE` (or a defining word built on it), used by
    /// `DOES>` to attach a runtime action to "whatever `CREATE` just made".
    fn last_created(&self) -> Option<usize>;
    fn set_last_created(&mut self, index: Option<usize>);

    /// Interpret `text` as a nested line of source, recursing into the same scan/dispatch
    /// machinery `eval` uses (`EVALUATE`). Returns the resulting status rather than
    /// propagating it, so a caller can push it back onto the data stack.
    fn evaluate(&mut self, text: &str) -> Status;

    /// `MARK` exposed as a Forth word: snapshot every region and return a handle
    /// `UNWIND`/`mark_unwind` can later restore to.
    fn mark_push(&mut self) -> usize;

    /// `UNWIND handle`: restore the regions snapshotted under `handle`, discarding it and
    /// any mark taken after it.
    fn mark_unwind(&mut self, handle: usize) -> Result<()>;

    /// Parse the next bare-word token a defining word names itself with (`CREATE foo`, `:
    /// square`, the `"FIVE"` in `5 CONSTANT FIVE`). Reads directly off the scanner cursor
    /// currently loaded, the same one `eval`'s token loop drives, so a defining word parses its
    /// own name correctly whether it runs at top level or as one cell inside another word's
    /// compiled body (the latter is exactly how `DOES>` is used in practice: `: CONSTANT CREATE ,
    /// DOES> @ ;`). Fails with `NOTINDEF` if the line runs out first — unlike `'`, a defining
    /// word's name is required to share its line.
    fn parse_name(&mut self) -> Result<String>;
}
