use crate::lang::scanner::{self, ScannerState, Token};
use crate::lang::source_buffer::{SourceBuffer, SourceLocation};
use crate::runtime::built_ins;
use crate::runtime::data_structures::dictionary::{CodeRef, Dictionary, NativeFn};
use crate::runtime::data_structures::heap::Heap;
use crate::runtime::data_structures::mark::{Mark, Markable};
use crate::runtime::data_structures::stacks::Stack;
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::{AtlastError, Result, Status};
use crate::runtime::interpreter::{
    i64_to_ip, ip_to_i64, CachedWords, CodeManagement, Interpreter, InterpreterStack, PendingFlags, StringLiteralAction,
};

/// Region sizes the host may adjust via a prologue line, only before the first `init`.
#[derive(Clone, Copy)]
pub struct Config {
    pub stack: usize,
    pub rstack: usize,
    pub heap_cells: usize,
    pub heap_bytes: usize,
    pub temp_string_len: usize,
    pub temp_string_count: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            stack: 256,
            rstack: 256,
            heap_cells: 16_384,
            heap_bytes: 8_192,
            temp_string_len: 32,
            temp_string_count: 8,
        }
    }
}

/// The concrete ATLAST engine. A single instance owns every region the language needs to run —
/// stacks, heap, dictionary, scanner state; nothing here is global, so multiple instances coexist
/// cleanly. One struct holding every region, behind a trait-composition seam (`Interpreter` et
/// al.) that word handlers are written against.
pub struct AtlastInterpreter {
    data_stack: Stack<Value>,
    return_stack: Stack<i64>,
    walkback_stack: Stack<usize>,
    heap: Heap,
    dictionary: Dictionary,

    scanner_buffer: SourceBuffer,
    scanner_state: ScannerState,

    ip: Option<usize>,
    current_word: Option<usize>,
    defining_word: Option<usize>,
    last_created: Option<usize>,
    status: Status,

    pending: PendingFlags,
    cached: CachedWords,
    marks: Vec<Mark>,

    config: Config,
    initialized: bool,
    diagnostics: bool,
}

impl AtlastInterpreter {
    pub fn new() -> AtlastInterpreter {
        AtlastInterpreter {
            data_stack: Stack::new(0, Status::StackOver, Status::StackUnder),
            return_stack: Stack::new(0, Status::RStackOver, Status::RStackUnder),
            walkback_stack: Stack::new(0, Status::RStackOver, Status::RStackUnder),
            heap: Heap::new(1, 0, 0, 1),
            dictionary: Dictionary::new(),
            scanner_buffer: SourceBuffer::new("<atlast>"),
            scanner_state: ScannerState::default(),
            ip: None,
            current_word: None,
            defining_word: None,
            last_created: None,
            status: Status::Normal,
            pending: PendingFlags::default(),
            cached: CachedWords::default(),
            marks: Vec::new(),
            config: Config::default(),
            initialized: false,
            diagnostics: true,
        }
    }

    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.diagnostics = enabled;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Recognize a `\ * <NAME> <value>` prologue line; returns `true` if the line was
    /// consumed as configuration rather than ordinary source. Only effective before the first
    /// successful `init` — once regions are allocated, resizing them out from under a running
    /// interpreter isn't safe.
    fn try_prologue_line(&mut self, line: &str) -> bool {
        if self.initialized {
            return false;
        }

        let trimmed = line.trim_start();
        let rest = match trimmed.strip_prefix('\\') {
            Some(rest) => rest.trim_start(),
            None => return false,
        };
        let rest = match rest.strip_prefix('*') {
            Some(rest) => rest,
            None => return false,
        };

        let mut words = rest.split_whitespace();
        let name = match words.next() {
            Some(name) => name.to_uppercase(),
            None => return false,
        };
        let value: usize = match words.next().and_then(|text| text.parse().ok()) {
            Some(value) => value,
            None => return false,
        };

        match name.as_str() {
            "STACK" => self.config.stack = value,
            "RSTACK" => self.config.rstack = value,
            "HEAP" => self.config.heap_cells = value,
            "TEMPSTRL" => self.config.temp_string_len = value,
            "TEMPSTRN" => self.config.temp_string_count = value,
            _ => return false,
        }

        true
    }

    /// Allocate every region and register the built-in word families. Idempotent: a second call
    /// is a no-op, so a host can call it defensively and `eval` can also call it lazily on first
    /// use without either caller needing to coordinate.
    pub fn init(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.data_stack = Stack::new(self.config.stack, Status::StackOver, Status::StackUnder);
        self.return_stack = Stack::new(self.config.rstack, Status::RStackOver, Status::RStackUnder);
        self.walkback_stack = Stack::new(self.config.rstack, Status::RStackOver, Status::RStackUnder);
        self.heap = Heap::new(
            self.config.heap_cells,
            self.config.heap_bytes,
            self.config.temp_string_count,
            self.config.temp_string_len + 1,
        );
        self.dictionary = Dictionary::new();
        self.initialized = true;

        built_ins::register_base_words(self)?;
        self.dictionary.protect();

        Ok(())
    }

    /// Process tokens from one line until exhausted or `status != NORMAL`.
    pub fn eval(&mut self, line: &str) -> Status {
        if self.try_prologue_line(line) {
            self.status = Status::Normal;
            return self.status;
        }

        if !self.initialized {
            if let Err(error) = self.init() {
                self.status = error.status();
                return self.status;
            }
        }

        self.status = Status::Normal;
        self.scanner_buffer.set_line(line);

        loop {
            let token = match scanner::next_token(&mut self.scanner_buffer, &mut self.scanner_state) {
                Ok(token) => token,
                Err(error) => {
                    self.report_fault(&error);
                    break;
                }
            };

            if matches!(token, Token::Null) {
                break;
            }

            if let Err(error) = self.dispatch_token(token) {
                self.report_fault(&error);
                break;
            }
        }

        self.status
    }

    /// The single place a fault surfacing out of `eval`/`exec`/`evaluate` is finalized: reset
    /// every region (idempotent if a primitive already called `trouble` several frames below),
    /// record the status, and print the diagnostic exactly once regardless of how many layers
    /// below saw this error pass through.
    fn report_fault(&mut self, error: &AtlastError) {
        self.fault_cleanup();
        self.status = error.status();
        if self.diagnostics {
            eprintln!("atlast: {}", error);
        }
    }

    /// Evaluate lines one at a time, unwinding to the mark taken at entry
    /// on the first non-`NORMAL` status.
    pub fn load(&mut self, tag: &str, lines: &[String]) -> Status {
        let entry_mark = self.mark();
        self.scanner_buffer = SourceBuffer::new(tag);
        self.scanner_state = ScannerState::default();

        for line in lines.iter() {
            let status = self.eval(line);
            if status != Status::Normal {
                // `eval` already printed the fault (with its own source location) via
                // `report_fault`; `load` only needs to unwind and propagate the status.
                self.unwind(&entry_mark);
                return status;
            }
        }

        // A `( ...` comment still open at end-of-input never gets the closing `)` it's waiting
        // on — every line has been consumed. Override the otherwise-NORMAL status the same way
        // an unterminated string does.
        if self.scanner_state.comment_pending {
            let error = AtlastError::new(Status::RunComm, self.current_location(), "unterminated comment at end of input".to_string());
            self.report_fault(&error);
            self.unwind(&entry_mark);
            return self.status;
        }

        Status::Normal
    }

    /// Run a word as if executed at top level, saving and restoring `ip`.
    pub fn exec(&mut self, entry: usize) -> Status {
        let saved_ip = self.ip;
        self.ip = None;
        self.status = Status::Normal;

        if let Err(error) = self.exec_word(entry) {
            self.report_fault(&error);
        }

        self.ip = saved_ip;
        self.status
    }

    /// Define a zero-initialized variable word.
    pub fn vardef(&mut self, name: &str) -> Result<usize> {
        let addr = self.heap.alloc_cell(Value::Int(0), self.current_location())?;
        Ok(self.dictionary.enter(name.to_uppercase(), CodeRef::Var, addr))
    }

    /// The address of the body cells following a word's header.
    pub fn body(&self, entry: usize) -> Option<usize> {
        self.dictionary.get(entry).map(|header| header.body_addr)
    }

    /// Case-insensitive name resolution.
    pub fn lookup_name(&mut self, name: &str) -> Option<usize> {
        self.dictionary.lookup(&name.to_uppercase())
    }

    /// Register a contiguous array of `(name, handler)` pairs.
    pub fn primdef(&mut self, table: &[(&str, NativeFn)]) {
        for (name, handler) in table {
            self.add_primitive(name, false, handler.clone());
        }
    }

    pub fn set_break(&mut self) {
        self.request_break();
    }

    fn require_word(&mut self, name: &str) -> Result<usize> {
        self.dictionary
            .lookup(name)
            .ok_or_else(|| self.trouble(Status::Undefined, &format!("{} ?", name)))
    }

    fn dispatch_token(&mut self, token: Token) -> Result<()> {
        match token {
            Token::Null => Ok(()),
            Token::Word(name) => self.dispatch_word(name),
            Token::Int(value) => self.dispatch_number(Value::Int(value)),
            Token::Real(value) => self.dispatch_number(Value::Real(value)),
            Token::Str(bytes) => self.dispatch_string(bytes),
        }
    }

    fn dispatch_word(&mut self, name: String) -> Result<()> {
        if self.pending.forget {
            self.pending.forget = false;
            let rewind_to = self.dictionary.forget(&name, self.current_location())?;
            self.heap.rewind_cells(rewind_to);
            return Ok(());
        }

        if self.compiling() {
            return self.dispatch_word_compile(name);
        }

        if self.pending.tick {
            self.pending.tick = false;
            let index = self.require_word(&name)?;
            return self.push(Value::from(index));
        }

        let index = self.require_word(&name)?;
        self.exec_word(index)
    }

    fn dispatch_word_compile(&mut self, name: String) -> Result<()> {
        if self.pending.compile_tick {
            self.pending.compile_tick = false;
            let index = self.require_word(&name)?;
            return self.compile_literal(Value::from(index));
        }

        if self.pending.bracket_compile {
            self.pending.bracket_compile = false;
            let index = self.require_word(&name)?;
            self.compile_cell(Value::from(index))?;
            return Ok(());
        }

        let index = self.require_word(&name)?;
        let immediate = self.dictionary.get(index).map(|header| header.is_immediate()).unwrap_or(false);

        if immediate {
            self.exec_word(index)
        } else {
            self.compile_cell(Value::from(index)).map(|_| ())
        }
    }

    fn dispatch_number(&mut self, value: Value) -> Result<()> {
        if self.compiling() {
            self.compile_literal(value)
        } else {
            self.push(value)
        }
    }

    fn compile_literal(&mut self, value: Value) -> Result<()> {
        let helper = match value {
            Value::Int(_) => self.cached.lit.expect("(LIT) must be cached at init"),
            Value::Real(_) => self.cached.flit.expect("(FLIT) must be cached at init"),
        };
        self.compile_cell(Value::from(helper))?;
        self.compile_cell(value)?;
        Ok(())
    }

    /// Copy `bytes` into a freshly allocated counted byte-string (length byte, then text) and
    /// return its address — the single representation shared by compiled string literals,
    /// `STRING`-named buffers, and the temporary-buffer pool.
    fn counted_string(&mut self, bytes: &[u8]) -> Vec<u8> {
        let mut counted = Vec::with_capacity(bytes.len() + 1);
        counted.push(bytes.len().min(u8::MAX as usize) as u8);
        counted.extend_from_slice(&bytes[..bytes.len().min(u8::MAX as usize)]);
        counted
    }

    fn dispatch_string(&mut self, bytes: Vec<u8>) -> Result<()> {
        if self.compiling() {
            let counted = self.counted_string(&bytes);
            let addr = self.heap.alloc_bytes(&counted, self.current_location())?;

            let strlit = self.cached.strlit.expect("(STRLIT) must be cached at init");
            self.compile_cell(Value::from(strlit))?;
            self.compile_cell(Value::from(addr))?;

            if let Some(action) = self.pending.string_literal.take() {
                let helper = match action {
                    StringLiteralAction::Print => self.cached.dot_paren.expect("`.(` must be cached at init"),
                    StringLiteralAction::Abort => self.cached.abort_quote.expect("ABORT\" must be cached at init"),
                };
                self.compile_cell(Value::from(helper))?;
            }

            Ok(())
        } else if let Some(action) = self.pending.string_literal.take() {
            match action {
                StringLiteralAction::Print => {
                    use std::io::Write;
                    print!("{}", String::from_utf8_lossy(&bytes));
                    std::io::stdout().flush().ok();
                    Ok(())
                }
                StringLiteralAction::Abort => {
                    let flag = self.pop()?;
                    if flag.is_truthy() {
                        let message = String::from_utf8_lossy(&bytes).to_string();
                        return Err(self.trouble(Status::Application, &message));
                    }
                    Ok(())
                }
            }
        } else {
            let counted = self.counted_string(&bytes);
            let addr = self.heap.next_temp_buffer(&counted, self.current_location())?;
            self.push(Value::from(addr))
        }
    }

    fn invoke(&mut self, index: usize) -> Result<()> {
        let code = match self.dictionary.get(index) {
            Some(header) => header.code.clone(),
            None => return Err(self.trouble(Status::BadPointer, "invalid word reference")),
        };

        match code {
            CodeRef::Primitive(handler) => handler(self),
            CodeRef::Nest => self.do_nest(index),
            CodeRef::Var => {
                let addr = self.dictionary.get(index).expect("checked above").body_addr;
                self.push(Value::from(addr))
            }
            CodeRef::Const => {
                let addr = self.dictionary.get(index).expect("checked above").body_addr;
                let value = self.heap.get(addr, self.current_location())?;
                self.push(value)
            }
            CodeRef::TwoConst => {
                let addr = self.dictionary.get(index).expect("checked above").body_addr;
                let low = self.heap.get(addr, self.current_location())?;
                let high = self.heap.get(addr + 1, self.current_location())?;
                self.push(low)?;
                self.push(high)
            }
            CodeRef::ArraySub { esize, dims } => self.do_array_sub(index, esize, &dims),
            CodeRef::Dodoes => self.do_dodoes(index),
        }
    }

    fn do_nest(&mut self, index: usize) -> Result<()> {
        let ret = ip_to_i64(self.ip);
        self.rpush(ret)?;
        self.walkback_push(index)?;
        let body = self.dictionary.get(index).expect("checked by invoke").body_addr;
        self.ip = Some(body);
        Ok(())
    }

    fn do_dodoes(&mut self, index: usize) -> Result<()> {
        let header = self.dictionary.get(index).expect("checked by invoke");
        let does_cell = header.does_cell.expect("Dodoes word must carry a hidden cell");
        let body_addr = header.body_addr;

        let action_ip = self
            .heap
            .get(does_cell, self.current_location())?
            .as_addr()
            .ok_or_else(|| AtlastError::new(Status::BadPointer, self.current_location(), "corrupt DOES> pointer".to_string()))?;

        self.push(Value::from(body_addr))?;
        let ret = ip_to_i64(self.ip);
        self.rpush(ret)?;
        self.walkback_push(index)?;
        self.ip = Some(action_ip);
        Ok(())
    }

    fn do_array_sub(&mut self, index: usize, esize: i64, dims: &[i64]) -> Result<()> {
        let mut subscripts = Vec::with_capacity(dims.len());
        for _ in 0..dims.len() {
            let value = self.pop()?;
            let sub = value
                .as_int()
                .ok_or_else(|| AtlastError::new(Status::BadPointer, self.current_location(), "array subscript must be an integer".to_string()))?;
            subscripts.push(sub);
        }
        subscripts.reverse();

        let mut offset: i64 = 0;
        for (dim, sub) in dims.iter().zip(subscripts.iter()) {
            if *sub < 0 || *sub >= *dim {
                return Err(self.trouble(Status::BadPointer, "array subscript out of range"));
            }
            offset = offset * dim + sub;
        }

        let body_addr = self.dictionary.get(index).expect("checked by invoke").body_addr as i64;
        self.push(Value::from(body_addr + offset * esize))
    }
}

impl Default for AtlastInterpreter {
    fn default() -> AtlastInterpreter {
        AtlastInterpreter::new()
    }
}

impl InterpreterStack for AtlastInterpreter {
    fn push(&mut self, value: Value) -> Result<()> {
        let location = self.current_location();
        self.data_stack.push(value, location)
    }

    fn pop(&mut self) -> Result<Value> {
        let location = self.current_location();
        self.data_stack.pop(location)
    }

    fn peek(&self) -> Result<Value> {
        self.data_stack.peek(self.current_location())
    }

    fn pick(&self, depth: usize) -> Result<Value> {
        self.data_stack.pick(depth, self.current_location())
    }

    fn set_pick(&mut self, depth: usize, value: Value) -> Result<()> {
        let location = self.current_location();
        self.data_stack.set_pick(depth, value, location)
    }

    fn depth(&self) -> usize {
        self.data_stack.depth()
    }

    fn rpush(&mut self, value: i64) -> Result<()> {
        let location = self.current_location();
        self.return_stack.push(value, location)
    }

    fn rpop(&mut self) -> Result<i64> {
        let location = self.current_location();
        self.return_stack.pop(location)
    }

    fn rpick(&self, depth: usize) -> Result<i64> {
        self.return_stack.pick(depth, self.current_location())
    }

    fn r_set_pick(&mut self, depth: usize, value: i64) -> Result<()> {
        let location = self.current_location();
        self.return_stack.set_pick(depth, value, location)
    }

    fn rdepth(&self) -> usize {
        self.return_stack.depth()
    }

    fn walkback_push(&mut self, index: usize) -> Result<()> {
        let location = self.current_location();
        self.walkback_stack.push(index, location)
    }

    fn walkback_pop(&mut self) -> Result<usize> {
        let location = self.current_location();
        self.walkback_stack.pop(location)
    }

    fn clear_stacks(&mut self) {
        self.data_stack.clear();
        self.return_stack.clear();
        self.walkback_stack.clear();
    }
}

impl CodeManagement for AtlastInterpreter {
    fn here(&self) -> usize {
        self.heap.cell_mark()
    }

    fn compile_cell(&mut self, value: Value) -> Result<usize> {
        let location = self.current_location();
        self.heap.alloc_cell(value, location)
    }

    fn compiling(&self) -> bool {
        self.heap.state() != 0
    }

    fn set_compiling(&mut self, flag: bool) {
        self.heap.set_state(flag)
    }

    fn ip(&self) -> Option<usize> {
        self.ip
    }

    fn set_ip(&mut self, ip: Option<usize>) {
        self.ip = ip;
    }

    fn defining_word(&self) -> Option<usize> {
        self.defining_word
    }

    fn set_defining_word(&mut self, index: Option<usize>) {
        self.defining_word = index;
    }
}

impl Markable for AtlastInterpreter {
    fn mark(&mut self) -> Mark {
        Mark {
            data_stack: self.data_stack.mark(),
            return_stack: self.return_stack.mark(),
            walkback_stack: self.walkback_stack.mark(),
            heap_cells: self.heap.cell_mark(),
            heap_bytes: self.heap.byte_mark(),
            dictionary_head: self.dictionary.head(),
        }
    }

    fn unwind(&mut self, mark: &Mark) {
        self.data_stack.rewind(mark.data_stack);
        self.return_stack.rewind(mark.return_stack);
        self.walkback_stack.rewind(mark.walkback_stack);
        self.heap.rewind_cells(mark.heap_cells);
        self.heap.rewind_bytes(mark.heap_bytes);
        self.dictionary.rewind(mark.dictionary_head);
    }
}

impl Interpreter for AtlastInterpreter {
    fn heap(&self) -> &Heap {
        &self.heap
    }

    fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    fn dictionary_mut(&mut self) -> &mut Dictionary {
        &mut self.dictionary
    }

    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    fn current_location(&self) -> Option<SourceLocation> {
        Some(self.scanner_buffer.location())
    }

    fn current_word(&self) -> Option<usize> {
        self.current_word
    }

    fn set_current_word(&mut self, index: Option<usize>) {
        self.current_word = index;
    }

    // BASE is a real heap cell (see Heap::BASE_CELL), not interpreter-local state, so that `@`/`!`
    // and `'`'s dictionary entry work against it like any other variable.
    fn base(&self) -> u32 {
        self.heap.base().max(2) as u32
    }

    fn set_base(&mut self, base: u32) {
        self.heap.set_base(base as i64);
    }

    fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    fn cached(&self) -> &CachedWords {
        &self.cached
    }

    fn cached_mut(&mut self) -> &mut CachedWords {
        &mut self.cached
    }

    fn pending(&self) -> &PendingFlags {
        &self.pending
    }

    fn pending_mut(&mut self) -> &mut PendingFlags {
        &mut self.pending
    }

    fn request_break(&mut self) {
        self.pending.async_break = true;
    }

    fn exec_word(&mut self, index: usize) -> Result<()> {
        self.current_word = Some(index);
        self.invoke(index)?;

        while let Some(ip) = self.ip {
            if self.pending.async_break {
                self.pending.async_break = false;
                return Err(self.trouble(Status::Break, "break"));
            }

            let cell = self.heap.get(ip, self.current_location())?;
            let next_index = cell
                .as_addr()
                .ok_or_else(|| AtlastError::new(Status::BadPointer, self.current_location(), "threaded code cell is not a word reference".to_string()))?;

            self.ip = Some(ip + 1);
            self.current_word = Some(next_index);
            self.invoke(next_index)?;
        }

        Ok(())
    }

    fn add_primitive(&mut self, name: &str, immediate: bool, handler: NativeFn) -> usize {
        let addr = self.heap.cell_mark();
        let index = self.dictionary.enter(name.to_uppercase(), CodeRef::Primitive(handler), addr);

        if immediate {
            if let Some(header) = self.dictionary.get_mut(index) {
                header.flags |= crate::runtime::data_structures::dictionary::FLAG_IMMEDIATE;
            }
        }

        index
    }

    fn last_created(&self) -> Option<usize> {
        self.last_created
    }

    fn set_last_created(&mut self, index: Option<usize>) {
        self.last_created = index;
    }

    /// `EVALUATE`: re-enter the same scan/dispatch loop `eval` drives, against a private
    /// scanner buffer, so nested source never disturbs the caller's line/column position.
    fn evaluate(&mut self, text: &str) -> Status {
        let saved_buffer = std::mem::replace(&mut self.scanner_buffer, SourceBuffer::new("EVALUATE"));
        let saved_state = std::mem::take(&mut self.scanner_state);
        self.scanner_buffer.set_line(text);

        let mut result = Status::Normal;
        loop {
            let token = match scanner::next_token(&mut self.scanner_buffer, &mut self.scanner_state) {
                Ok(token) => token,
                Err(error) => {
                    self.report_fault(&error);
                    result = self.status;
                    break;
                }
            };

            if matches!(token, Token::Null) {
                break;
            }

            if let Err(error) = self.dispatch_token(token) {
                self.report_fault(&error);
                result = self.status;
                break;
            }
        }

        // Unlike `eval`'s per-line scanner buffer, `EVALUATE` hands over one bounded string with
        // no next call to continue a `( ...` comment into — if it's still open here, it never
        // gets the closing `)` it's waiting on.
        if result == Status::Normal && self.scanner_state.comment_pending {
            let error = AtlastError::new(Status::RunComm, self.current_location(), "unterminated comment in EVALUATE text".to_string());
            self.report_fault(&error);
            result = self.status;
        }

        self.scanner_buffer = saved_buffer;
        self.scanner_state = saved_state;
        self.status = result;
        result
    }

    /// `MARK`: push a snapshot onto a side table and hand back its index as the handle a
    /// script holds onto until `UNWIND`.
    fn mark_push(&mut self) -> usize {
        let snapshot = self.mark();
        self.marks.push(snapshot);
        self.marks.len() - 1
    }

    /// `UNWIND handle`: restore the snapshot at `handle` and drop it, along with any mark
    /// taken after it (a script that unwinds to an older mark necessarily invalidates newer ones).
    fn mark_unwind(&mut self, handle: usize) -> Result<()> {
        if handle >= self.marks.len() {
            return Err(self.trouble(Status::BadPointer, "no such mark"));
        }

        let snapshot = self.marks[handle];
        self.marks.truncate(handle);
        self.unwind(&snapshot);
        Ok(())
    }

    fn parse_name(&mut self) -> Result<String> {
        match scanner::next_token(&mut self.scanner_buffer, &mut self.scanner_state)? {
            Token::Word(name) => Ok(name),
            _ => Err(self.trouble(Status::NotInDef, "expected a name")),
        }
    }
}

pub(crate) fn decode_ip(value: i64) -> Option<usize> {
    i64_to_ip(value)
}
