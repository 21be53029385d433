use std::rc::Rc;

use crate::runtime::data_structures::dictionary::NativeFn;
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::{AtlastError, Result, Status};
use crate::runtime::interpreter::Interpreter;

/// Stack-manipulation words: `DUP`, `SWAP`, `PICK`, `>R`, `.S`, and their double-cell cousins.
mod stack_words;

/// Integer and floating-point arithmetic, `SHIFT`, and number-base control.
mod arithmetic_words;

/// Comparisons and the bitwise/logical operators.
mod compare_logic_words;

/// Threaded-code control flow: the compiled helpers behind `IF`/`BEGIN`/`DO`, and the immediate
/// words that compile them.
mod control_words;

/// The defining words: `:`/`;`, `CREATE`/`DOES>`, `VARIABLE`, `CONSTANT`, `STRING`, `ARRAY`, and
/// the compiler-state words around them.
mod definition_words;

/// Dictionary introspection: `WORDS`, `FIND`, `FORGET`'s counterpart queries.
mod dictionary_words;

/// Counted-string manipulation and console output.
mod string_words;

/// `MARK`/`UNWIND` exposed as Forth-level words, for scripts that want their own transactional
/// checkpoints.
mod mark_words;

/// The host-extension demonstration words: dynamic library loading and calling through `libffi`.
mod host_words;

/// Register every built-in word family, in the order the base dictionary is expected to grow.
pub fn register_base_words(interpreter: &mut dyn Interpreter) -> Result<()> {
    stack_words::register(interpreter);
    arithmetic_words::register(interpreter);
    compare_logic_words::register(interpreter);
    string_words::register(interpreter);
    dictionary_words::register(interpreter);
    mark_words::register(interpreter);
    host_words::register(interpreter);

    // Control and definition words both need access to a handful of helper primitives that must
    // exist in the dictionary (so they have addresses) before anything is compiled against them;
    // registering them here, then caching their addresses, mirrors the source's `INIT()` doing
    // the equivalent two-pass dance by hand.
    control_words::register(interpreter);
    definition_words::register(interpreter);

    cache_helper_words(interpreter)
}

/// Look up and cache the addresses of the internal helper words every compiled definition relies
/// on. Done once, after every primitive exists, so compiling `IF` or a
/// numeric literal never has to re-resolve a name at run time.
fn cache_helper_words(interpreter: &mut dyn Interpreter) -> Result<()> {
    let mut find = |name: &str| -> Result<usize> {
        interpreter
            .dictionary_mut()
            .lookup(name)
            .ok_or_else(|| AtlastError::new(Status::Undefined, None, format!("internal word {} missing", name)))
    };

    let cached = crate::runtime::interpreter::CachedWords {
        exit: Some(find("EXIT")?),
        lit: Some(find("(LIT)")?),
        flit: Some(find("(FLIT)")?),
        strlit: Some(find("(STRLIT)")?),
        dot_paren: Some(find(".(")?),
        branch: Some(find("BRANCH")?),
        qbranch: Some(find("?BRANCH")?),
        xdo: Some(find("(XDO)")?),
        xqdo: Some(find("(X?DO)")?),
        xloop: Some(find("(XLOOP)")?),
        xplusloop: Some(find("(+XLOOP)")?),
        abort_quote: Some(find("ABORT\"")?),
    };

    *interpreter.cached_mut() = cached;
    Ok(())
}

/// Register a non-immediate native word. A thin wrapper over `add_primitive` so word families
/// read as a flat table of `name -> handler` rather than repeating the `Rc::new`/boolean dance.
fn native<F>(interpreter: &mut dyn Interpreter, name: &str, handler: F) -> usize
where
    F: Fn(&mut dyn Interpreter) -> Result<()> + 'static,
{
    interpreter.add_primitive(name, false, Rc::new(handler) as NativeFn)
}

/// Register an immediate native word (runs during compilation instead of being compiled in).
fn immediate<F>(interpreter: &mut dyn Interpreter, name: &str, handler: F) -> usize
where
    F: Fn(&mut dyn Interpreter) -> Result<()> + 'static,
{
    interpreter.add_primitive(name, true, Rc::new(handler) as NativeFn)
}

/// Pop a cell and require it to be an integer, raising `BADPOINTER` otherwise (every primitive
/// that expects a plain number, not a float, funnels through here).
fn pop_int(interp: &mut dyn Interpreter) -> Result<i64> {
    let value = interp.pop()?;
    value.as_int().ok_or_else(|| interp.trouble(Status::BadPointer, "expected an integer"))
}

/// Pop a cell and require it to be a non-negative address.
fn pop_addr(interp: &mut dyn Interpreter) -> Result<usize> {
    let value = interp.pop()?;
    value.as_addr().ok_or_else(|| interp.trouble(Status::BadPointer, "expected an address"))
}

/// Pop a cell as a real, promoting a plain integer the way every `F`-prefixed word is expected to
/// (ATLAST never distinguishes int/float operands at the stack level).
fn pop_real(interp: &mut dyn Interpreter) -> Result<f64> {
    let value = interp.pop()?;
    value.as_real().ok_or_else(|| interp.trouble(Status::BadPointer, "expected a number"))
}

fn push_bool(interp: &mut dyn Interpreter, flag: bool) -> Result<()> {
    interp.push(Value::from(flag))
}

/// Pop an address and decode the counted string found there as owned text (lossy on non-UTF-8,
/// same as `dispatch_string`'s own `."`/`ABORT"` handling). Shared by the words that take a
/// string as a bare heap address: `TYPE`, `FIND`, `EVALUATE`, `LOAD-LIBRARY`.
fn pop_string(interp: &mut dyn Interpreter) -> Result<String> {
    let addr = pop_addr(interp)?;
    let location = interp.current_location();
    let bytes = interp.heap().counted_bytes(addr, location)?.to_vec();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
