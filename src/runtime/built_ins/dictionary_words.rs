use crate::runtime::built_ins::{immediate, native, pop_string};
use crate::runtime::data_structures::dictionary::CodeRef;
use crate::runtime::data_structures::heap::Heap;
use crate::runtime::data_structures::value::Value;
use crate::runtime::interpreter::{CodeManagement, Interpreter, InterpreterStack};

pub fn register(interp: &mut dyn Interpreter) {
    // `BASE` is a plain `Var` word pointing at the heap's reserved base cell, so the generic
    // `@`/`!` primitives read and write it exactly like any script-defined variable.
    interp.dictionary_mut().enter("BASE".to_string(), CodeRef::Var, Heap::BASE_CELL);

    native(interp, "DECIMAL", |interp| {
        interp.set_base(10);
        Ok(())
    });

    native(interp, "HEX", |interp| {
        interp.set_base(16);
        Ok(())
    });

    // `'` resolves the *next* word token to its dictionary index. It does not require that word
    // to share `'`'s own line: the pending flag it sets is consumed by whichever `Token::Word`
    // `dispatch_word` sees next, even if that token is scanned on a later call to `eval`.
    native(interp, "'", |interp| {
        interp.pending_mut().tick = true;
        Ok(())
    });

    // `[']` is `'`'s compile-time twin: used inside a definition, it compiles the *next* word's
    // index in as a literal rather than pushing it immediately (the `compile_tick` row of
    // `dispatch_word_compile`).
    immediate(interp, "[']", |interp| {
        interp.pending_mut().compile_tick = true;
        Ok(())
    });

    // `[COMPILE]` forces the compiler to compile a reference to the *next* word even if that word
    // is itself immediate — the escape hatch for building a new immediate word out of an existing
    // one.
    immediate(interp, "[COMPILE]", |interp| {
        interp.pending_mut().bracket_compile = true;
        Ok(())
    });

    // `[` drops out of compiling state for the remainder of a definition (so the words between
    // `[` and `]` run immediately, typically to compute a literal); `]` resumes it. Neither
    // touches `defining_word`, since the enclosing `:`/`;` pair still owns the definition.
    immediate(interp, "[", |interp| {
        interp.set_compiling(false);
        Ok(())
    });

    native(interp, "]", |interp| {
        interp.set_compiling(true);
        Ok(())
    });

    // `FIND` ( str-addr -- index flag ): look up a counted string's text in the dictionary.
    // `flag` is a three-way sentinel, not a plain boolean: `1` for a found immediate word, `-1`
    // for a found non-immediate word, `0` for not found — the distinction `[COMPILE]` and the
    // compiler's own immediate-word dispatch depend on. Pushes `-1` for `index` when the name
    // isn't found, since `0` is itself a legitimate dictionary index (the first word ever
    // entered) and can't double as a sentinel.
    native(interp, "FIND", |interp| {
        let name = pop_string(interp)?.to_uppercase();
        match interp.dictionary_mut().lookup(&name) {
            Some(index) => {
                let immediate = interp.dictionary().get(index).map(|header| header.is_immediate()).unwrap_or(false);
                interp.push(Value::from(index))?;
                interp.push(Value::Int(if immediate { 1 } else { -1 }))
            }
            None => {
                interp.push(Value::Int(-1))?;
                interp.push(Value::Int(0))
            }
        }
    });

    // `WORDS`: list every live (non-hidden, non-forgotten) dictionary entry, most recently
    // defined first, the order `lookup` itself searches in.
    native(interp, "WORDS", |interp| {
        use std::io::Write;
        let names = interp.dictionary().live_names();
        let mut stdout = std::io::stdout();
        for name in names {
            let _ = write!(stdout, "{} ", name);
        }
        let _ = writeln!(stdout);
        Ok(())
    });
}
