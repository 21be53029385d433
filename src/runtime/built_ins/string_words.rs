use crate::runtime::built_ins::{immediate, native, pop_addr, pop_int, pop_string, push_bool};
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::Status;
use crate::runtime::interpreter::{CodeManagement, Interpreter, InterpreterStack, StringLiteralAction};

/// Render `n` in `base` (clamped to the `2..=36` range `char::from_digit` accepts), sign and all.
fn format_signed_radix(n: i64, base: u32) -> String {
    let base = base.clamp(2, 36);
    if n == 0 {
        return "0".to_string();
    }

    let negative = n < 0;
    let mut magnitude = n.unsigned_abs();
    let mut digits = Vec::new();
    while magnitude > 0 {
        digits.push(std::char::from_digit((magnitude % base as u64) as u32, base).expect("digit in range"));
        magnitude /= base as u64;
    }
    if negative {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

/// `U.`'s unsigned cousin: the same cell reinterpreted as `u64` before rendering, the way the
/// source's `udot` reads the raw machine word without a sign-extending cast.
fn format_unsigned_radix(n: u64, base: u32) -> String {
    let base = base.clamp(2, 36);
    if n == 0 {
        return "0".to_string();
    }

    let mut magnitude = n;
    let mut digits = Vec::new();
    while magnitude > 0 {
        digits.push(std::char::from_digit((magnitude % base as u64) as u32, base).expect("digit in range"));
        magnitude /= base as u64;
    }
    digits.iter().rev().collect()
}

pub fn register(interp: &mut dyn Interpreter) {
    native(interp, ".", |interp| {
        use std::io::Write;
        let value = pop_int(interp)?;
        let base = interp.base();
        print!("{} ", format_signed_radix(value, base));
        std::io::stdout().flush().ok();
        Ok(())
    });

    native(interp, "U.", |interp| {
        use std::io::Write;
        let value = pop_int(interp)?;
        let base = interp.base();
        print!("{} ", format_unsigned_radix(value as u64, base));
        std::io::stdout().flush().ok();
        Ok(())
    });

    native(interp, "CR", |interp| {
        use std::io::Write;
        println!();
        std::io::stdout().flush().ok();
        let _ = interp;
        Ok(())
    });

    native(interp, "SPACE", |interp| {
        use std::io::Write;
        print!(" ");
        std::io::stdout().flush().ok();
        let _ = interp;
        Ok(())
    });

    native(interp, "EMIT", |interp| {
        use std::io::Write;
        let code = pop_int(interp)?;
        let ch = u32::try_from(code).ok().and_then(char::from_u32).unwrap_or('?');
        print!("{}", ch);
        std::io::stdout().flush().ok();
        Ok(())
    });

    // ( addr -- c-addr u ): split a counted string into its text address and length, the shape
    // every loop over a string's bytes is built from.
    native(interp, "COUNT", |interp| {
        let addr = pop_addr(interp)?;
        let location = interp.current_location();
        let len = interp.heap().counted_bytes(addr, location)?.len();
        interp.push(Value::from(addr + 1))?;
        interp.push(Value::from(len))
    });

    native(interp, "TYPE", |interp| {
        use std::io::Write;
        let addr = pop_addr(interp)?;
        let location = interp.current_location();
        let bytes = interp.heap().counted_bytes(addr, location)?.to_vec();
        print!("{}", String::from_utf8_lossy(&bytes));
        std::io::stdout().flush().ok();
        Ok(())
    });

    // The runtime half of `."`'s compiled form: `."` itself only arms `pending.string_literal`;
    // the compiler then lays this word down right after `(STRLIT)` so the printed text is whatever
    // address `(STRLIT)` just pushed.
    native(interp, ".(", |interp| {
        use std::io::Write;
        let addr = pop_addr(interp)?;
        let location = interp.current_location();
        let bytes = interp.heap().counted_bytes(addr, location)?.to_vec();
        print!("{}", String::from_utf8_lossy(&bytes));
        std::io::stdout().flush().ok();
        Ok(())
    });

    // `."` only sets up the pending flag; `dispatch_string` does the actual printing (interpret
    // mode) or compiles `(STRLIT)` + `.(` (compile mode) once the following string token arrives.
    immediate(interp, ".\"", |interp| {
        interp.pending_mut().string_literal = Some(StringLiteralAction::Print);
        Ok(())
    });

    // `ABORT"` plays both roles its single cached dictionary entry is shared between: as a
    // freshly scanned token (`interp.ip()` is `None`, no
    // compiled body is currently running) it only arms the pending flag, same as `."`. As the
    // helper the compiler wires in right after `(STRLIT)` (`interp.ip()` is `Some`, we're mid
    // dispatch through a compiled body) it pops the flag `(STRLIT)`'s caller pushed earlier and the
    // address `(STRLIT)` itself just pushed, and aborts with that text if the flag is true. A
    // definition that calls `EVALUATE` on text containing `ABORT"` while already running inside a
    // compiled body is the one case this doesn't disambiguate correctly; not exercised by anything
    // this crate ships.
    immediate(interp, "ABORT\"", |interp| {
        if interp.ip().is_none() {
            interp.pending_mut().string_literal = Some(StringLiteralAction::Abort);
            return Ok(());
        }

        let addr = pop_addr(interp)?;
        let flag = interp.pop()?;
        if flag.is_truthy() {
            let location = interp.current_location();
            let bytes = interp.heap().counted_bytes(addr, location)?.to_vec();
            let message = String::from_utf8_lossy(&bytes).to_string();
            return Err(interp.trouble(Status::Application, &message));
        }
        Ok(())
    });

    // `S!` ( src-addr dest-addr -- ): overwrite the counted string at `dest-addr` (a `STRING`
    // buffer) with the text of the counted string at `src-addr`, truncating to whatever room
    // `dest-addr` actually has. Grounded on the original's `P_strcpy`, aliased `S!` in its word
    // table; adapted from `strcpy` over null-terminated C strings to this crate's uniform
    // length-prefixed representation.
    native(interp, "S!", |interp| {
        let dest = pop_addr(interp)?;
        let src = pop_addr(interp)?;
        let location = interp.current_location();
        let text = interp.heap().counted_bytes(src, location.clone())?.to_vec();
        let cap = interp.heap().counted_space(dest, location.clone())?;
        interp.heap_mut().write_counted(dest, cap, &text, location)
    });

    // `S+` ( src-addr dest-addr -- ): append the counted string at `src-addr` to the one already
    // at `dest-addr`, truncating to the destination's room. Grounded on `P_strcat`, aliased `S+`.
    native(interp, "S+", |interp| {
        let dest = pop_addr(interp)?;
        let src = pop_addr(interp)?;
        let location = interp.current_location();
        let suffix = interp.heap().counted_bytes(src, location.clone())?.to_vec();
        let mut text = interp.heap().counted_bytes(dest, location.clone())?.to_vec();
        text.extend_from_slice(&suffix);
        let cap = interp.heap().counted_space(dest, location.clone())?;
        interp.heap_mut().write_counted(dest, cap, &text, location)
    });

    // `EVALUATE`: run a counted string as a nested line of source. ATLAST's `Status`
    // carries a diagnostic message alongside its tag, which doesn't fit one stack cell, so the
    // pushed result is the `flag` ANSI Forth's own `EVALUATE` extension wordsets use: true on
    // `NORMAL`, false on anything else. A script that needs the exact status reads it from the
    // error a failing `EVALUATE` would otherwise have raised directly, via `diagnostics`.
    native(interp, "EVALUATE", |interp| {
        let text = pop_string(interp)?;
        let status = interp.evaluate(&text);
        push_bool(interp, status == Status::Normal)
    });
}
