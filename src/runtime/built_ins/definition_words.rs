use crate::runtime::built_ins::{immediate, native, pop_addr, pop_int};
use crate::runtime::data_structures::dictionary::CodeRef;
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::{Result, Status};
use crate::runtime::interpreter::{i64_to_ip, CodeManagement, Interpreter, InterpreterStack};

/// Print the "not unique" diagnostic for when a defining word shadows a name already in the
/// dictionary. A read-only check (`live_names`, not `lookup`) so it never marks the old entry USED
/// just because a new one is about to shadow it.
fn warn_if_redefined(interp: &mut dyn Interpreter, name: &str) {
    if interp.diagnostics_enabled() && interp.dictionary().live_names().contains(&name) {
        eprintln!("atlast: {} is not unique", name);
    }
}

/// Lay down a fresh word header the shape every defining word shares: a hidden "does" cell
/// reserved immediately below the body (`does_cell == body_addr - 1`, unconditionally, so
/// `dictionary::forget` always rewinds past it whether or not `DOES>` ever fires), then the
/// dictionary entry itself pointing at the body address that follows it. Returns the new entry's
/// index; `last_created` is updated so `DOES>` can find it.
fn create_header(interp: &mut dyn Interpreter, name: String, code: CodeRef) -> Result<usize> {
    let location = interp.current_location();
    let does_cell = interp.heap_mut().alloc_cell(Value::Int(-1), location)?;
    let body_addr = interp.here();

    let index = interp.dictionary_mut().enter(name, code, body_addr);
    if let Some(header) = interp.dictionary_mut().get_mut(index) {
        header.does_cell = Some(does_cell);
    }
    interp.set_last_created(Some(index));
    Ok(index)
}

pub fn register(interp: &mut dyn Interpreter) {
    native(interp, ":", |interp| {
        let name = interp.parse_name()?;
        warn_if_redefined(interp, &name);

        // Provisionally entered as `Var`, not `Nest`: if compilation aborts before `;` rewrites
        // it, the half-built word is never mistaken for a callable definition.
        let body_addr = interp.here();
        let index = interp.dictionary_mut().enter(name, CodeRef::Var, body_addr);
        interp.set_defining_word(Some(index));
        interp.set_compiling(true);
        Ok(())
    });

    immediate(interp, ";", |interp| {
        let exit = interp.cached().exit.expect("EXIT must be cached at init");
        interp.compile_cell(Value::from(exit))?;

        let index = interp
            .defining_word()
            .ok_or_else(|| interp.trouble(Status::NotInDef, "; outside a definition"))?;
        if let Some(header) = interp.dictionary_mut().get_mut(index) {
            header.code = CodeRef::Nest;
        }

        interp.set_compiling(false);
        interp.set_defining_word(None);
        Ok(())
    });

    native(interp, "CREATE", |interp| {
        let name = interp.parse_name()?;
        warn_if_redefined(interp, &name);
        create_header(interp, name, CodeRef::Var)?;
        Ok(())
    });

    native(interp, "DOES>", |interp| {
        let action_ip = interp
            .ip()
            .ok_or_else(|| interp.trouble(Status::NotInDef, "DOES> outside a defining word"))?;
        let target = interp
            .last_created()
            .ok_or_else(|| interp.trouble(Status::NotInDef, "DOES> with nothing CREATEd yet"))?;
        let does_cell = interp
            .dictionary()
            .get(target)
            .and_then(|header| header.does_cell)
            .ok_or_else(|| interp.trouble(Status::BadPointer, "DOES> target carries no hidden cell"))?;

        let location = interp.current_location();
        interp.heap_mut().set(does_cell, Value::from(action_ip), location)?;
        if let Some(header) = interp.dictionary_mut().get_mut(target) {
            header.code = CodeRef::Dodoes;
        }

        // Force an early exit from the currently running defining word: the runtime clause we
        // just captured the address of must not also run now, on behalf of the word being
        // defined rather than the word being created.
        let ret = interp.rpop()?;
        interp.walkback_pop()?;
        interp.set_ip(i64_to_ip(ret));
        Ok(())
    });

    native(interp, "VARIABLE", |interp| {
        let name = interp.parse_name()?;
        warn_if_redefined(interp, &name);
        create_header(interp, name, CodeRef::Var)?;
        let location = interp.current_location();
        interp.heap_mut().alloc_cell(Value::Int(0), location)?;
        Ok(())
    });

    native(interp, "CONSTANT", |interp| {
        let value = interp.pop()?;
        let name = interp.parse_name()?;
        warn_if_redefined(interp, &name);
        create_header(interp, name, CodeRef::Const)?;
        let location = interp.current_location();
        interp.heap_mut().alloc_cell(value, location)?;
        Ok(())
    });

    native(interp, "2CONSTANT", |interp| {
        let high = interp.pop()?;
        let low = interp.pop()?;
        let name = interp.parse_name()?;
        warn_if_redefined(interp, &name);
        create_header(interp, name, CodeRef::TwoConst)?;
        let location = interp.current_location();
        interp.heap_mut().alloc_cell(low, location)?;
        interp.heap_mut().alloc_cell(high, location)?;
        Ok(())
    });

    native(interp, "STRING", |interp| {
        let capacity = pop_int(interp)?.max(0) as usize;
        let name = interp.parse_name()?;
        warn_if_redefined(interp, &name);

        let location = interp.current_location();
        let buffer_addr = interp.heap_mut().alloc_bytes(&vec![0u8; capacity + 1], location)?;

        create_header(interp, name, CodeRef::Const)?;
        interp.heap_mut().alloc_cell(Value::from(buffer_addr), location)?;
        Ok(())
    });

    native(interp, "ARRAY", |interp| {
        let esize = pop_int(interp)?;
        if esize <= 0 {
            return Err(interp.trouble(Status::BadPointer, "bad array element size"));
        }
        let nsubs = pop_int(interp)?;
        if nsubs <= 0 {
            return Err(interp.trouble(Status::BadPointer, "bad array subscript count"));
        }
        let subs = nsubs as usize;

        let mut dims = Vec::with_capacity(subs);
        for _ in 0..subs {
            dims.push(pop_int(interp)?);
        }
        dims.reverse();
        if dims.iter().any(|dim| *dim <= 0) {
            return Err(interp.trouble(Status::BadPointer, "bad array dimension"));
        }

        let total: i64 = esize * dims.iter().product::<i64>();
        let name = interp.parse_name()?;
        warn_if_redefined(interp, &name);

        create_header(interp, name, CodeRef::ArraySub { esize, dims })?;
        let location = interp.current_location();
        interp.heap_mut().alloc_cells(total as usize, Value::Int(0), location)?;
        Ok(())
    });

    native(interp, "FORGET", |interp| {
        interp.pending_mut().forget = true;
        Ok(())
    });

    native(interp, "CELLS", |interp| {
        let count = pop_int(interp)?;
        interp.push(Value::Int(count))
    });

    native(interp, "CELL+", |interp| {
        let addr = pop_int(interp)?;
        interp.push(Value::Int(addr + 1))
    });

    native(interp, "ALLOT", |interp| {
        let count = pop_int(interp)?.max(0) as usize;
        let location = interp.current_location();
        interp.heap_mut().alloc_cells(count, Value::Int(0), location)?;
        Ok(())
    });

    native(interp, "HERE", |interp| {
        let here = interp.here();
        interp.push(Value::from(here))
    });

    native(interp, ",", |interp| {
        let value = interp.pop()?;
        interp.compile_cell(value)?;
        Ok(())
    });

    // This heap has no separate byte arena for word bodies to append into, so `C,` aliases `,`
    // exactly as `C@`/`C!` alias `@`/`!` below.
    native(interp, "C,", |interp| {
        let value = interp.pop()?;
        interp.compile_cell(value)?;
        Ok(())
    });

    native(interp, "@", |interp| {
        let addr = pop_addr(interp)?;
        let location = interp.current_location();
        let value = interp.heap().get(addr, location)?;
        interp.push(value)
    });

    native(interp, "!", |interp| {
        let addr = pop_addr(interp)?;
        let value = interp.pop()?;
        let location = interp.current_location();
        interp.heap_mut().set(addr, value, location)
    });

    // No separate byte-addressed heap for word bodies here, so C@/C! alias @/! rather than
    // reinterpreting a cell as a byte.
    native(interp, "C@", |interp| {
        let addr = pop_addr(interp)?;
        let location = interp.current_location();
        let value = interp.heap().get(addr, location)?;
        interp.push(value)
    });

    native(interp, "C!", |interp| {
        let addr = pop_addr(interp)?;
        let value = interp.pop()?;
        let location = interp.current_location();
        interp.heap_mut().set(addr, value, location)
    });
}
