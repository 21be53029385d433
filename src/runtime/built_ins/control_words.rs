use crate::runtime::built_ins::{immediate, native, pop_addr, pop_int};
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::{Result, Status};
use crate::runtime::interpreter::{i64_to_ip, Interpreter};

/// Read the operand cell `ip` currently points at and advance past it — the shared shape behind
/// `(LIT)`, `(FLIT)`, and `(STRLIT)`. Since a real occupies one cell just like an integer, all
/// three boil down to the same thing: read one cell, push it, move on.
fn fetch_inline_operand(interp: &mut dyn Interpreter, who: &str) -> Result<Value> {
    let addr = interp
        .ip()
        .ok_or_else(|| interp.trouble(Status::BadPointer, &format!("{} outside a compiled body", who)))?;
    let value = interp.heap().get(addr, interp.current_location())?;
    interp.set_ip(Some(addr + 1));
    Ok(value)
}

/// Read the signed IP-relative offset cell at `ip` and return the address it targets. The offset
/// is added to the address of the offset cell itself, since the dispatch loop has already
/// advanced `ip` to point there before invoking the branch primitive.
fn branch_target(interp: &mut dyn Interpreter) -> Result<(usize, usize)> {
    let offset_addr = interp
        .ip()
        .ok_or_else(|| interp.trouble(Status::BadPointer, "branch outside a compiled body"))?;
    let offset = interp
        .heap()
        .get(offset_addr, interp.current_location())?
        .as_int()
        .ok_or_else(|| interp.trouble(Status::BadPointer, "branch offset is not an integer"))?;
    let target = (offset_addr as i64 + offset) as usize;
    Ok((offset_addr, target))
}

/// Backpatch the offset cell at `offset_addr` so that it carries `target` as an IP-relative
/// offset: `target == offset_addr + offset`.
fn patch_offset(interp: &mut dyn Interpreter, offset_addr: usize, target: usize) -> Result<()> {
    let offset = target as i64 - offset_addr as i64;
    let location = interp.current_location();
    interp.heap_mut().set(offset_addr, Value::Int(offset), location)
}

/// Does the loop counter cross `limit` when stepping from `old` to `new` by a (possibly negative)
/// `increment`? Ascending loops cross when `old` was still short of `limit` and `new` reaches or
/// passes it; descending loops cross the mirror image.
fn crosses_limit(old: i64, new: i64, limit: i64, increment: i64) -> bool {
    if increment >= 0 {
        old < limit && new >= limit
    } else {
        old >= limit && new < limit
    }
}

/// Pop the three-cell loop-control triple (index, limit, exit address) `(XDO)`/`(X?DO)` pushed,
/// in the order `I`/`J` read them back (index on top of the return stack).
fn pop_loop_triple(interp: &mut dyn Interpreter) -> Result<(i64, i64, i64)> {
    let index = interp.rpop()?;
    let limit = interp.rpop()?;
    let exit_addr = interp.rpop()?;
    Ok((index, limit, exit_addr))
}

pub fn register(interp: &mut dyn Interpreter) {
    native(interp, "EXIT", |interp| {
        let ret = interp.rpop()?;
        interp.walkback_pop()?;
        interp.set_ip(i64_to_ip(ret));
        Ok(())
    });

    native(interp, "(LIT)", |interp| {
        let value = fetch_inline_operand(interp, "(LIT)")?;
        interp.push(value)
    });

    native(interp, "(FLIT)", |interp| {
        let value = fetch_inline_operand(interp, "(FLIT)")?;
        interp.push(value)
    });

    native(interp, "(STRLIT)", |interp| {
        let value = fetch_inline_operand(interp, "(STRLIT)")?;
        interp.push(value)
    });

    native(interp, "BRANCH", |interp| {
        let (_, target) = branch_target(interp)?;
        interp.set_ip(Some(target));
        Ok(())
    });

    native(interp, "?BRANCH", |interp| {
        let flag = pop_int(interp)?;
        if flag == 0 {
            let (_, target) = branch_target(interp)?;
            interp.set_ip(Some(target));
        } else {
            let offset_addr = interp.ip().expect("checked by branch_target convention");
            interp.set_ip(Some(offset_addr + 1));
        }
        Ok(())
    });

    native(interp, "(XDO)", |interp| {
        let leave_addr = interp
            .ip()
            .ok_or_else(|| interp.trouble(Status::BadPointer, "(XDO) outside a compiled body"))?;
        let exit_target = interp.heap().get(leave_addr, interp.current_location())?.as_int().unwrap_or(-1);

        let index = pop_int(interp)?;
        let limit = pop_int(interp)?;
        interp.rpush(exit_target)?;
        interp.rpush(limit)?;
        interp.rpush(index)?;
        interp.set_ip(Some(leave_addr + 1));
        Ok(())
    });

    native(interp, "(X?DO)", |interp| {
        let leave_addr = interp
            .ip()
            .ok_or_else(|| interp.trouble(Status::BadPointer, "(X?DO) outside a compiled body"))?;
        let exit_target = interp.heap().get(leave_addr, interp.current_location())?.as_int().unwrap_or(-1);

        let index = pop_int(interp)?;
        let limit = pop_int(interp)?;

        if limit == index {
            interp.set_ip(i64_to_ip(exit_target));
        } else {
            interp.rpush(exit_target)?;
            interp.rpush(limit)?;
            interp.rpush(index)?;
            interp.set_ip(Some(leave_addr + 1));
        }
        Ok(())
    });

    native(interp, "(XLOOP)", |interp| {
        let offset_addr = interp
            .ip()
            .ok_or_else(|| interp.trouble(Status::BadPointer, "(XLOOP) outside a compiled body"))?;
        let index = interp.rpick(0)?;
        let limit = interp.rpick(1)?;
        let next = index.wrapping_add(1);

        if next == limit {
            pop_loop_triple(interp)?;
            interp.set_ip(Some(offset_addr + 1));
        } else {
            interp.r_set_pick(0, next)?;
            let (_, target) = branch_target(interp)?;
            interp.set_ip(Some(target));
        }
        Ok(())
    });

    native(interp, "(+XLOOP)", |interp| {
        let offset_addr = interp
            .ip()
            .ok_or_else(|| interp.trouble(Status::BadPointer, "(+XLOOP) outside a compiled body"))?;
        let increment = pop_int(interp)?;
        let index = interp.rpick(0)?;
        let limit = interp.rpick(1)?;
        let next = index.wrapping_add(increment);

        if crosses_limit(index, next, limit, increment) {
            pop_loop_triple(interp)?;
            interp.set_ip(Some(offset_addr + 1));
        } else {
            interp.r_set_pick(0, next)?;
            let (_, target) = branch_target(interp)?;
            interp.set_ip(Some(target));
        }
        Ok(())
    });

    native(interp, "LEAVE", |interp| {
        let (_, _, exit_addr) = pop_loop_triple(interp)?;
        interp.set_ip(i64_to_ip(exit_addr));
        Ok(())
    });

    native(interp, "I", |interp| {
        let index = interp.rpick(0)?;
        interp.push(Value::Int(index))
    });

    native(interp, "J", |interp| {
        let index = interp.rpick(3)?;
        interp.push(Value::Int(index))
    });

    immediate(interp, "RECURSE", |interp| {
        let index = interp
            .defining_word()
            .ok_or_else(|| interp.trouble(Status::NotInDef, "RECURSE outside a definition"))?;
        interp.compile_cell(Value::from(index)).map(|_| ())
    });

    immediate(interp, "IF", |interp| {
        let qbranch = interp.cached().qbranch.expect("?BRANCH must be cached at init");
        interp.compile_cell(Value::from(qbranch))?;
        let patch_addr = interp.compile_cell(Value::Int(0))?;
        interp.push(Value::from(patch_addr))
    });

    immediate(interp, "ELSE", |interp| {
        let branch = interp.cached().branch.expect("BRANCH must be cached at init");
        interp.compile_cell(Value::from(branch))?;
        let new_patch = interp.compile_cell(Value::Int(0))?;

        let if_patch = pop_addr(interp)?;
        let here = interp.here();
        patch_offset(interp, if_patch, here)?;

        interp.push(Value::from(new_patch))
    });

    immediate(interp, "THEN", |interp| {
        let patch_addr = pop_addr(interp)?;
        let here = interp.here();
        patch_offset(interp, patch_addr, here)
    });

    immediate(interp, "BEGIN", |interp| {
        let here = interp.here();
        interp.push(Value::from(here))
    });

    immediate(interp, "UNTIL", |interp| {
        let loop_start = pop_addr(interp)?;
        let qbranch = interp.cached().qbranch.expect("?BRANCH must be cached at init");
        interp.compile_cell(Value::from(qbranch))?;
        let offset_addr = interp.compile_cell(Value::Int(0))?;
        patch_offset(interp, offset_addr, loop_start)
    });

    immediate(interp, "AGAIN", |interp| {
        let loop_start = pop_addr(interp)?;
        let branch = interp.cached().branch.expect("BRANCH must be cached at init");
        interp.compile_cell(Value::from(branch))?;
        let offset_addr = interp.compile_cell(Value::Int(0))?;
        patch_offset(interp, offset_addr, loop_start)
    });

    immediate(interp, "WHILE", |interp| {
        let qbranch = interp.cached().qbranch.expect("?BRANCH must be cached at init");
        interp.compile_cell(Value::from(qbranch))?;
        let patch_addr = interp.compile_cell(Value::Int(0))?;
        interp.push(Value::from(patch_addr))
    });

    immediate(interp, "REPEAT", |interp| {
        let patch_addr = pop_addr(interp)?;
        let loop_start = pop_addr(interp)?;

        let branch = interp.cached().branch.expect("BRANCH must be cached at init");
        interp.compile_cell(Value::from(branch))?;
        let offset_addr = interp.compile_cell(Value::Int(0))?;
        patch_offset(interp, offset_addr, loop_start)?;

        let here = interp.here();
        patch_offset(interp, patch_addr, here)
    });

    immediate(interp, "DO", |interp| {
        let xdo = interp.cached().xdo.expect("(XDO) must be cached at init");
        interp.compile_cell(Value::from(xdo))?;
        let leave_addr = interp.compile_cell(Value::Int(-1))?;
        let loop_start = interp.here();
        interp.push(Value::from(leave_addr))?;
        interp.push(Value::from(loop_start))
    });

    immediate(interp, "?DO", |interp| {
        let xqdo = interp.cached().xqdo.expect("(X?DO) must be cached at init");
        interp.compile_cell(Value::from(xqdo))?;
        let leave_addr = interp.compile_cell(Value::Int(-1))?;
        let loop_start = interp.here();
        interp.push(Value::from(leave_addr))?;
        interp.push(Value::from(loop_start))
    });

    immediate(interp, "LOOP", |interp| {
        let loop_start = pop_addr(interp)?;
        let leave_addr = pop_addr(interp)?;

        let xloop = interp.cached().xloop.expect("(XLOOP) must be cached at init");
        interp.compile_cell(Value::from(xloop))?;
        let offset_addr = interp.compile_cell(Value::Int(0))?;
        patch_offset(interp, offset_addr, loop_start)?;

        let here = interp.here();
        let location = interp.current_location();
        interp.heap_mut().set(leave_addr, Value::Int(here as i64), location)
    });

    immediate(interp, "+LOOP", |interp| {
        let loop_start = pop_addr(interp)?;
        let leave_addr = pop_addr(interp)?;

        let xplusloop = interp.cached().xplusloop.expect("(+XLOOP) must be cached at init");
        interp.compile_cell(Value::from(xplusloop))?;
        let offset_addr = interp.compile_cell(Value::Int(0))?;
        patch_offset(interp, offset_addr, loop_start)?;

        let here = interp.here();
        let location = interp.current_location();
        interp.heap_mut().set(leave_addr, Value::Int(here as i64), location)
    });
}
