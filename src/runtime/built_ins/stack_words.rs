use crate::runtime::built_ins::{native, pop_int};
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::Result;
use crate::runtime::interpreter::Interpreter;

/// `i ROLL`: pull the item `i` cells down and push it on top, shifting everything above it down
/// one cell. `0 ROLL` is a no-op, `1 ROLL` is `SWAP`, `2 ROLL` is `ROT`.
fn roll(interp: &mut dyn Interpreter, depth: usize) -> Result<()> {
    if depth == 0 {
        return Ok(());
    }

    let target = interp.pick(depth)?;
    let mut d = depth;
    while d > 0 {
        let below = interp.pick(d - 1)?;
        interp.set_pick(d, below)?;
        d -= 1;
    }
    interp.set_pick(0, target)
}

pub fn register(interp: &mut dyn Interpreter) {
    native(interp, "DEPTH", |interp| {
        let depth = interp.depth() as i64;
        interp.push(Value::Int(depth))
    });

    native(interp, "CLEAR", |interp| {
        interp.clear_stacks();
        Ok(())
    });

    native(interp, "DUP", |interp| {
        let top = interp.peek()?;
        interp.push(top)
    });

    native(interp, "DROP", |interp| interp.pop().map(|_| ()));

    native(interp, "SWAP", |interp| {
        let top = interp.pop()?;
        let next = interp.pop()?;
        interp.push(top)?;
        interp.push(next)
    });

    native(interp, "OVER", |interp| {
        let under = interp.pick(1)?;
        interp.push(under)
    });

    native(interp, "PICK", |interp| {
        let depth = pop_int(interp)? as usize;
        let value = interp.pick(depth)?;
        interp.push(value)
    });

    native(interp, "ROLL", |interp| {
        let depth = pop_int(interp)? as usize;
        roll(interp, depth)
    });

    native(interp, "ROT", |interp| {
        let top = interp.pop()?;
        let mid = interp.pop()?;
        let bottom = interp.pop()?;
        interp.push(mid)?;
        interp.push(top)?;
        interp.push(bottom)
    });

    native(interp, "-ROT", |interp| {
        let top = interp.pop()?;
        let mid = interp.pop()?;
        let bottom = interp.pop()?;
        interp.push(top)?;
        interp.push(bottom)?;
        interp.push(mid)
    });

    native(interp, "?DUP", |interp| {
        let top = interp.peek()?;
        if top.is_truthy() {
            interp.push(top)?;
        }
        Ok(())
    });

    native(interp, ">R", |interp| {
        let value = pop_int(interp)?;
        interp.rpush(value)
    });

    native(interp, "R>", |interp| {
        let value = interp.rpop()?;
        interp.push(Value::Int(value))
    });

    native(interp, "R@", |interp| {
        let value = interp.rpick(0)?;
        interp.push(Value::Int(value))
    });

    native(interp, "2DUP", |interp| {
        let x2 = interp.pick(0)?;
        let x1 = interp.pick(1)?;
        interp.push(x1)?;
        interp.push(x2)
    });

    native(interp, "2DROP", |interp| {
        interp.pop()?;
        interp.pop()?;
        Ok(())
    });

    native(interp, "2SWAP", |interp| {
        let a = interp.pick(0)?;
        let b = interp.pick(2)?;
        interp.set_pick(0, b)?;
        interp.set_pick(2, a)?;

        let c = interp.pick(1)?;
        let d = interp.pick(3)?;
        interp.set_pick(1, d)?;
        interp.set_pick(3, c)
    });

    native(interp, "2OVER", |interp| {
        let x1 = interp.pick(3)?;
        let x2 = interp.pick(2)?;
        interp.push(x1)?;
        interp.push(x2)
    });

    native(interp, "2ROT", |interp| {
        let old: Vec<Value> = (0..6).map(|d| interp.pick(d)).collect::<Result<_>>()?;
        interp.set_pick(5, old[3])?;
        interp.set_pick(4, old[2])?;
        interp.set_pick(3, old[1])?;
        interp.set_pick(2, old[0])?;
        interp.set_pick(1, old[5])?;
        interp.set_pick(0, old[4])
    });

    native(interp, ".S", |interp| {
        use std::io::Write;
        print!("Stack: ");
        if interp.depth() == 0 {
            print!("Empty.");
        } else {
            for depth in (0..interp.depth()).rev() {
                let value = interp.pick(depth)?;
                print!("{} ", value);
            }
        }
        std::io::stdout().flush().ok();
        Ok(())
    });
}
