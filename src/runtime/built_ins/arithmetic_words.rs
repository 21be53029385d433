use crate::runtime::built_ins::{native, pop_int, pop_real};
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::Status;
use crate::runtime::interpreter::Interpreter;

pub fn register(interp: &mut dyn Interpreter) {
    native(interp, "+", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_add(b)))
    });

    native(interp, "-", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_sub(b)))
    });

    native(interp, "*", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_mul(b)))
    });

    native(interp, "/", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        if b == 0 {
            return Err(interp.trouble(Status::DivZero, "division by zero"));
        }
        interp.push(Value::Int(a / b))
    });

    native(interp, "MOD", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        if b == 0 {
            return Err(interp.trouble(Status::DivZero, "division by zero"));
        }
        interp.push(Value::Int(a % b))
    });

    native(interp, "/MOD", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        if b == 0 {
            return Err(interp.trouble(Status::DivZero, "division by zero"));
        }
        interp.push(Value::Int(a % b))?;
        interp.push(Value::Int(a / b))
    });

    native(interp, "MIN", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.min(b)))
    });

    native(interp, "MAX", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.max(b)))
    });

    native(interp, "NEGATE", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_neg()))
    });

    native(interp, "ABS", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_abs()))
    });

    native(interp, "1+", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_add(1)))
    });

    native(interp, "1-", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_sub(1)))
    });

    native(interp, "2+", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_add(2)))
    });

    native(interp, "2-", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_sub(2)))
    });

    native(interp, "2*", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Int(a.wrapping_mul(2)))
    });

    native(interp, "2/", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Int(a / 2))
    });

    // value nbits -- value; negative nbits shifts right (logical), reinterpreting the cell as
    // unsigned before shifting. A shift count at or past the cell width just shifts everything out
    // rather than panicking.
    native(interp, "SHIFT", |interp| {
        let bits = pop_int(interp)?;
        let value = pop_int(interp)?;
        let shifted = if bits < 0 {
            (value as u64).checked_shr(bits.unsigned_abs() as u32).unwrap_or(0) as i64
        } else {
            (value as u64).checked_shl(bits as u32).unwrap_or(0) as i64
        };
        interp.push(Value::Int(shifted))
    });

    native(interp, "F+", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        interp.push(Value::Real(a + b))
    });

    native(interp, "F-", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        interp.push(Value::Real(a - b))
    });

    native(interp, "F*", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        interp.push(Value::Real(a * b))
    });

    native(interp, "F/", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        if b == 0.0 {
            return Err(interp.trouble(Status::DivZero, "division by zero"));
        }
        interp.push(Value::Real(a / b))
    });

    native(interp, "FMIN", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        interp.push(Value::Real(a.min(b)))
    });

    native(interp, "FMAX", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        interp.push(Value::Real(a.max(b)))
    });

    native(interp, "FNEGATE", |interp| {
        let a = pop_real(interp)?;
        interp.push(Value::Real(-a))
    });

    native(interp, "FABS", |interp| {
        let a = pop_real(interp)?;
        interp.push(Value::Real(a.abs()))
    });

    native(interp, "F.", |interp| {
        use std::io::Write;
        let a = pop_real(interp)?;
        print!("{} ", a);
        std::io::stdout().flush().ok();
        Ok(())
    });

    // n -- r; since a real occupies exactly one stack cell here, this is a plain retag rather than
    // a multi-cell stack reshuffle.
    native(interp, "FLOAT", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Real(a as f64))
    });

    native(interp, "FIX", |interp| {
        let a = pop_real(interp)?;
        interp.push(Value::Int(a as i64))
    });
}
