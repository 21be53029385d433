use crate::runtime::built_ins::{native, pop_int, pop_real, push_bool};
use crate::runtime::data_structures::value::Value;
use crate::runtime::interpreter::Interpreter;

pub fn register(interp: &mut dyn Interpreter) {
    native(interp, "=", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        push_bool(interp, a == b)
    });

    native(interp, "<>", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        push_bool(interp, a != b)
    });

    native(interp, ">", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        push_bool(interp, a > b)
    });

    native(interp, "<", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        push_bool(interp, a < b)
    });

    native(interp, ">=", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        push_bool(interp, a >= b)
    });

    native(interp, "<=", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        push_bool(interp, a <= b)
    });

    native(interp, "0=", |interp| {
        let a = pop_int(interp)?;
        push_bool(interp, a == 0)
    });

    native(interp, "0<>", |interp| {
        let a = pop_int(interp)?;
        push_bool(interp, a != 0)
    });

    native(interp, "0>", |interp| {
        let a = pop_int(interp)?;
        push_bool(interp, a > 0)
    });

    native(interp, "0<", |interp| {
        let a = pop_int(interp)?;
        push_bool(interp, a < 0)
    });

    native(interp, "AND", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        interp.push(Value::Int(a & b))
    });

    native(interp, "OR", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        interp.push(Value::Int(a | b))
    });

    native(interp, "XOR", |interp| {
        let b = pop_int(interp)?;
        let a = pop_int(interp)?;
        interp.push(Value::Int(a ^ b))
    });

    native(interp, "NOT", |interp| {
        let a = pop_int(interp)?;
        interp.push(Value::Int(!a))
    });

    native(interp, "F=", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        push_bool(interp, a == b)
    });

    native(interp, "F<>", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        push_bool(interp, a != b)
    });

    native(interp, "F>", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        push_bool(interp, a > b)
    });

    native(interp, "F<", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        push_bool(interp, a < b)
    });

    native(interp, "F>=", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        push_bool(interp, a >= b)
    });

    native(interp, "F<=", |interp| {
        let b = pop_real(interp)?;
        let a = pop_real(interp)?;
        push_bool(interp, a <= b)
    });
}
