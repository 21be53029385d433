use crate::runtime::built_ins::{native, pop_addr};
use crate::runtime::data_structures::value::Value;
use crate::runtime::interpreter::{Interpreter, InterpreterStack};

pub fn register(interp: &mut dyn Interpreter) {
    // `MARK`: snapshot every region, pushing the handle `UNWIND` later consumes.
    native(interp, "MARK", |interp| {
        let handle = interp.mark_push();
        interp.push(Value::from(handle))
    });

    // `UNWIND`: restore the regions a prior `MARK` snapshotted, discarding that mark and
    // any taken after it.
    native(interp, "UNWIND", |interp| {
        let handle = pop_addr(interp)?;
        interp.mark_unwind(handle)
    });
}
