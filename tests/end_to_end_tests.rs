use atlast::runtime::error::Status;
use atlast::runtime::interpreter::atlast_interpreter::AtlastInterpreter;
use atlast::runtime::interpreter::{Interpreter, InterpreterStack};

/// Drain the data stack bottom-to-top as plain integers, the shape every scenario below asserts
/// against.
fn stack_contents(interp: &AtlastInterpreter) -> Vec<i64> {
    (0..interp.depth()).rev().map(|depth| interp.pick(depth).unwrap().as_int().unwrap()).collect()
}

/// Feed `lines` through `eval` one at a time, stopping early on the first non-`NORMAL` status.
fn run(lines: &[&str]) -> (AtlastInterpreter, Status) {
    let mut interp = AtlastInterpreter::new();
    let mut status = Status::Normal;
    for line in lines {
        status = interp.eval(line);
        if status != Status::Normal {
            break;
        }
    }
    (interp, status)
}

#[test]
fn add_and_print_leaves_stack_empty() {
    let (interp, status) = run(&["1 2 + ."]);
    assert_eq!(status, Status::Normal);
    assert_eq!(stack_contents(&interp), Vec::<i64>::new());
}

#[test]
fn colon_definition_squares_its_argument() {
    let (interp, status) = run(&[": SQ DUP * ;", "7 SQ"]);
    assert_eq!(status, Status::Normal);
    assert_eq!(stack_contents(&interp), vec![49]);
}

#[test]
fn recursive_definition_computes_factorial() {
    let (interp, status) = run(&[": FACT DUP 1 > IF DUP 1- RECURSE * THEN ;", "5 FACT"]);
    assert_eq!(status, Status::Normal);
    assert_eq!(stack_contents(&interp), vec![120]);
}

#[test]
fn counted_do_loop_pushes_each_index() {
    let (interp, status) = run(&[": T 10 0 DO I LOOP ;", "T"]);
    assert_eq!(status, Status::Normal);
    assert_eq!(stack_contents(&interp), vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn division_by_zero_faults_and_clears_the_stack() {
    let (interp, status) = run(&[": T 5 0 / ;", "T"]);
    assert_eq!(status, Status::DivZero);
    assert_eq!(stack_contents(&interp), Vec::<i64>::new());
}

#[test]
fn create_cells_allot_array_round_trips_through_store_and_fetch() {
    let (interp, status) = run(&["CREATE ARR 3 CELLS ALLOT", "42 ARR !", "ARR @"]);
    assert_eq!(status, Status::Normal);
    assert_eq!(stack_contents(&interp), vec![42]);
}

#[test]
fn prologue_line_resizes_the_data_stack_before_first_init() {
    let (interp, status) = run(&["\\ * STACK 5", "1 2 3 4 5"]);
    assert_eq!(status, Status::Normal);
    assert_eq!(interp.depth(), 5);
}

#[test]
fn prologue_sized_stack_still_overflows_past_its_new_capacity() {
    let (_interp, status) = run(&["\\ * STACK 5", "1 2 3 4 5 6"]);
    assert_eq!(status, Status::StackOver);
}

#[test]
fn if_else_then_selects_the_untaken_branch() {
    let (interp, status) = run(&[": SIGN DUP 0 < IF DROP -1 ELSE 0 > IF 1 ELSE 0 THEN THEN ;", "-5 SIGN", "0 SIGN", "5 SIGN"]);
    assert_eq!(status, Status::Normal);
    assert_eq!(stack_contents(&interp), vec![-1, 0, 1]);
}

#[test]
fn variable_default_is_zero_until_stored() {
    let (interp, status) = run(&["VARIABLE V", "V @"]);
    assert_eq!(status, Status::Normal);
    assert_eq!(stack_contents(&interp), vec![0]);
}

#[test]
fn does_defined_word_runs_its_attached_action() {
    let (interp, status) = run(&[": DOUBLER CREATE , DOES> @ 2 * ;", "21 DOUBLER TWICE", "TWICE"]);
    assert_eq!(status, Status::Normal);
    assert_eq!(stack_contents(&interp), vec![42]);
}

#[test]
fn string_buffer_is_written_and_appended_in_place() {
    let (mut interp, status) = run(&[
        "32 STRING GREETING",
        "\"Hello\" GREETING S!",
        "\", world\" GREETING S+",
        "GREETING",
    ]);
    assert_eq!(status, Status::Normal);

    let addr = interp.pop().unwrap().as_addr().unwrap();
    let bytes = interp.heap().counted_bytes(addr, None).unwrap().to_vec();
    assert_eq!(bytes, b"Hello, world");
}

#[test]
fn forget_removes_a_word_and_rewinds_the_heap() {
    let (mut interp, status) = run(&["VARIABLE V", "123 V !"]);
    assert_eq!(status, Status::Normal);
    let before = interp.eval("HERE");
    assert_eq!(before, Status::Normal);

    let status = interp.eval("FORGET V");
    assert_eq!(status, Status::Normal);

    let status = interp.eval("V");
    assert_eq!(status, Status::Undefined);
}
