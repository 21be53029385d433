//! Heap/pointer-validity and mark-unwind invariant tests. Drives `AtlastInterpreter` directly
//! against its library API.

use atlast::runtime::data_structures::mark::Markable;
use atlast::runtime::error::Status;
use atlast::runtime::interpreter::atlast_interpreter::AtlastInterpreter;
use atlast::runtime::interpreter::InterpreterStack;

fn fresh() -> AtlastInterpreter {
    let mut interp = AtlastInterpreter::new();
    interp.init().expect("init should succeed");
    interp
}

#[test]
fn out_of_range_heap_address_is_badpointer() {
    let mut interp = fresh();
    assert_eq!(interp.eval("999999 @"), Status::BadPointer);
}

#[test]
fn here_always_addresses_a_cell_inside_the_valid_window() {
    let mut interp = fresh();
    interp.eval("HERE");
    let here = interp.pop().unwrap().as_addr().unwrap();
    assert!(interp.heap().valid_cell(here.saturating_sub(1)) || here == 0);
}

#[test]
fn mark_unwind_restores_stack_heap_and_dictionary_to_the_snapshot() {
    let mut interp = fresh();

    let before_mark = interp.mark();
    let before_words = interp.dictionary().live_names().len();
    let before_here = interp.eval("HERE");
    assert_eq!(before_here, Status::Normal);
    let here_before = interp.pop().unwrap().as_addr().unwrap();

    assert_eq!(interp.eval("1 2 3 VARIABLE V 999 V !"), Status::Normal);
    assert_ne!(interp.dictionary().live_names().len(), before_words);

    interp.unwind(&before_mark);

    assert_eq!(interp.depth(), 0);
    assert_eq!(interp.dictionary().live_names().len(), before_words);
    assert_eq!(interp.eval("HERE"), Status::Normal);
    let here_after = interp.pop().unwrap().as_addr().unwrap();
    assert_eq!(here_before, here_after);
}

#[test]
fn failing_evaluation_between_mark_and_unwind_still_rolls_back_cleanly() {
    let mut interp = fresh();
    let mark = interp.mark();

    assert_eq!(interp.eval("VARIABLE V 1 2 3"), Status::Normal);
    assert_eq!(interp.eval(": BAD 5 0 / ; BAD"), Status::DivZero);

    interp.unwind(&mark);
    assert_eq!(interp.depth(), 0);
    assert_eq!(interp.eval("V"), Status::Undefined);
}

#[test]
fn forget_then_forget_again_fails_with_undefined() {
    let mut interp = fresh();
    assert_eq!(interp.eval("VARIABLE V"), Status::Normal);
    assert_eq!(interp.eval("FORGET V"), Status::Normal);
    assert_eq!(interp.eval("FORGET V"), Status::Undefined);
}

#[test]
fn forgetting_a_protected_word_is_rejected() {
    let mut interp = fresh();
    assert_eq!(interp.eval("FORGET DUP"), Status::ForgetProt);
}

#[test]
fn words_and_find_agree_on_the_live_entry_set() {
    let mut interp = fresh();
    assert_eq!(interp.eval("VARIABLE FOOBAR"), Status::Normal);

    let live_count = interp.dictionary().live_names().len();
    assert!(interp.dictionary().live_names().contains(&"FOOBAR"));

    let found = interp.lookup_name("FOOBAR");
    assert!(found.is_some());
    let missing = interp.lookup_name("NO-SUCH-WORD-AT-ALL");
    assert!(missing.is_none());

    assert_eq!(interp.dictionary().live_names().len(), live_count);
}

#[test]
fn stack_overflow_at_capacity_plus_one_does_not_corrupt_the_cell_below() {
    let mut interp = AtlastInterpreter::new();
    interp.eval("\\ * STACK 3");
    interp.init().unwrap();

    assert_eq!(interp.eval("1 2 3"), Status::Normal);
    assert_eq!(interp.eval("4"), Status::StackOver);
    assert_eq!(interp.depth(), 0); // trouble() clears the stacks on fault.

    // A fresh evaluation after the fault works cleanly.
    assert_eq!(interp.eval("9"), Status::Normal);
    assert_eq!(interp.pop().unwrap().as_int(), Some(9));
}
