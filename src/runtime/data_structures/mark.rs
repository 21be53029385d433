/// A snapshot of every region `unwind` must restore together: the data stack, return
/// stack, walkback stack, both heap arenas, and the dictionary head — a "push a context, release
/// it back off" shape covering all the regions a Forth `MARK`/`UNWIND` pair touches rather than
/// just one list.
#[derive(Clone, Copy)]
pub struct Mark {
    pub data_stack: usize,
    pub return_stack: usize,
    pub walkback_stack: usize,
    pub heap_cells: usize,
    pub heap_bytes: usize,
    pub dictionary_head: usize,
}

/// Implemented by the interpreter to expose the transactional mark/unwind boundary.
pub trait Markable {
    /// Snapshot every region. Taking a mark before `init` is a harmless no-op on unwind, since
    /// every region is still empty.
    fn mark(&mut self) -> Mark;

    /// Restore every region to a prior snapshot. Never unwinds past the protected mark
    /// established at the first `init`; idempotent if nothing changed since.
    fn unwind(&mut self, mark: &Mark);
}
