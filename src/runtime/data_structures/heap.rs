use crate::lang::source_buffer::SourceLocation;
use crate::runtime::data_structures::value::Value;
use crate::runtime::error::{AtlastError, Result, Status};

/// The bump-allocated arena backing word bodies, variables, and arrays. Addresses are
/// plain indices into `cells`, checked against `cells.len()` on every access — the Rust stand-in
/// for the source's raw "is this offset inside the region" pointer-validity test.
///
/// A second, independent byte arena backs string data (named `STRING` buffers, `(STRLIT)` text,
/// and the rotating pool of temporary buffers): ATLAST addresses strings and cells from the same
/// flat memory in the original C, but splitting them here costs nothing observable to a script and
/// avoids reinterpreting cell bit patterns as bytes.
pub struct Heap {
    cells: Vec<Value>,
    cell_capacity: usize,

    bytes: Vec<u8>,
    byte_capacity: usize,

    temp_buffers: Vec<usize>,
    temp_buffer_len: usize,
    temp_cursor: usize,
}

impl Heap {
    pub fn new(cell_capacity: usize, byte_capacity: usize, temp_buffer_count: usize, temp_buffer_len: usize) -> Heap {
        let mut heap = Heap {
            cells: Vec::with_capacity(cell_capacity),
            cell_capacity,
            bytes: Vec::with_capacity(byte_capacity),
            byte_capacity,
            temp_buffers: Vec::with_capacity(temp_buffer_count),
            temp_buffer_len,
            temp_cursor: 0,
        };

        // Cell zero is reserved for the global state word, cell one for the numeric base
        // (`BASE`/`DECIMAL`/`HEX`): both allocated up front so `@`/`!` can address them like
        // any other variable and they stay inside the pointer-validity window even after a
        // `FORGET` rewinds past everything a script defined.
        heap.cells.push(Value::Int(0));
        heap.cells.push(Value::Int(10));

        for _ in 0..temp_buffer_count {
            let addr = heap.bytes.len();
            heap.bytes.resize(addr + temp_buffer_len, 0);
            heap.temp_buffers.push(addr);
        }

        heap
    }

    pub const STATE_CELL: usize = 0;

    pub fn state(&self) -> i64 {
        self.cells[Heap::STATE_CELL].as_int().unwrap_or(0)
    }

    pub fn set_state(&mut self, compiling: bool) {
        self.cells[Heap::STATE_CELL] = Value::Int(if compiling { 1 } else { 0 });
    }

    pub const BASE_CELL: usize = 1;

    pub fn base(&self) -> i64 {
        self.cells[Heap::BASE_CELL].as_int().unwrap_or(10)
    }

    pub fn set_base(&mut self, base: i64) {
        self.cells[Heap::BASE_CELL] = Value::Int(base);
    }

    pub fn cell_mark(&self) -> usize {
        self.cells.len()
    }

    pub fn byte_mark(&self) -> usize {
        self.bytes.len()
    }

    pub fn rewind_cells(&mut self, mark: usize) {
        self.cells.truncate(mark.max(Heap::BASE_CELL + 1));
    }

    pub fn rewind_bytes(&mut self, mark: usize) {
        self.bytes.truncate(mark);
    }

    fn check_cell_room(&self, n: usize, location: Option<SourceLocation>) -> Result<()> {
        if self.cells.len() + n > self.cell_capacity {
            return Err(AtlastError::new(Status::HeapOver, location, "heap exhausted".to_string()));
        }
        Ok(())
    }

    /// Allocate one cell holding `value`, returning its address.
    pub fn alloc_cell(&mut self, value: Value, location: Option<SourceLocation>) -> Result<usize> {
        self.check_cell_room(1, location)?;
        let addr = self.cells.len();
        self.cells.push(value);
        Ok(addr)
    }

    /// Allocate `count` cells, each initialized to `fill`, returning the address of the first.
    pub fn alloc_cells(&mut self, count: usize, fill: Value, location: Option<SourceLocation>) -> Result<usize> {
        self.check_cell_room(count, location)?;
        let addr = self.cells.len();
        self.cells.resize(addr + count, fill);
        Ok(addr)
    }

    pub fn valid_cell(&self, addr: usize) -> bool {
        addr < self.cells.len()
    }

    pub fn get(&self, addr: usize, location: Option<SourceLocation>) -> Result<Value> {
        self.cells
            .get(addr)
            .copied()
            .ok_or_else(|| AtlastError::new(Status::BadPointer, location, format!("invalid heap address {}", addr)))
    }

    pub fn set(&mut self, addr: usize, value: Value, location: Option<SourceLocation>) -> Result<()> {
        match self.cells.get_mut(addr) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(AtlastError::new(Status::BadPointer, location, format!("invalid heap address {}", addr))),
        }
    }

    /// Copy `data` into a freshly bump-allocated run of bytes, returning its address.
    pub fn alloc_bytes(&mut self, data: &[u8], location: Option<SourceLocation>) -> Result<usize> {
        if self.bytes.len() + data.len() > self.byte_capacity {
            return Err(AtlastError::new(Status::HeapOver, location, "string heap exhausted".to_string()));
        }
        let addr = self.bytes.len();
        self.bytes.extend_from_slice(data);
        Ok(addr)
    }

    pub fn read_bytes(&self, addr: usize, len: usize, location: Option<SourceLocation>) -> Result<&[u8]> {
        self.bytes
            .get(addr..addr + len)
            .ok_or_else(|| AtlastError::new(Status::BadPointer, location, format!("invalid string address {}", addr)))
    }

    /// Write into one of the preallocated rotating temporary string buffers, wrapping at
    /// `TEMPSTRN`, and return its address.
    pub fn next_temp_buffer(&mut self, data: &[u8], location: Option<SourceLocation>) -> Result<usize> {
        if self.temp_buffers.is_empty() {
            return Err(AtlastError::new(Status::HeapOver, location, "no temporary string buffers configured".to_string()));
        }

        if data.len() > self.temp_buffer_len {
            return Err(AtlastError::new(Status::RunString, location, "string exceeds temporary buffer length".to_string()));
        }

        let addr = self.temp_buffers[self.temp_cursor];
        self.temp_cursor = (self.temp_cursor + 1) % self.temp_buffers.len();

        let slot = &mut self.bytes[addr..addr + self.temp_buffer_len];
        slot[..data.len()].copy_from_slice(data);
        slot[data.len()..].fill(0);

        Ok(addr)
    }

    pub fn temp_buffer_len(&self) -> usize {
        self.temp_buffer_len
    }

    /// Read the length byte and text of a length-prefixed counted string at `addr` (the one
    /// representation ATLAST uses uniformly for literals, temp buffers, and `STRING` buffers).
    pub fn counted_bytes(&self, addr: usize, location: Option<SourceLocation>) -> Result<&[u8]> {
        let len = *self
            .bytes
            .get(addr)
            .ok_or_else(|| AtlastError::new(Status::BadPointer, location.clone(), format!("invalid string address {}", addr)))? as usize;
        self.read_bytes(addr + 1, len, location)
    }

    /// Bytes physically available for a counted string's text, from just past its length byte to
    /// the end of the byte arena as it stood when the buffer was allocated. `STRING`-declared
    /// buffers sit back to back with whatever is allocated after them, so this is generous rather
    /// than exact, but `write_counted` never writes past it and the length byte always reflects
    /// what is actually stored.
    pub fn counted_space(&self, addr: usize, location: Option<SourceLocation>) -> Result<usize> {
        if addr >= self.bytes.len() {
            return Err(AtlastError::new(Status::BadPointer, location, format!("invalid string address {}", addr)));
        }
        Ok(self.bytes.len() - addr - 1)
    }

    /// Overwrite the text of a counted string at `addr` with `data`, truncating to `cap` bytes and
    /// updating the length byte.
    pub fn write_counted(&mut self, addr: usize, cap: usize, data: &[u8], location: Option<SourceLocation>) -> Result<()> {
        let len = data.len().min(cap).min(u8::MAX as usize);
        if addr >= self.bytes.len() || addr + 1 + len > self.bytes.len() {
            return Err(AtlastError::new(Status::BadPointer, location, format!("invalid string address {}", addr)));
        }
        self.bytes[addr] = len as u8;
        self.bytes[addr + 1..addr + 1 + len].copy_from_slice(&data[..len]);
        Ok(())
    }
}
