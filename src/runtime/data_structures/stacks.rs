use crate::lang::source_buffer::SourceLocation;
use crate::runtime::error::{AtlastError, Result, Status};

/// A fixed-capacity, bounds-checked stack. One instantiation backs the data stack, another the
/// return stack, another the walkback stack — each with its own pair of over/underflow
/// status codes, since `STACKOVER`/`STACKUNDER` and `RSTACKOVER`/`RSTACKUNDER` are distinct
/// externally-visible tokens.
///
/// The `Sl`/`So`/`Rsl`/`Rso` precondition checks the source spreads across macro guard families
/// become the small `has`/`room` helpers below rather than a side-channel global.
pub struct Stack<T> {
    items: Vec<T>,
    capacity: usize,
    overflow: Status,
    underflow: Status,
}

impl<T: Clone> Stack<T> {
    pub fn new(capacity: usize, overflow: Status, underflow: Status) -> Stack<T> {
        Stack {
            items: Vec::with_capacity(capacity),
            capacity,
            overflow,
            underflow,
        }
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn room(&self, n: usize, location: Option<SourceLocation>) -> Result<()> {
        if self.items.len() + n > self.capacity {
            return Err(AtlastError::new(self.overflow, location, "stack overflow".to_string()));
        }
        Ok(())
    }

    pub fn has(&self, n: usize, location: Option<SourceLocation>) -> Result<()> {
        if self.items.len() < n {
            return Err(AtlastError::new(self.underflow, location, "stack underflow".to_string()));
        }
        Ok(())
    }

    pub fn push(&mut self, value: T, location: Option<SourceLocation>) -> Result<()> {
        self.room(1, location)?;
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self, location: Option<SourceLocation>) -> Result<T> {
        self.has(1, location.clone())?;
        Ok(self.items.pop().expect("checked by has(1)"))
    }

    pub fn peek(&self, location: Option<SourceLocation>) -> Result<T> {
        self.has(1, location.clone())?;
        Ok(self.items.last().expect("checked by has(1)").clone())
    }

    /// Look `depth` cells down from the top (0 is the top itself) without removing anything.
    pub fn pick(&self, depth: usize, location: Option<SourceLocation>) -> Result<T> {
        self.has(depth + 1, location.clone())?;
        let index = self.items.len() - 1 - depth;
        Ok(self.items[index].clone())
    }

    /// Overwrite the cell `depth` cells down from the top.
    pub fn set_pick(&mut self, depth: usize, value: T, location: Option<SourceLocation>) -> Result<()> {
        self.has(depth + 1, location.clone())?;
        let index = self.items.len() - 1 - depth;
        self.items[index] = value;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn mark(&self) -> usize {
        self.items.len()
    }

    pub fn rewind(&mut self, mark: usize) {
        self.items.truncate(mark);
    }
}
