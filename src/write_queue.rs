//! Pending register write FIFO
//!
//! Sequencers emit register writes far faster than a real chip can absorb
//! them. The queue decouples the two: writes are appended as they arrive and
//! drained one at a time by the substep driver whenever the clock gate opens.
//! Entries are only ever delayed, never reordered or dropped.

use std::collections::VecDeque;

/// A single buffered bus write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWrite {
    /// Bus address / port
    pub address: u32,
    /// Data byte
    pub data: u8,
}

impl PendingWrite {
    /// Create a new pending write
    pub fn new(address: u32, data: u8) -> Self {
        Self { address, data }
    }
}

/// Unbounded FIFO of pending writes.
#[derive(Debug, Clone, Default)]
pub struct WriteQueue {
    entries: VecDeque<PendingWrite>,
}

impl WriteQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a write to the tail.
    ///
    /// Growth is reserved fallibly so that an allocation failure surfaces to
    /// the caller instead of losing the write.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::QueueAllocation`](crate::AdapterError::QueueAllocation)
    /// if the queue cannot grow.
    pub fn push(&mut self, address: u32, data: u8) -> crate::Result<()> {
        self.entries.try_reserve(1)?;
        self.entries.push_back(PendingWrite::new(address, data));
        Ok(())
    }

    /// Oldest write, if any
    #[inline]
    pub fn front(&self) -> Option<&PendingWrite> {
        self.entries.front()
    }

    /// Remove and return the oldest write
    #[inline]
    pub fn pop(&mut self) -> Option<PendingWrite> {
        self.entries.pop_front()
    }

    /// Remove and return the oldest write only if `ready` is true.
    #[inline]
    pub fn pop_if(&mut self, ready: bool) -> Option<PendingWrite> {
        if ready {
            self.entries.pop_front()
        } else {
            None
        }
    }

    /// Number of writes still waiting
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no writes are waiting
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discard every pending write
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
