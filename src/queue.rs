//! Bounded lock-free input queue between the UART reader and the console task.
//!
//! ```text
//! UART reader ──push──▶ [b0][b1][b2] ──pop──▶ Console::poll
//! (producer)             lock-free             (consumer)
//! ```
//!
//! - Single producer, single consumer (enforced by design, not by type system)
//! - Push never blocks: a full queue drops the byte and counts it
//! - Capacity is fixed at compile time

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::config::INPUT_QUEUE_SIZE;

/// Lock-free SPSC byte queue.
pub struct InputQueue<const N: usize = INPUT_QUEUE_SIZE> {
    slots: UnsafeCell<[u8; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: The producer writes a slot before publishing it with a Release
// store; the consumer reads it after an Acquire load.
unsafe impl<const N: usize> Sync for InputQueue<N> {}
unsafe impl<const N: usize> Send for InputQueue<N> {}

impl<const N: usize> InputQueue<N> {
    const MASK: usize = N - 1;

    /// Create an empty queue.
    ///
    /// # Panics
    ///
    /// Panics at compile time if N is not a power of 2.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Queue size must be power of 2");

        Self {
            slots: UnsafeCell::new([0; N]),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Queue one byte. Returns `false` if the queue was full.
    #[inline]
    pub fn push(&self, byte: u8) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // SAFETY: Single producer, slot not yet published
        unsafe {
            (*self.slots.get())[(write as usize) & Self::MASK] = byte;
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Queue a buffer, returning how many bytes were accepted.
    pub fn push_slice(&self, bytes: &[u8]) -> usize {
        bytes.iter().filter(|&&b| self.push(b)).count()
    }

    /// Dequeue the oldest byte.
    #[inline]
    pub fn pop(&self) -> Option<u8> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        // SAFETY: Single consumer, slot published by the producer
        let byte = unsafe { (*self.slots.get())[(read as usize) & Self::MASK] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(byte)
    }

    /// Bytes waiting to be processed.
    #[inline]
    pub fn len(&self) -> usize {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed capacity.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Take and reset the dropped-byte counter.
    #[inline]
    pub fn take_dropped(&self) -> u32 {
        self.dropped.swap(0, Ordering::Relaxed)
    }
}

impl<const N: usize> Default for InputQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
