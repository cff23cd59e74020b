use std::fmt;

use log::debug;
use rayon::prelude::*;

use crate::{ByteSize, Error, Reader, Result, Sink, View, Writer, error::fatal};

/// One kibibyte (1024 bytes).
#[allow(non_upper_case_globals)]
pub const KiB: usize = 1024;
/// One mebibyte (1024^2 bytes).
#[allow(non_upper_case_globals)]
pub const MiB: usize = 1024 * KiB;

/// Capacity of a buffer created with [`Buffer::new`].
pub const INITIAL_CAPACITY: usize = 256 * KiB;
/// Headroom requested by [`Buffer::reserve_insert_margin`] on top of the current capacity.
pub const INSERT_MARGIN: usize = 16 * KiB;

/// Growable, owned byte region holding one snapshot.
///
/// The region is a single allocation whose length is the capacity. The write
/// cursor is kept as an offset from the start, so it survives relocation when
/// the region grows. Capacity only ever doubles and never shrinks.
///
/// Borrowed access goes through [`View`] and [`Reader`], which hold shared
/// borrows of the buffer: they never free anything and cannot outlive it.
#[must_use = "Buffer should be stored to keep the snapshot alive"]
pub struct Buffer {
    /// Allocated bytes. `region.len()` is the capacity.
    region: Vec<u8>,
    /// Offset of the next free byte, `<= region.len()`.
    cursor: usize,
}

impl Buffer {
    /// Allocates a buffer of [`INITIAL_CAPACITY`] bytes.
    ///
    /// # Panics
    /// Panics if the allocation fails.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Allocates a buffer of at least `capacity` bytes.
    ///
    /// # Panics
    /// Panics if the allocation fails.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::try_with_capacity(capacity).unwrap_or_else(|err| fatal(err))
    }

    /// Allocates a buffer of at least `capacity` bytes, reporting failure.
    ///
    /// A zero capacity is rounded up to one byte so that doubling always
    /// makes progress.
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let capacity = capacity.max(1);

        let mut region = Vec::new();
        region
            .try_reserve_exact(capacity)
            .map_err(|source| Error::AllocationFailure {
                requested: capacity,
                source: Some(source),
            })?;
        region.resize(capacity, 0);
        debug!("Snapshot buffer allocated ({}).", ByteSize(capacity));

        Ok(Self { region, cursor: 0 })
    }

    /// Grows the buffer until it holds at least `needed` bytes.
    ///
    /// # Panics
    /// Panics if the reallocation fails or the capacity would overflow.
    pub fn ensure_capacity(&mut self, needed: usize) {
        if let Err(err) = self.try_ensure_capacity(needed) {
            fatal(err)
        }
    }

    /// Grows the buffer until it holds at least `needed` bytes, reporting failure.
    ///
    /// Capacity doubles from its current value until it reaches `needed`, then
    /// the region is reallocated once. Written bytes and the cursor offset are
    /// preserved. Does nothing if `needed` already fits. On error the buffer is
    /// left untouched.
    pub fn try_ensure_capacity(&mut self, needed: usize) -> Result<()> {
        let capacity = self.capacity();
        if needed <= capacity {
            return Ok(());
        }

        let mut grown = capacity;
        while grown < needed {
            grown = grown
                .checked_mul(2)
                .ok_or_else(|| Error::capacity_overflow(needed))?;
        }

        self.region
            .try_reserve_exact(grown - capacity)
            .map_err(|source| Error::AllocationFailure {
                requested: grown,
                source: Some(source),
            })?;
        self.region.resize(grown, 0);
        debug!(
            "Snapshot buffer grown from {} to {} ({} in use).",
            ByteSize(capacity),
            ByteSize(grown),
            ByteSize(self.cursor)
        );

        Ok(())
    }

    /// Reserves [`INSERT_MARGIN`] bytes on top of the current capacity.
    ///
    /// # Panics
    /// Panics if the reallocation fails or the capacity would overflow.
    pub fn reserve_insert_margin(&mut self) {
        if let Err(err) = self.try_reserve_insert_margin() {
            fatal(err)
        }
    }

    /// Reserves [`INSERT_MARGIN`] bytes on top of the current capacity, reporting failure.
    ///
    /// Used before a variable-length write whose size is bounded but unknown.
    pub fn try_reserve_insert_margin(&mut self) -> Result<()> {
        let capacity = self.capacity();
        let needed = capacity
            .checked_add(INSERT_MARGIN)
            .ok_or_else(|| Error::capacity_overflow(usize::MAX))?;
        self.try_ensure_capacity(needed)
    }

    /// Appends `bytes` at the cursor, growing the buffer first if needed.
    ///
    /// # Panics
    /// Panics if the reallocation fails or the capacity would overflow.
    pub fn write(&mut self, bytes: &[u8]) {
        if let Err(err) = self.try_write(bytes) {
            fatal(err)
        }
    }

    /// Appends `bytes` at the cursor, reporting growth failure.
    pub fn try_write(&mut self, bytes: &[u8]) -> Result<()> {
        let end = self
            .cursor
            .checked_add(bytes.len())
            .ok_or_else(|| Error::capacity_overflow(usize::MAX))?;
        self.try_ensure_capacity(end)?;

        self.region[self.cursor..end].copy_from_slice(bytes);
        self.cursor = end;
        Ok(())
    }

    /// Rewinds the write cursor to the start, keeping the allocation.
    ///
    /// Lets one buffer be reused for the next snapshot without reallocating.
    #[inline]
    pub fn clear(&mut self) {
        self.cursor = 0;
    }

    /// Number of bytes written so far.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.cursor
    }

    /// Total number of allocated bytes.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.region.len()
    }

    /// Bytes that can still be written before the next growth.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.size()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    /// Returns the written bytes.
    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.region[..self.cursor]
    }

    /// Creates a borrowed view of the written bytes, positioned at the start.
    ///
    /// No bytes are copied. The view never frees memory and the borrow checker
    /// keeps it from outliving this buffer or observing a later write.
    #[inline]
    pub fn view(&self) -> View<'_> {
        View::new(self.as_slice())
    }

    /// Creates a reader positioned at the start of the snapshot.
    #[inline]
    pub fn reader(&self) -> Reader<'_> {
        Reader::new(self)
    }

    /// Creates a writer appending at the current cursor.
    #[inline]
    pub fn writer(&mut self) -> Writer<'_> {
        Writer::new(self)
    }

    /// Restores the snapshot `readers` times in parallel.
    ///
    /// Each call to `f` gets its index and an independent reader over the same
    /// memory. Results are returned in index order.
    pub fn par_restore<F, R>(&self, readers: usize, f: F) -> Vec<R>
    where
        F: Fn(usize, Reader<'_>) -> R + Sync + Send,
        R: Send,
    {
        (0..readers)
            .into_par_iter()
            .map(|index| f(index, self.reader()))
            .collect()
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("size", &self.size())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl AsRef<[u8]> for Buffer {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

/// Appends directly; `flush` reserves the insert margin and `close` does nothing.
impl Sink for Buffer {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.try_write(bytes)
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        self.try_reserve_insert_margin()
    }

    #[inline]
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
