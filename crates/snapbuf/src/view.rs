use std::fmt;

use crate::{Error, Result, Source};

/// Non-owning, cursor-carrying view over a completed snapshot.
///
/// Copying a view is cheap: it copies a slice reference and an offset, never
/// the bytes. Every copy has its own cursor.
#[derive(Clone, Copy)]
pub struct View<'a> {
    bytes: &'a [u8],
    /// Offset of the next unread byte, `<= bytes.len()`.
    cursor: usize,
}

impl<'a> View<'a> {
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// Returns the next `count` bytes and advances past them.
    ///
    /// Fails with [`Error::SourceExhausted`] if fewer than `count` bytes remain,
    /// in which case the cursor does not move.
    #[inline]
    pub fn advance(&mut self, count: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(Error::SourceExhausted {
                requested: count,
                remaining,
            });
        }

        let start = self.cursor;
        self.cursor += count;
        Ok(&self.bytes[start..self.cursor])
    }

    /// Moves the cursor back to the first byte.
    #[inline]
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Returns all bytes of the snapshot, regardless of the cursor.
    #[inline(always)]
    pub fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the unread bytes without advancing.
    #[inline(always)]
    pub fn unread(&self) -> &'a [u8] {
        &self.bytes[self.cursor..]
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    #[allow(clippy::len_without_is_empty)]
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline(always)]
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.bytes.len()
    }
}

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("len", &self.len())
            .field("position", &self.cursor)
            .finish()
    }
}

impl<'a> From<&'a [u8]> for View<'a> {
    #[inline]
    fn from(value: &'a [u8]) -> Self {
        Self::new(value)
    }
}

impl Source for View<'_> {
    #[inline]
    fn read(&mut self, count: usize) -> Result<&[u8]> {
        self.advance(count)
    }

    #[inline]
    fn fill(&mut self) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
