use std::io;

use log::trace;

use crate::{Buffer, Result, Source, View};

/// Resettable sequential reader over a completed snapshot.
///
/// Holds a shared borrow of the buffer, so the snapshot cannot change or be
/// dropped while the reader exists. Each reader has its own cursor; any number
/// of readers, on any number of threads, may read the same buffer at once.
///
/// Reads are bounds-checked: asking for more bytes than remain returns
/// [`Error::SourceExhausted`](crate::Error::SourceExhausted) and leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    buffer: &'a Buffer,
    view: View<'a>,
}

impl<'a> Reader<'a> {
    #[inline]
    pub fn new(buffer: &'a Buffer) -> Self {
        Self {
            buffer,
            view: buffer.view(),
        }
    }

    /// Rebinds to the buffer's current extents and rewinds to the first byte.
    ///
    /// Can be called any number of times to replay the same snapshot.
    pub fn reset(&mut self) {
        self.view = self.buffer.view();
        trace!("Snapshot reader reset ({} bytes).", self.view.len());
    }

    /// Returns the next `count` bytes, borrowed from the buffer, and advances past them.
    #[inline]
    pub fn read(&mut self, count: usize) -> Result<&'a [u8]> {
        self.view.advance(count)
    }

    /// Copies exactly `dst.len()` bytes into `dst`.
    pub fn read_into(&mut self, dst: &mut [u8]) -> Result<()> {
        let bytes = self.read(dst.len())?;
        dst.copy_from_slice(bytes);
        Ok(())
    }

    /// Does nothing: the whole snapshot is already resident.
    #[inline]
    pub fn fill(&mut self) -> Result<()> {
        Ok(())
    }

    /// Does nothing: the memory belongs to the buffer, not the reader.
    #[inline]
    pub fn close(&mut self) -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.view.position()
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.view.remaining()
    }

    /// Size of the snapshot being read.
    #[allow(clippy::len_without_is_empty)]
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    #[inline(always)]
    pub fn is_exhausted(&self) -> bool {
        self.view.is_exhausted()
    }

    #[inline(always)]
    pub fn view(&self) -> View<'a> {
        self.view
    }
}

impl Source for Reader<'_> {
    #[inline]
    fn read(&mut self, count: usize) -> Result<&[u8]> {
        Reader::read(self, count)
    }

    #[inline]
    fn fill(&mut self) -> Result<()> {
        Reader::fill(self)
    }

    #[inline]
    fn close(&mut self) -> Result<()> {
        Reader::close(self)
    }
}

/// Short reads at the end of the snapshot follow the `io::Read` contract.
impl io::Read for Reader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let count = buf.len().min(self.view.remaining());
        let bytes = self.view.advance(count)?;
        buf[..count].copy_from_slice(bytes);
        Ok(count)
    }
}
