use std::io;

use log::debug;

use crate::{Buffer, ByteSize, Result, Sink};

/// Appends a snapshot to a [`Buffer`] on behalf of an external serializer.
///
/// Holds the buffer mutably, so no view or reader can observe it mid-write.
/// Growth may relocate the region; nothing here hands out addresses into it.
///
/// Growth failures are returned as errors for which [`Error::is_fatal`](crate::Error::is_fatal)
/// is `true`. The snapshot is then incomplete and must not be restored.
#[derive(Debug)]
pub struct Writer<'a> {
    buffer: &'a mut Buffer,
}

impl<'a> Writer<'a> {
    #[inline]
    pub fn new(buffer: &'a mut Buffer) -> Self {
        Self { buffer }
    }

    /// Appends `bytes`, doubling the buffer capacity as many times as needed.
    #[inline]
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.try_write(bytes)
    }

    /// Reserves the insert margin rather than the exact shortfall, so the
    /// serializer can keep writing without re-checking capacity.
    #[inline]
    pub fn flush(&mut self) -> Result<()> {
        self.buffer.try_reserve_insert_margin()
    }

    /// Performs no action. No trailer is written: the size is the cursor offset.
    pub fn close(&mut self) -> Result<()> {
        debug!(
            "Snapshot closed: {} in {}.",
            ByteSize(self.buffer.size()),
            ByteSize(self.buffer.capacity())
        );
        Ok(())
    }

    /// Bytes written to the buffer so far.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.buffer.size()
    }

    #[inline(always)]
    pub fn buffer(&self) -> &Buffer {
        &*self.buffer
    }
}

impl Sink for Writer<'_> {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        Writer::write(self, bytes)
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        Writer::flush(self)
    }

    #[inline]
    fn close(&mut self) -> Result<()> {
        Writer::close(self)
    }
}

/// `io::Write::flush` does nothing: written bytes are already in the buffer.
impl io::Write for Writer<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Writer::write(self, buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
