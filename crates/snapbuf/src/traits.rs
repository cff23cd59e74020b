use crate::Result;

/// Byte sink driven by an external field-level serializer.
///
/// The serializer owns the encoding; a sink only stores bytes in order.
pub trait Sink {
    /// Appends `bytes` after everything written so far.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Guarantees spare capacity before a bulk write of bounded but unknown size.
    fn flush(&mut self) -> Result<()>;

    /// Marks the end of the snapshot. Called once.
    fn close(&mut self) -> Result<()>;
}

/// Sequential byte source driven by an external field-level deserializer.
pub trait Source {
    /// Returns the next `count` bytes and advances past them.
    fn read(&mut self, count: usize) -> Result<&[u8]>;

    /// Stages more bytes once the currently available ones are consumed.
    fn fill(&mut self) -> Result<()>;

    /// Marks the end of the restore. Called once.
    fn close(&mut self) -> Result<()>;
}

impl<S: Sink + ?Sized> Sink for &mut S {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    #[inline]
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    #[inline]
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    #[inline]
    fn read(&mut self, count: usize) -> Result<&[u8]> {
        (**self).read(count)
    }

    #[inline]
    fn fill(&mut self) -> Result<()> {
        (**self).fill()
    }

    #[inline]
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
