use std::sync::Arc;

use log::debug;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use crate::{Buffer, ByteSize, Error, Result};

/// Hand-off slot for completed snapshots shared between threads.
///
/// A producer publishes a finished [`Buffer`]; consumers take a read guard and
/// build readers from it. The snapshot cannot be replaced while any guard is
/// alive, so readers never observe a buffer being swapped out under them.
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshot(Arc<RwLock<Option<Buffer>>>);

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `buffer`, returning the previously held snapshot so its
    /// allocation can be reused.
    ///
    /// Waits for outstanding read guards to be dropped.
    pub fn publish(&self, buffer: Buffer) -> Option<Buffer> {
        let size = buffer.size();
        let previous = self.0.write().replace(buffer);
        debug!("Snapshot published ({}).", ByteSize(size));
        previous
    }

    /// Removes and returns the held snapshot.
    pub fn take(&self) -> Option<Buffer> {
        self.0.write().take()
    }

    /// Locks the held snapshot for reading.
    ///
    /// Returns [`Error::InvalidState`] if nothing has been published.
    pub fn read(&self) -> Result<MappedRwLockReadGuard<'_, Buffer>> {
        RwLockReadGuard::try_map(self.0.read(), Option::as_ref)
            .map_err(|_| Error::InvalidState("no snapshot published"))
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        self.0.read().is_some()
    }

    /// Size of the held snapshot, if any.
    #[inline]
    pub fn size(&self) -> Option<usize> {
        self.0.read().as_ref().map(Buffer::size)
    }
}

impl From<Buffer> for SharedSnapshot {
    fn from(value: Buffer) -> Self {
        Self(Arc::new(RwLock::new(Some(value))))
    }
}
