use std::fmt;

use crate::{KiB, MiB};

/// Binary units from largest to smallest, each with its size in bytes.
const UNITS: [(usize, &str); 3] = [(1024 * MiB, "GiB"), (MiB, "MiB"), (KiB, "KiB")];

/// A byte count with a human-readable [`Display`](fmt::Display).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteSize(pub usize);

impl ByteSize {
    /// Returns the size in bytes.
    #[inline]
    pub fn bytes(&self) -> usize {
        self.0
    }
}

impl From<usize> for ByteSize {
    #[inline]
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match UNITS.iter().find(|(unit, _)| self.0 >= *unit) {
            Some(&(unit, suffix)) => write!(f, "{:.1} {suffix}", self.0 as f64 / unit as f64),
            None => write!(f, "{} B", self.0),
        }
    }
}
