//! Core identifiers.

use std::fmt;

use serde::Serialize;

/// Index of a core, and therefore of the L1 cache it owns.
///
/// Ids are dense and index-stable: core `n` is always the `n`th entry of
/// `L2Cache::l1_caches()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CoreId(pub usize);

impl CoreId {
    /// Returns the raw core index.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for CoreId {
    /// Formats the id as the name of the core's L1 cache (`L1-0`, `L1-1`, ...).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L1-{}", self.0)
    }
}

impl From<usize> for CoreId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
