//! Main memory backends.
//!
//! The directory falls back to main memory when no cache holds a line. This module
//! provides:
//! 1. **MainMemory:** The trait the directory loads lines through.
//! 2. **DefaultFill:** A stub returning a freshly filled line on every load.
//!
//! Backends are `Send + Sync` so a whole `L2Cache` can move between threads.

use std::fmt;

use crate::cache::CacheLine;
use crate::common::{LineGeometry, LineIndex};

/// Trait for the backing store behind the L2 directory.
pub trait MainMemory: Send + Sync + fmt::Debug {
    /// Loads a full cache line.
    ///
    /// # Arguments
    ///
    /// * `line` - Index of the line being loaded.
    ///
    /// # Returns
    ///
    /// An independent copy of the line's contents in memory.
    fn load(&mut self, line: LineIndex) -> CacheLine;
}

/// Memory whose every word holds the same fill value.
///
/// Writes are never written back, so every load returns the fill value.
#[derive(Clone, Copy, Debug)]
pub struct DefaultFill {
    geometry: LineGeometry,
    fill: u64,
}

impl DefaultFill {
    /// Creates a stub returning lines of `geometry` filled with `fill`.
    pub const fn new(geometry: LineGeometry, fill: u64) -> Self {
        Self { geometry, fill }
    }

    /// The value every word reads as.
    pub const fn fill(&self) -> u64 {
        self.fill
    }
}

impl MainMemory for DefaultFill {
    fn load(&mut self, _line: LineIndex) -> CacheLine {
        CacheLine::new(self.geometry, self.fill)
    }
}
