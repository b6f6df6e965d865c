//! Cache line data.
//!
//! A `CacheLine` is the unit of data moved between main memory, the L2 directory,
//! and the L1 caches. Lines are plain values: cloning one yields an independent copy,
//! and only copies ever cross the L1/L2 boundary.

use crate::common::{AccessError, AddressError, DEFAULT_VALUE, LineGeometry, LineOffset};

/// Fixed-length sequence of words belonging to one line index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheLine {
    geometry: LineGeometry,
    words: Box<[u64]>,
}

impl Default for CacheLine {
    /// A line of the default geometry filled with the reference memory value.
    fn default() -> Self {
        Self::new(LineGeometry::default(), DEFAULT_VALUE)
    }
}

impl CacheLine {
    /// Creates a line whose every word holds `fill`.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Line and word sizes.
    /// * `fill` - Initial value of every word. Callers pass a value already checked
    ///   against the word size (see `Config::validate`).
    pub fn new(geometry: LineGeometry, fill: u64) -> Self {
        Self {
            geometry,
            words: vec![fill; geometry.words_per_line()].into_boxed_slice(),
        }
    }

    /// Returns an independent line with the same contents as `other`.
    pub fn copy_of(other: &Self) -> Self {
        other.clone()
    }

    /// Reads the word at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an [`AddressError`] if the offset is misaligned or past the end of the line.
    pub fn get(&self, offset: LineOffset) -> Result<u64, AddressError> {
        let index = self.geometry.word_index(offset)?;
        Ok(self.words[index])
    }

    /// Overwrites the word at `offset`.
    ///
    /// The offset is checked before the value, so a misaligned write of an
    /// out-of-range value reports the address problem.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Address`] for a bad offset and [`AccessError::Value`]
    /// if `value` does not fit in one word.
    pub fn set(&mut self, offset: LineOffset, value: u64) -> Result<(), AccessError> {
        let index = self.geometry.word_index(offset)?;
        self.geometry.check_value(value)?;
        self.words[index] = value;
        Ok(())
    }

    /// All words of the line, lowest offset first.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Geometry this line was created with.
    pub const fn geometry(&self) -> LineGeometry {
        self.geometry
    }
}
