//! Address, line index, and line offset types.
//!
//! This module defines strong types for the three coordinates of the address model
//! so that a line index can never be passed where an address is expected. It provides:
//! 1. **Type Safety:** `Address`, `LineIndex`, and `LineOffset` newtypes.
//! 2. **Decomposition:** `LineGeometry` splits an address into `(line, offset)`.
//! 3. **Validation:** Offset alignment and bounds checks against the word size.
//!
//! Sizes and addresses share one unit. With the default geometry the unit is the bit:
//! a `0x200` line holds 64 words of 8 units each.

use std::fmt;

use serde::Serialize;

use super::constants::{DEFAULT_LINE_SIZE, DEFAULT_WORD_SIZE};
use super::error::{AddressError, ValueError};

/// A word address in the simulated memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Address(pub u64);

/// Index of a cache line (`address / line_size`).
///
/// This is the unit of coherence tracking: L1 state maps and directory entries
/// are keyed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineIndex(pub u64);

/// Offset of a word inside a cache line (`address % line_size`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineOffset(pub u64);

impl Address {
    /// Creates a new address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }
}

impl LineIndex {
    /// Returns the raw line number.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }
}

impl LineOffset {
    /// Returns the raw offset value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for LineIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {:#x}", self.0)
    }
}

impl From<u64> for Address {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

/// Line and word sizes shared by every cache in a system.
///
/// A geometry is only constructed through [`LineGeometry::new`] (or `Default`), so
/// both sizes are non-zero and `word_size` always divides `line_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineGeometry {
    line_size: u64,
    word_size: u32,
}

impl Default for LineGeometry {
    fn default() -> Self {
        Self {
            line_size: DEFAULT_LINE_SIZE,
            word_size: DEFAULT_WORD_SIZE,
        }
    }
}

impl LineGeometry {
    /// Creates a geometry, returning `None` if the sizes are inconsistent.
    ///
    /// # Arguments
    ///
    /// * `line_size` - Size of one cache line, in address units.
    /// * `word_size` - Size of one word, in address units (and bits of value range).
    ///
    /// # Returns
    ///
    /// `None` if either size is zero, `word_size` exceeds 64, or `word_size`
    /// does not divide `line_size`.
    pub const fn new(line_size: u64, word_size: u32) -> Option<Self> {
        if line_size == 0 || word_size == 0 || word_size > 64 {
            return None;
        }
        if !line_size.is_multiple_of(word_size as u64) {
            return None;
        }
        Some(Self {
            line_size,
            word_size,
        })
    }

    /// Returns the line size in address units.
    #[inline(always)]
    pub const fn line_size(&self) -> u64 {
        self.line_size
    }

    /// Returns the word size in address units.
    #[inline(always)]
    pub const fn word_size(&self) -> u32 {
        self.word_size
    }

    /// Number of words held by one cache line.
    #[inline(always)]
    pub const fn words_per_line(&self) -> usize {
        (self.line_size / self.word_size as u64) as usize
    }

    /// Returns the cache line that contains `addr`.
    #[inline(always)]
    pub const fn line_of(&self, addr: Address) -> LineIndex {
        LineIndex(addr.0 / self.line_size)
    }

    /// Returns the offset of `addr` within its cache line.
    #[inline(always)]
    pub const fn offset_of(&self, addr: Address) -> LineOffset {
        LineOffset(addr.0 % self.line_size)
    }

    /// Splits an address into its line index and offset.
    pub const fn split(&self, addr: Address) -> (LineIndex, LineOffset) {
        (self.line_of(addr), self.offset_of(addr))
    }

    /// Maps an offset to the word slot it names.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Misaligned`] if the offset is not a multiple of the
    /// word size, or [`AddressError::OutOfRange`] if it lies past the end of the line.
    pub const fn word_index(&self, offset: LineOffset) -> Result<usize, AddressError> {
        let word = self.word_size as u64;
        if !offset.0.is_multiple_of(word) {
            return Err(AddressError::Misaligned {
                offset: offset.0,
                word_size: self.word_size,
            });
        }
        if offset.0 >= self.line_size {
            return Err(AddressError::OutOfRange {
                offset: offset.0,
                line_size: self.line_size,
            });
        }
        Ok((offset.0 / word) as usize)
    }

    /// Checks that `value` fits in one word.
    ///
    /// # Errors
    ///
    /// Returns a [`ValueError`] if `value >= 2^word_size`.
    pub const fn check_value(&self, value: u64) -> Result<(), ValueError> {
        match value.checked_shr(self.word_size) {
            Some(high) if high != 0 => Err(ValueError {
                value,
                word_size: self.word_size,
            }),
            _ => Ok(()),
        }
    }
}
