//! MESI line states.
//!
//! <pre>
//!   M E S I   (may two caches hold both?)
//! M ✗ ✗ ✗ ✓
//! E ✗ ✗ ✗ ✓
//! S ✗ ✗ ✓ ✓
//! I ✓ ✓ ✓ ✓
//! </pre>

use std::fmt;

use serde::Serialize;

/// State of one cache line in one L1 cache.
///
/// A line with no entry in an L1 cache is `Invalid`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum MesiState {
    /// Dirty and held by this cache only.
    Modified,
    /// Clean and held by this cache only. Becomes `Modified` on a local write
    /// without contacting the directory.
    Exclusive,
    /// Clean, possibly held by other caches with identical data.
    Shared,
    /// Not held.
    #[default]
    Invalid,
}

impl MesiState {
    /// Returns `true` unless the state is `Invalid`.
    #[inline(always)]
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Returns `true` for `Modified` and `Exclusive`, the states that grant
    /// the right to write without further coordination.
    #[inline(always)]
    pub const fn is_owned(self) -> bool {
        matches!(self, Self::Modified | Self::Exclusive)
    }

    /// Single-letter protocol name.
    pub const fn letter(self) -> char {
        match self {
            Self::Modified => 'M',
            Self::Exclusive => 'E',
            Self::Shared => 'S',
            Self::Invalid => 'I',
        }
    }
}

impl fmt::Display for MesiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
