//! Error types for cache accesses and protocol bookkeeping.
//!
//! This module defines the error taxonomy of the simulator. It provides:
//! 1. **Caller Errors:** `AddressError` and `ValueError`, surfaced by `read`/`write`.
//! 2. **Access Result:** `AccessError`, the union returned by the per-core surface.
//! 3. **Invariant Failures:** `ProtocolViolation`, reported by `L2Cache::verify`.
//! 4. **Configuration Errors:** `ConfigError`, raised while validating a `Config`.

use thiserror::Error;

use super::addr::LineIndex;
use super::id::CoreId;
use crate::cache::MesiState;

/// An offset that cannot name a word of a cache line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The offset is not a multiple of the word size.
    #[error("misaligned access at offset {offset:#x}: offsets must be a multiple of {word_size}")]
    Misaligned {
        /// Offending offset within the line.
        offset: u64,
        /// Word size the offset must be aligned to.
        word_size: u32,
    },

    /// The word at this offset would extend past the end of the line.
    #[error("offset {offset:#x} is past the end of a {line_size:#x} cache line")]
    OutOfRange {
        /// Offending offset within the line.
        offset: u64,
        /// Size of the cache line.
        line_size: u64,
    },
}

/// A write value that does not fit in one word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("value {value} does not fit in a {word_size}-bit word")]
pub struct ValueError {
    /// Rejected value.
    pub value: u64,
    /// Word width in bits.
    pub word_size: u32,
}

/// Failure of a single `read` or `write` on an L1 cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The address does not name a valid word.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The write value is out of range.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// The core id does not name an L1 cache of this system.
    #[error("no L1 cache for core {core} (system has {cores} cores)")]
    UnknownCore {
        /// Requested core index.
        core: usize,
        /// Number of cores in the system.
        cores: usize,
    },

    /// Protocol bookkeeping broke while serving the access.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),
}

/// A breach of the MESI invariants in the directory or an L1 cache.
///
/// These indicate a bookkeeping bug, never bad caller input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    /// A cache was expected to hold a line but has no entry for it.
    #[error("{core} has no entry for {line}")]
    MissingLine {
        /// Affected line.
        line: LineIndex,
        /// Cache missing the entry.
        core: CoreId,
    },

    /// More than one cache holds the line in `Modified` or `Exclusive`.
    #[error("{line} has {count} owners")]
    MultipleOwners {
        /// Affected line.
        line: LineIndex,
        /// Number of `Modified`/`Exclusive` holders.
        count: usize,
    },

    /// A cache holds an owned line while another cache still holds it valid.
    #[error("{line} is owned by {owner} but also held by {holder}")]
    OwnedLineShared {
        /// Affected line.
        line: LineIndex,
        /// Cache holding `Modified`/`Exclusive`.
        owner: CoreId,
        /// Other cache holding a valid copy.
        holder: CoreId,
    },

    /// Two `Shared` copies of the same line disagree.
    #[error("shared copies of {line} diverge between {first} and {second}")]
    SharedDataDiverged {
        /// Affected line.
        line: LineIndex,
        /// First holder compared.
        first: CoreId,
        /// Holder whose words differ.
        second: CoreId,
    },

    /// The directory records a state the L1 cache does not hold.
    #[error("directory records {core} as {recorded:?} for {line}, cache holds {actual:?}")]
    DirectoryMismatch {
        /// Affected line.
        line: LineIndex,
        /// Cache whose state disagrees.
        core: CoreId,
        /// State in the directory entry.
        recorded: MesiState,
        /// State in the L1 cache.
        actual: MesiState,
    },

    /// An L1 cache holds a valid line the directory has no record of.
    #[error("{core} holds {line} as {actual:?} without a directory record")]
    UntrackedHolder {
        /// Affected line.
        line: LineIndex,
        /// Cache holding the line.
        core: CoreId,
        /// State in the L1 cache.
        actual: MesiState,
    },
}

/// An inconsistent simulator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The system needs at least one core.
    #[error("core count must be at least 1")]
    NoCores,

    /// Line or word size is zero, the word is wider than 64 bits, or the word
    /// size does not divide the line size.
    #[error("invalid geometry: line_size {line_size:#x}, word_size {word_size}")]
    Geometry {
        /// Configured line size.
        line_size: u64,
        /// Configured word size.
        word_size: u32,
    },

    /// The memory fill value does not fit in one word.
    #[error("default value: {0}")]
    DefaultValue(#[from] ValueError),

    /// The configuration text is not valid JSON for `Config`.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
