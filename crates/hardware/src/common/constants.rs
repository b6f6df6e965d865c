//! Global System Constants.
//!
//! Reference values for the cache geometry and main memory contents. A running
//! system never reads these directly; they seed `Config::default()` and
//! `LineGeometry::default()`, after which the configured values are immutable.

/// Default cache line size in address units (`0x200` = 512).
pub const DEFAULT_LINE_SIZE: u64 = 0x200;

/// Default word size in address units; also the bit width of a stored value.
pub const DEFAULT_WORD_SIZE: u32 = 8;

/// Value every word of main memory holds before it is first written.
pub const DEFAULT_VALUE: u64 = 99;

/// Number of cores (and L1 caches) in the default system.
pub const DEFAULT_CORES: usize = 2;
