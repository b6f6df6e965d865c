//! MESI cache coherence simulator library.
//!
//! This crate models a two-level cache hierarchy kept coherent with the MESI
//! protocol:
//! 1. **Cache:** Per-core L1 caches and a shared L2 cache acting as the directory.
//! 2. **Common:** Address model, core ids, constants, and error types.
//! 3. **Memory:** The main memory backend the directory falls back to.
//! 4. **Simulation:** Configuration, statistics, trace parsing, and replay.
//!
//! # Examples
//!
//! ```
//! use mesi_core::{Address, L2Cache};
//!
//! let mut l2 = L2Cache::new(2);
//! l2.l1(0).unwrap().write(Address(0xa0), 7).unwrap();
//! assert_eq!(l2.l1(1).unwrap().read(Address(0xa0)).unwrap(), 7);
//! ```

/// MESI caches (L1, L2 directory, cache lines, states).
pub mod cache;
/// Common types and constants (addresses, core ids, errors).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Main memory backends.
pub mod memory;
/// Traces, trace replay, and demo scenarios.
pub mod sim;
/// Coherence statistics collection and reporting.
pub mod stats;

/// Per-core access surface; obtain one with `L2Cache::l1`.
pub use crate::cache::L1Handle;
/// Shared L2 cache and directory; construct with `L2Cache::new` or `L2Cache::with_config`.
pub use crate::cache::L2Cache;
pub use crate::cache::{CacheLine, MesiState};
pub use crate::common::{AccessError, Address, CoreId};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Trace replay driver.
pub use crate::sim::Simulator;
