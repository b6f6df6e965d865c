//! Common utilities and types used throughout the coherence simulator.
//!
//! This module provides the building blocks shared by the caches and the directory:
//! 1. **Address Types:** Strong types for addresses, line indices, and offsets.
//! 2. **Constants:** Reference geometry and memory fill value.
//! 3. **Identifiers:** `CoreId` naming a core and its L1 cache.
//! 4. **Error Handling:** Caller-facing access errors and protocol violations.

/// Address model (address, line index, offset, geometry).
pub mod addr;

/// Reference constants used to seed the default configuration.
pub mod constants;

/// Error types for accesses, configuration, and protocol invariants.
pub mod error;

/// Core identifiers.
pub mod id;

pub use addr::{Address, LineGeometry, LineIndex, LineOffset};
pub use constants::{DEFAULT_LINE_SIZE, DEFAULT_VALUE, DEFAULT_WORD_SIZE};
pub use error::{AccessError, AddressError, ConfigError, ProtocolViolation, ValueError};
pub use id::CoreId;
