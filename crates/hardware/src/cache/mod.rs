//! MESI cache hierarchy.
//!
//! Per-core L1 caches coordinated by a shared L2 cache acting as the directory.
//! Every access runs to completion before the next one starts; snoops are direct
//! calls from the directory into the peer caches it owns.

/// Private per-core cache and the per-core access handle.
pub mod l1;

/// Shared L2 cache and coherence directory.
pub mod l2;

/// Cache line data.
pub mod line;

/// MESI state enum.
pub mod state;

pub use l1::{L1Cache, L1Handle};
pub use l2::{DirectoryRecord, L2Cache};
pub use line::CacheLine;
pub use state::MesiState;
