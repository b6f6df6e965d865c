//! Trace-driven simulation.
//!
//! Provides the text trace format, the simulator that replays traces against a
//! cache hierarchy, and the built-in demonstration scenarios.

/// Built-in two-core scenarios.
pub mod scenarios;

/// Trace replay over an `L2Cache`.
pub mod simulator;

/// Trace format and parser.
pub mod trace;

pub use scenarios::Scenario;
pub use simulator::{ReadResult, RunError, RunReport, Simulator};
pub use trace::{Access, Trace, TraceError, TraceErrorKind};
