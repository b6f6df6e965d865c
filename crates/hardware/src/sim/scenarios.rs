//! Built-in demonstration scenarios.
//!
//! Each scenario is a short two-core trace against address `0xa0` together with
//! the values its reads must return under the default configuration.

use super::trace::{Access, Trace};
use crate::common::{Address, CoreId, DEFAULT_VALUE};

/// Address every scenario targets.
pub const SCENARIO_ADDR: Address = Address::new(0xa0);

/// A named trace with its expected read results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    /// Short identifier, usable on the command line.
    pub name: &'static str,
    /// One-line description.
    pub summary: &'static str,
    /// Accesses to replay.
    pub trace: Trace,
    /// Values the reads of `trace` return, in order.
    pub expected: Vec<u64>,
}

const fn read(core: usize) -> Access {
    Access::Read {
        core: CoreId(core),
        addr: SCENARIO_ADDR,
    }
}

const fn write(core: usize, value: u64) -> Access {
    Access::Write {
        core: CoreId(core),
        addr: SCENARIO_ADDR,
        value,
    }
}

/// Returns the four reference scenarios, in order.
pub fn builtin() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "write-then-remote-read",
            summary: "core 0 writes 7, core 1 reads it back",
            trace: Trace::new(vec![write(0, 7), read(1)]),
            expected: vec![7],
        },
        Scenario {
            name: "last-writer-wins",
            summary: "cores 0 and 1 write 8 then 9, both read 9",
            trace: Trace::new(vec![write(0, 8), write(1, 9), read(0), read(1)]),
            expected: vec![9, 9],
        },
        Scenario {
            name: "cold-read",
            summary: "core 0 reads a never-written word",
            trace: Trace::new(vec![read(0)]),
            expected: vec![DEFAULT_VALUE],
        },
        Scenario {
            name: "shared-read",
            summary: "cores 0 and 1 read the same word; one memory load",
            trace: Trace::new(vec![read(0), read(1)]),
            expected: vec![DEFAULT_VALUE, DEFAULT_VALUE],
        },
    ]
}

/// Looks up a built-in scenario by name.
pub fn find(name: &str) -> Option<Scenario> {
    builtin().into_iter().find(|s| s.name == name)
}
