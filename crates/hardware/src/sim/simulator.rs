//! Simulator: replays access traces against a cache hierarchy.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::trace::{Access, Trace};
use crate::cache::L2Cache;
use crate::common::{AccessError, Address, ConfigError, CoreId};
use crate::config::Config;
use crate::stats::CoherenceStats;

/// Value returned by one read of a replayed trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ReadResult {
    /// Position of the read in the trace.
    pub index: usize,
    /// Core that issued it.
    pub core: CoreId,
    /// Address read.
    pub addr: Address,
    /// Value observed.
    pub value: u64,
}

/// Outcome of a fully replayed trace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Number of accesses executed.
    pub executed: usize,
    /// Every read, in trace order.
    pub reads: Vec<ReadResult>,
}

impl RunReport {
    /// Values of all reads, in trace order.
    pub fn values(&self) -> Vec<u64> {
        self.reads.iter().map(|r| r.value).collect()
    }
}

/// An access of a trace that the hierarchy rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("access #{index} ({access}) failed: {source}")]
pub struct RunError {
    /// Position of the failing access in the trace.
    pub index: usize,
    /// The failing access.
    pub access: Access,
    /// Why it failed.
    #[source]
    pub source: AccessError,
}

/// Top-level simulator: a cache hierarchy plus trace replay.
#[derive(Debug)]
pub struct Simulator {
    /// Cache hierarchy accesses are issued to.
    pub l2: L2Cache,
}

impl Simulator {
    /// Creates a simulator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            l2: L2Cache::with_config(config)?,
        })
    }

    /// Issues a single access.
    ///
    /// # Returns
    ///
    /// The value read, or `None` for a write.
    ///
    /// # Errors
    ///
    /// Returns an [`AccessError`] if the core does not exist or the access is invalid.
    pub fn step(&mut self, access: Access) -> Result<Option<u64>, AccessError> {
        match access {
            Access::Read { core, addr } => self.l2.l1(core)?.read(addr).map(Some),
            Access::Write { core, addr, value } => {
                self.l2.l1(core)?.write(addr, value).map(|()| None)
            }
        }
    }

    /// Replays every access of `trace` in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns a [`RunError`] naming the first access the hierarchy rejected.
    /// Accesses before it have taken effect.
    pub fn run(&mut self, trace: &Trace) -> Result<RunReport, RunError> {
        info!(accesses = trace.len(), cores = self.l2.core_count(), "replaying trace");
        let mut report = RunReport::default();
        for (index, &access) in trace.accesses().iter().enumerate() {
            let observed = self.step(access).map_err(|source| RunError {
                index,
                access,
                source,
            })?;
            if let Some(value) = observed {
                debug!(%access, value, "read");
                report.reads.push(ReadResult {
                    index,
                    core: access.core(),
                    addr: access.addr(),
                    value,
                });
            }
            report.executed += 1;
        }
        Ok(report)
    }

    /// Protocol event counters accumulated so far.
    pub const fn stats(&self) -> &CoherenceStats {
        self.l2.stats()
    }
}
