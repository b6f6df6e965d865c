//! Shared L2 cache acting as the coherence directory.
//!
//! The `L2Cache` owns every core's `L1Cache` and, for each line ever requested, an
//! ordered record of which caches hold it and in which state. It serves the two
//! requests an L1 cache can make on a miss:
//! 1. **Share:** grant a read-only copy, demoting at most one owner to `Shared`.
//! 2. **Ownership:** grant the only copy, invalidating every other holder.
//!
//! Data comes from a peer cache whenever one holds the line, otherwise from the
//! main memory backend.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, error, warn};

use super::l1::{L1Cache, L1Handle};
use super::line::CacheLine;
use super::state::MesiState;
use crate::common::{
    AccessError, ConfigError, CoreId, DEFAULT_VALUE, LineGeometry, LineIndex, ProtocolViolation,
};
use crate::config::Config;
use crate::memory::{DefaultFill, MainMemory};
use crate::stats::CoherenceStats;

/// One holder of a line as recorded by the directory.
///
/// The directory cannot observe the silent `Exclusive` to `Modified` upgrade of a
/// local write, so a record of `Exclusive` stands for either owned state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectoryRecord {
    /// Cache holding the line.
    pub core: CoreId,
    /// State the directory last granted or observed.
    pub state: MesiState,
}

impl DirectoryRecord {
    const fn new(core: CoreId, state: MesiState) -> Self {
        Self { core, state }
    }
}

/// Shared second-level cache and coherence directory.
#[derive(Debug)]
pub struct L2Cache {
    pub(crate) geometry: LineGeometry,
    pub(crate) caches: Vec<L1Cache>,
    pub(crate) stats: CoherenceStats,
    directory: HashMap<LineIndex, Vec<DirectoryRecord>>,
    memory: Box<dyn MainMemory>,
}

impl L2Cache {
    /// Creates a directory with `core_count` L1 caches and the default geometry
    /// and memory contents.
    pub fn new(core_count: usize) -> Self {
        let geometry = LineGeometry::default();
        Self::build(
            geometry,
            core_count,
            Box::new(DefaultFill::new(geometry, DEFAULT_VALUE)),
        )
    }

    /// Creates a directory from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn with_config(config: &Config) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        let memory = DefaultFill::new(geometry, config.memory.default_value);
        Ok(Self::build(geometry, config.cores, Box::new(memory)))
    }

    /// Creates a directory from a configuration with a custom memory backend.
    ///
    /// The backend must produce lines of the configured geometry.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn with_memory(
        config: &Config,
        memory: Box<dyn MainMemory>,
    ) -> Result<Self, ConfigError> {
        let geometry = config.validate()?;
        Ok(Self::build(geometry, config.cores, memory))
    }

    fn build(geometry: LineGeometry, core_count: usize, memory: Box<dyn MainMemory>) -> Self {
        debug!(
            cores = core_count,
            line_size = geometry.line_size(),
            word_size = geometry.word_size(),
            "building cache hierarchy"
        );
        Self {
            geometry,
            caches: (0..core_count).map(|i| L1Cache::new(CoreId(i))).collect(),
            stats: CoherenceStats::default(),
            directory: HashMap::new(),
            memory,
        }
    }

    /// All L1 caches, indexed by core.
    pub fn l1_caches(&self) -> &[L1Cache] {
        &self.caches
    }

    /// Number of cores.
    pub const fn core_count(&self) -> usize {
        self.caches.len()
    }

    fn check_core(&self, core: CoreId) -> Result<(), AccessError> {
        if core.index() >= self.caches.len() {
            return Err(AccessError::UnknownCore {
                core: core.index(),
                cores: self.caches.len(),
            });
        }
        Ok(())
    }

    /// Returns the access surface of one core.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownCore`] if the system has no such core.
    pub fn l1(&mut self, core: impl Into<CoreId>) -> Result<L1Handle<'_>, AccessError> {
        let core = core.into();
        self.check_core(core)?;
        Ok(L1Handle::new(self, core))
    }

    /// Geometry shared by every cache.
    pub const fn geometry(&self) -> LineGeometry {
        self.geometry
    }

    /// Protocol event counters.
    pub const fn stats(&self) -> &CoherenceStats {
        &self.stats
    }

    /// Directory record for `line`; empty if no core has requested it yet.
    pub fn entry(&self, line: LineIndex) -> &[DirectoryRecord] {
        self.directory.get(&line).map_or(&[], Vec::as_slice)
    }

    /// Appends a directory record without touching any L1 cache.
    ///
    /// Fault injection for tests: leaves the directory out of step with the
    /// caches on purpose.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownCore`] if the system has no such core.
    #[doc(hidden)]
    pub fn inject_record(
        &mut self,
        line: LineIndex,
        core: CoreId,
        state: MesiState,
    ) -> Result<(), AccessError> {
        self.check_core(core)?;
        self.directory
            .entry(line)
            .or_default()
            .push(DirectoryRecord::new(core, state));
        Ok(())
    }

    /// Sets the local state and contents of a line in one L1 cache without
    /// telling the directory. `Invalid` drops the line.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownCore`] if the system has no such core.
    #[doc(hidden)]
    pub fn inject_line(
        &mut self,
        core: CoreId,
        line: LineIndex,
        state: MesiState,
        data: CacheLine,
    ) -> Result<(), AccessError> {
        self.check_core(core)?;
        let cache = &mut self.caches[core.index()];
        if state.is_valid() {
            cache.fill(line, state, data);
        } else {
            let _ = cache.snoop_invalidate(line);
        }
        Ok(())
    }

    /// Serves an L1 cache that wants to write a line it does not own.
    ///
    /// Every other valid holder is snooped and invalidated; the first copy returned
    /// is the line's current contents. Afterwards the requestor is the line's only
    /// holder, recorded as `Exclusive`.
    ///
    /// # Returns
    ///
    /// The full current contents of the line, so that the words the requestor does
    /// not overwrite stay intact.
    ///
    /// `requestor` and every recorded holder must be cores of this system.
    pub(crate) fn request_for_ownership(
        &mut self,
        line: LineIndex,
        requestor: CoreId,
    ) -> CacheLine {
        self.stats.ownership_requests += 1;
        let granted = vec![DirectoryRecord::new(requestor, MesiState::Exclusive)];

        let Some(records) = self.directory.insert(line, granted) else {
            debug!(%line, core = %requestor, "ownership granted from memory");
            return self.load_from_memory(line);
        };

        let mut current = None;
        for record in records
            .iter()
            .filter(|r| r.core != requestor && r.state.is_valid())
        {
            self.stats.snoop_invalidations += 1;
            let snooped = self.caches[record.core.index()].snoop_invalidate(line);
            if snooped.is_none() {
                warn!(%line, holder = %record.core, "stale directory record on invalidate");
            }
            current = current.or(snooped);
        }

        if let Some(data) = current {
            self.stats.cache_to_cache_transfers += 1;
            debug!(%line, core = %requestor, "ownership granted from peer");
            return data;
        }
        // No peer had it; an upgrading requestor already holds the current copy.
        if let Some(own) = self.caches[requestor.index()].line(line) {
            debug!(%line, core = %requestor, "ownership upgrade in place");
            return CacheLine::copy_of(own);
        }
        debug!(%line, core = %requestor, "ownership granted from memory, holders stale");
        self.load_from_memory(line)
    }

    /// Serves an L1 cache that wants to read a line it does not hold.
    ///
    /// If some cache owns the line it is demoted to `Shared` and its data returned.
    /// Otherwise any `Shared` holder's copy is current. If no holder yields data the
    /// line is reloaded from memory. The requestor is appended as `Shared`.
    ///
    /// Every recorded holder must be a core of this system.
    pub(crate) fn request_for_share(&mut self, line: LineIndex, requestor: CoreId) -> CacheLine {
        self.stats.share_requests += 1;

        let Some(records) = self.directory.get_mut(&line) else {
            let _ = self
                .directory
                .insert(line, vec![DirectoryRecord::new(requestor, MesiState::Shared)]);
            debug!(%line, core = %requestor, "share granted from memory");
            return self.load_from_memory(line);
        };
        records.retain(|r| r.core != requestor);

        let mut found = None;
        if let Some(owner) = records.iter_mut().find(|r| r.state.is_owned()) {
            self.stats.snoop_shares += 1;
            found = self.caches[owner.core.index()].snoop_share(line);
            if found.is_some() {
                debug!(%line, core = %requestor, owner = %owner.core, "owner demoted to shared");
                owner.state = MesiState::Shared;
            } else {
                warn!(%line, holder = %owner.core, "stale owner record on share");
                owner.state = MesiState::Invalid;
            }
        }

        if found.is_none() {
            for record in records.iter_mut().filter(|r| r.state == MesiState::Shared) {
                found = self.caches[record.core.index()]
                    .line(line)
                    .map(CacheLine::copy_of);
                if found.is_some() {
                    break;
                }
                warn!(%line, holder = %record.core, "stale shared record");
                record.state = MesiState::Invalid;
            }
        }

        records.push(DirectoryRecord::new(requestor, MesiState::Shared));
        if let Some(data) = found {
            self.stats.cache_to_cache_transfers += 1;
            debug!(%line, core = %requestor, "share granted from peer");
            return data;
        }
        debug!(%line, core = %requestor, "share granted from memory, holders stale");
        self.load_from_memory(line)
    }

    fn load_from_memory(&mut self, line: LineIndex) -> CacheLine {
        self.stats.memory_loads += 1;
        self.memory.load(line)
    }

    /// Checks every line against the MESI invariants.
    ///
    /// Verifies that no line has more than one owner, that an owned line has no
    /// other valid holder, that all `Shared` copies are identical, and that the
    /// directory records agree with the caches' local states.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProtocolViolation`] found, scanning lines in ascending order.
    pub fn verify(&self) -> Result<(), ProtocolViolation> {
        let lines: BTreeSet<LineIndex> = self
            .directory
            .keys()
            .copied()
            .chain(
                self.caches
                    .iter()
                    .flat_map(|c| c.resident().map(|(line, _)| line)),
            )
            .collect();
        lines.into_iter().try_for_each(|line| self.verify_line(line))
    }

    /// Checks one line against the MESI invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProtocolViolation`] found on `line`.
    pub fn verify_line(&self, line: LineIndex) -> Result<(), ProtocolViolation> {
        let holders: Vec<(CoreId, MesiState)> = self
            .caches
            .iter()
            .map(|c| (c.id(), c.state(line)))
            .filter(|(_, state)| state.is_valid())
            .collect();

        let owners: Vec<CoreId> = holders
            .iter()
            .filter(|(_, state)| state.is_owned())
            .map(|(core, _)| *core)
            .collect();
        if owners.len() > 1 {
            return Err(ProtocolViolation::MultipleOwners {
                line,
                count: owners.len(),
            });
        }
        if let Some(&owner) = owners.first()
            && let Some(&(holder, _)) = holders.iter().find(|(core, _)| *core != owner)
        {
            return Err(ProtocolViolation::OwnedLineShared {
                line,
                owner,
                holder,
            });
        }

        let mut shared = holders
            .iter()
            .filter(|(_, state)| *state == MesiState::Shared)
            .filter_map(|(core, _)| Some((*core, self.caches[core.index()].line(line)?)));
        if let Some((first, reference)) = shared.next()
            && let Some((second, _)) = shared.find(|(_, data)| data.words() != reference.words())
        {
            return Err(ProtocolViolation::SharedDataDiverged {
                line,
                first,
                second,
            });
        }

        let records = self.entry(line);
        for record in records {
            let actual = self.caches[record.core.index()].state(line);
            let agrees = record.state == actual || (record.state.is_owned() && actual.is_owned());
            if !agrees {
                return Err(ProtocolViolation::DirectoryMismatch {
                    line,
                    core: record.core,
                    recorded: record.state,
                    actual,
                });
            }
        }
        for &(core, actual) in &holders {
            if !records.iter().any(|r| r.core == core) {
                return Err(ProtocolViolation::UntrackedHolder { line, core, actual });
            }
        }
        Ok(())
    }

    /// Asserts the protocol invariants of the line just accessed, in debug builds.
    pub(crate) fn check_invariants(&self, line: LineIndex) {
        if cfg!(debug_assertions)
            && let Err(violation) = self.verify_line(line)
        {
            error!(%violation, "coherence invariant broken");
            panic!("coherence invariant broken: {violation}");
        }
    }
}
