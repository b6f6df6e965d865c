//! Per-core L1 cache.
//!
//! An `L1Cache` holds private copies of lines together with their MESI state. It
//! does not talk to the directory on its own: the owning `L2Cache` drives it through
//! two surfaces.
//! 1. **Core Surface:** `L1Handle::read` / `L1Handle::write`, the accesses a core issues.
//! 2. **Snoop Surface:** `snoop_invalidate` / `snoop_share`, invoked by the directory
//!    while it serves another core's request.

use std::collections::HashMap;

use tracing::trace;

use super::l2::L2Cache;
use super::line::CacheLine;
use super::state::MesiState;
use crate::common::{AccessError, Address, CoreId, LineIndex, LineOffset, ProtocolViolation};

/// A line held by an L1 cache. Entries only exist for valid states.
#[derive(Clone, Debug)]
struct LineEntry {
    state: MesiState,
    data: CacheLine,
}

/// Private cache of one core.
#[derive(Clone, Debug)]
pub struct L1Cache {
    id: CoreId,
    lines: HashMap<LineIndex, LineEntry>,
}

impl L1Cache {
    /// Creates an empty cache for `id`; every line starts `Invalid`.
    pub fn new(id: CoreId) -> Self {
        Self {
            id,
            lines: HashMap::new(),
        }
    }

    /// Core that owns this cache.
    pub const fn id(&self) -> CoreId {
        self.id
    }

    /// Display name of the cache (`L1-<n>`).
    pub fn name(&self) -> String {
        self.id.to_string()
    }

    /// Local MESI state of `line`; `Invalid` when the cache has no entry.
    pub fn state(&self, line: LineIndex) -> MesiState {
        self.lines
            .get(&line)
            .map_or(MesiState::Invalid, |entry| entry.state)
    }

    /// Local copy of `line`, if the cache holds it.
    pub fn line(&self, line: LineIndex) -> Option<&CacheLine> {
        self.lines.get(&line).map(|entry| &entry.data)
    }

    /// Lines currently held in a valid state, with their states.
    pub fn resident(&self) -> impl Iterator<Item = (LineIndex, MesiState)> + '_ {
        self.lines.iter().map(|(line, entry)| (*line, entry.state))
    }

    /// Directory request: give up `line` entirely.
    ///
    /// # Returns
    ///
    /// The line's contents if this cache held it (acting as both data transfer and
    /// acknowledgment), or `None` if it was already `Invalid`.
    pub fn snoop_invalidate(&mut self, line: LineIndex) -> Option<CacheLine> {
        self.lines.remove(&line).map(|entry| {
            trace!(cache = %self.id, %line, from = %entry.state, "snoop invalidate");
            entry.data
        })
    }

    /// Directory request: demote `line` to `Shared` and hand over a copy.
    ///
    /// # Returns
    ///
    /// A copy of the line, or `None` if the cache turned out not to hold it.
    pub fn snoop_share(&mut self, line: LineIndex) -> Option<CacheLine> {
        let entry = self.lines.get_mut(&line)?;
        trace!(cache = %self.id, %line, from = %entry.state, "snoop share");
        entry.state = MesiState::Shared;
        Some(CacheLine::copy_of(&entry.data))
    }

    /// Installs a line received from the directory.
    pub(crate) fn fill(&mut self, line: LineIndex, state: MesiState, data: CacheLine) {
        let _ = self.lines.insert(line, LineEntry { state, data });
    }

    /// Reads a word from a resident line.
    fn load_word(&self, line: LineIndex, offset: LineOffset) -> Result<u64, AccessError> {
        let entry = self.lines.get(&line).ok_or(ProtocolViolation::MissingLine {
            line,
            core: self.id,
        })?;
        Ok(entry.data.get(offset)?)
    }

    /// Writes a word into a resident, owned line and marks it `Modified`.
    fn store_word(
        &mut self,
        line: LineIndex,
        offset: LineOffset,
        value: u64,
    ) -> Result<(), AccessError> {
        let entry = self
            .lines
            .get_mut(&line)
            .ok_or(ProtocolViolation::MissingLine {
                line,
                core: self.id,
            })?;
        entry.data.set(offset, value)?;
        entry.state = MesiState::Modified;
        Ok(())
    }
}

/// The access surface of one core: its L1 cache, wired to the shared directory.
///
/// A handle mutably borrows the whole `L2Cache` for as long as it lives, so
/// accesses from different cores are totally ordered.
#[derive(Debug)]
pub struct L1Handle<'a> {
    l2: &'a mut L2Cache,
    core: CoreId,
}

impl<'a> L1Handle<'a> {
    /// Wraps `core` of `l2`. The caller has checked that the core exists.
    pub(crate) const fn new(l2: &'a mut L2Cache, core: CoreId) -> Self {
        Self { l2, core }
    }

    /// Core this handle issues accesses for.
    pub const fn core(&self) -> CoreId {
        self.core
    }

    /// Reads the word at `addr`.
    ///
    /// On a miss the line is requested for sharing from the directory and kept
    /// locally in `Shared`. The returned value reflects the most recent write to
    /// `addr` by any core.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Address`] if `addr` is not word-aligned. No protocol
    /// traffic happens in that case.
    pub fn read(&mut self, addr: Address) -> Result<u64, AccessError> {
        let core = self.core;
        let l2 = &mut *self.l2;
        let (line, offset) = l2.geometry.split(addr);
        let _ = l2.geometry.word_index(offset)?;

        l2.stats.reads += 1;
        if l2.caches[core.index()].state(line).is_valid() {
            l2.stats.read_hits += 1;
            trace!(cache = %core, %addr, "read hit");
        } else {
            l2.stats.read_misses += 1;
            let data = l2.request_for_share(line, core);
            l2.caches[core.index()].fill(line, MesiState::Shared, data);
        }

        let value = l2.caches[core.index()].load_word(line, offset);
        l2.check_invariants(line);
        value
    }

    /// Writes `value` to the word at `addr`.
    ///
    /// Unless the line is already held `Exclusive` or `Modified`, ownership is
    /// requested from the directory first, which invalidates every other copy.
    /// The line ends up `Modified` in this cache.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Address`] for a misaligned address and
    /// [`AccessError::Value`] if `value` does not fit in a word. Both are checked
    /// before any protocol traffic.
    pub fn write(&mut self, addr: Address, value: u64) -> Result<(), AccessError> {
        let core = self.core;
        let l2 = &mut *self.l2;
        let (line, offset) = l2.geometry.split(addr);
        let _ = l2.geometry.word_index(offset)?;
        l2.geometry.check_value(value)?;

        l2.stats.writes += 1;
        match l2.caches[core.index()].state(line) {
            MesiState::Modified | MesiState::Exclusive => {
                l2.stats.write_hits += 1;
                trace!(cache = %core, %addr, "write hit");
            }
            state => {
                if state == MesiState::Shared {
                    l2.stats.write_upgrades += 1;
                } else {
                    l2.stats.write_misses += 1;
                }
                let data = l2.request_for_ownership(line, core);
                l2.caches[core.index()].fill(line, MesiState::Exclusive, data);
            }
        }

        let result = l2.caches[core.index()].store_word(line, offset, value);
        l2.check_invariants(line);
        result
    }
}
