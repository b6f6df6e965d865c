//! Coherence statistics collection and reporting.
//!
//! This module tracks protocol events for a cache hierarchy. It provides:
//! 1. **Accesses:** Reads and writes issued by the cores, split into hits and misses.
//! 2. **Directory:** Share and ownership requests served by the L2.
//! 3. **Snoops:** Invalidations and demotions sent to peer L1 caches.
//! 4. **Data Sources:** Cache-to-cache transfers versus main memory loads.

use serde::Serialize;

/// Protocol event counters for one `L2Cache` and its L1 caches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CoherenceStats {
    /// Reads issued by all cores.
    pub reads: u64,
    /// Reads served by a valid local line.
    pub read_hits: u64,
    /// Reads that had to request the line for sharing.
    pub read_misses: u64,

    /// Writes issued by all cores.
    pub writes: u64,
    /// Writes to a line already held `Exclusive` or `Modified`.
    pub write_hits: u64,
    /// Writes to a `Shared` line, requiring an ownership upgrade.
    pub write_upgrades: u64,
    /// Writes to an `Invalid` line.
    pub write_misses: u64,

    /// Share requests served by the directory.
    pub share_requests: u64,
    /// Ownership requests served by the directory.
    pub ownership_requests: u64,

    /// Invalidation snoops sent to peer caches.
    pub snoop_invalidations: u64,
    /// Share (demotion) snoops sent to owning caches.
    pub snoop_shares: u64,

    /// Requests answered with a peer cache's copy.
    pub cache_to_cache_transfers: u64,
    /// Lines loaded from main memory.
    pub memory_loads: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"access"`, `"directory"`, `"traffic"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["access", "directory", "traffic"];

impl CoherenceStats {
    /// Fraction of accesses (reads and writes) served without the directory.
    pub const fn hit_rate(&self) -> f64 {
        let total = self.reads + self.writes;
        if total == 0 {
            return 0.0;
        }
        (self.read_hits + self.write_hits) as f64 / total as f64
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let pct = |part: u64, whole: u64| {
            if whole == 0 {
                0.0
            } else {
                (part as f64 / whole as f64) * 100.0
            }
        };

        println!("\n==========================================================");
        println!("MESI COHERENCE STATISTICS");
        println!("==========================================================");
        if want("access") {
            println!("ACCESSES");
            println!("  reads                  {}", self.reads);
            println!(
                "  reads.hit              {} ({:.2}%)",
                self.read_hits,
                pct(self.read_hits, self.reads)
            );
            println!("  reads.miss             {}", self.read_misses);
            println!("  writes                 {}", self.writes);
            println!(
                "  writes.hit             {} ({:.2}%)",
                self.write_hits,
                pct(self.write_hits, self.writes)
            );
            println!("  writes.upgrade         {}", self.write_upgrades);
            println!("  writes.miss            {}", self.write_misses);
            println!("  hit_rate               {:.2}%", self.hit_rate() * 100.0);
            println!("----------------------------------------------------------");
        }
        if want("directory") {
            println!("DIRECTORY");
            println!("  requests.share         {}", self.share_requests);
            println!("  requests.ownership     {}", self.ownership_requests);
            println!("  snoops.invalidate      {}", self.snoop_invalidations);
            println!("  snoops.share           {}", self.snoop_shares);
            println!("----------------------------------------------------------");
        }
        if want("traffic") {
            let served = self.cache_to_cache_transfers + self.memory_loads;
            println!("DATA SOURCES");
            println!(
                "  cache_to_cache         {} ({:.2}%)",
                self.cache_to_cache_transfers,
                pct(self.cache_to_cache_transfers, served)
            );
            println!(
                "  memory_loads           {} ({:.2}%)",
                self.memory_loads,
                pct(self.memory_loads, served)
            );
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
