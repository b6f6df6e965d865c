//! # L1 Cache Tests
//!
//! The per-core access surface (`L1Handle`) and the snoop entry points of
//! `L1Cache`. Directory-side effects are covered in `directory`.

use mesi_core::cache::L1Cache;
use mesi_core::common::{AccessError, AddressError, CoreId, LineIndex, ValueError};
use mesi_core::stats::CoherenceStats;
use mesi_core::{Address, L2Cache, MesiState};
use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

const A: u64 = 0xa0;

// ══════════════════════════════════════════════════════════
// 1. Empty cache
// ══════════════════════════════════════════════════════════

/// A fresh cache is named after its core and holds nothing.
#[test]
fn fresh_cache_is_empty() {
    let cache = L1Cache::new(CoreId(3));
    assert_eq!(cache.id(), CoreId(3));
    assert_eq!(cache.name(), "L1-3");
    assert_eq!(cache.state(LineIndex(0)), MesiState::Invalid);
    assert!(cache.line(LineIndex(0)).is_none());
    assert_eq!(cache.resident().count(), 0);
}

/// Snoops on a line the cache does not hold return nothing and change nothing.
#[test]
fn snoops_on_absent_line_return_none() {
    let mut cache = L1Cache::new(CoreId(0));
    assert!(cache.snoop_invalidate(LineIndex(1)).is_none());
    assert!(cache.snoop_share(LineIndex(1)).is_none());
    assert_eq!(cache.state(LineIndex(1)), MesiState::Invalid);
}

// ══════════════════════════════════════════════════════════
// 2. Local state transitions
// ══════════════════════════════════════════════════════════

/// A read miss leaves the line `Shared`; a write leaves it `Modified`.
#[test]
fn read_then_write_transitions() {
    let mut ctx = TestContext::new(1);
    let _ = ctx.read(0, A);
    assert_eq!(ctx.states(A), vec![MesiState::Shared]);
    ctx.write(0, A, 1);
    assert_eq!(ctx.states(A), vec![MesiState::Modified]);
}

/// Reading back a value written locally hits without a directory request.
#[test]
fn local_write_then_read_hits() {
    let mut ctx = TestContext::new(2);
    ctx.write(0, A, 12);
    assert_eq!(ctx.read(0, A), 12);
    assert_eq!(ctx.l2.stats().read_hits, 1);
    assert_eq!(ctx.l2.stats().share_requests, 0);
}

/// Every word of a line is independently addressable through the handle.
#[test]
fn words_of_one_line_are_independent() {
    let mut ctx = TestContext::new(1);
    ctx.write(0, 0x0, 1);
    ctx.write(0, 0x8, 2);
    ctx.write(0, 0x1f8, 3);
    assert_eq!(ctx.read(0, 0x0), 1);
    assert_eq!(ctx.read(0, 0x8), 2);
    assert_eq!(ctx.read(0, 0x10), 99);
    assert_eq!(ctx.read(0, 0x1f8), 3);
}

/// Resident lines are listed with their states.
#[test]
fn resident_lists_valid_lines() {
    let mut ctx = TestContext::new(1);
    ctx.write(0, 0x0, 1);
    let _ = ctx.read(0, 0x400);
    let mut resident: Vec<_> = ctx.l2.l1_caches()[0].resident().collect();
    resident.sort_by_key(|(line, _)| *line);
    assert_eq!(
        resident,
        vec![
            (LineIndex(0), MesiState::Modified),
            (LineIndex(2), MesiState::Shared)
        ]
    );
}

// ══════════════════════════════════════════════════════════
// 3. Rejected accesses
// ══════════════════════════════════════════════════════════

/// A misaligned read fails before any protocol traffic.
#[test]
fn misaligned_read_has_no_side_effects() {
    let mut l2 = L2Cache::new(2);
    let err = l2.l1(0).unwrap().read(Address(0xa1)).unwrap_err();
    assert_eq!(
        err,
        AccessError::Address(AddressError::Misaligned {
            offset: 0xa1,
            word_size: 8
        })
    );
    assert_eq!(*l2.stats(), CoherenceStats::default());
    assert!(l2.entry(LineIndex(0)).is_empty());
    assert_eq!(l2.l1_caches()[0].state(LineIndex(0)), MesiState::Invalid);
}

/// An oversized write value fails before ownership is requested.
#[test]
fn oversized_write_has_no_side_effects() {
    let mut ctx = TestContext::new(2);
    let _ = ctx.read(1, A);
    let err = ctx.l2.l1(0).unwrap().write(Address(A), 256).unwrap_err();
    assert_eq!(
        err,
        AccessError::Value(ValueError {
            value: 256,
            word_size: 8
        })
    );
    assert_eq!(ctx.states(A), vec![MesiState::Invalid, MesiState::Shared]);
    assert_eq!(ctx.l2.stats().ownership_requests, 0);
}

/// Asking for a core the system does not have is an error, not a panic.
#[test]
fn unknown_core_is_rejected() {
    let mut l2 = L2Cache::new(2);
    assert_eq!(
        l2.l1(2).map(|h| h.core()).unwrap_err(),
        AccessError::UnknownCore { core: 2, cores: 2 }
    );
    assert_eq!(l2.l1(CoreId(1)).unwrap().core(), CoreId(1));
}
