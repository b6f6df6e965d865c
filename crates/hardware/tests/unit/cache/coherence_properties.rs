//! # Coherence Properties
//!
//! Random access sequences over a few lines and cores, checked after every step
//! against a flat memory model and the MESI invariants.

use std::collections::HashMap;

use mesi_core::common::{DEFAULT_VALUE, LineIndex};
use mesi_core::{Address, L2Cache, MesiState};
use proptest::prelude::*;

const CORES: usize = 3;

#[derive(Clone, Copy, Debug)]
enum Op {
    Read { core: usize, addr: u64 },
    Write { core: usize, addr: u64, value: u64 },
}

/// Addresses spread over three lines, a handful of words each.
fn addr() -> impl Strategy<Value = u64> {
    (0_u64..3, 0_u64..4).prop_map(|(line, word)| line * 0x200 + word * 8)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..CORES, addr()).prop_map(|(core, addr)| Op::Read { core, addr }),
        (0..CORES, addr(), 0_u64..256).prop_map(|(core, addr, value)| Op::Write {
            core,
            addr,
            value
        }),
    ]
}

/// Per line: at most one owner, and an owner excludes every other holder.
fn mutual_exclusion_holds(l2: &L2Cache, line: LineIndex) -> bool {
    let states: Vec<MesiState> = l2.l1_caches().iter().map(|c| c.state(line)).collect();
    let owners = states.iter().filter(|s| s.is_owned()).count();
    let valid = states.iter().filter(|s| s.is_valid()).count();
    owners == 0 || (owners == 1 && valid == 1)
}

/// Per line: every `Shared` copy holds identical words.
fn shared_copies_agree(l2: &L2Cache, line: LineIndex) -> bool {
    let mut copies = l2
        .l1_caches()
        .iter()
        .filter(|c| c.state(line) == MesiState::Shared)
        .filter_map(|c| c.line(line));
    copies
        .next()
        .is_none_or(|first| copies.all(|other| other.words() == first.words()))
}

proptest! {
    /// Every read returns the most recent write to its address, or the default.
    #[test]
    fn reads_observe_latest_write(ops in prop::collection::vec(op(), 1..80)) {
        let mut l2 = L2Cache::new(CORES);
        let mut model: HashMap<u64, u64> = HashMap::new();

        for op in ops {
            match op {
                Op::Read { core, addr } => {
                    let value = l2.l1(core).unwrap().read(Address(addr)).unwrap();
                    let expected = model.get(&addr).copied().unwrap_or(DEFAULT_VALUE);
                    prop_assert_eq!(value, expected, "read {:#x} on core {}", addr, core);
                }
                Op::Write { core, addr, value } => {
                    l2.l1(core).unwrap().write(Address(addr), value).unwrap();
                    let _ = model.insert(addr, value);
                }
            }

            prop_assert_eq!(l2.verify(), Ok(()));
            for line in (0..3).map(LineIndex) {
                prop_assert!(mutual_exclusion_holds(&l2, line));
                prop_assert!(shared_copies_agree(&l2, line));
            }
        }
    }

    /// Reads alone never create an owner and load each line at most once.
    #[test]
    fn read_only_traffic_stays_shared(
        reads in prop::collection::vec((0..CORES, addr()), 1..40)
    ) {
        let mut l2 = L2Cache::new(CORES);
        for (core, addr) in reads {
            prop_assert_eq!(l2.l1(core).unwrap().read(Address(addr)), Ok(DEFAULT_VALUE));
        }
        for cache in l2.l1_caches() {
            prop_assert!(cache.resident().all(|(_, state)| state == MesiState::Shared));
        }
        prop_assert!(l2.stats().memory_loads <= 3);
    }
}
