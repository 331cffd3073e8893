//! Dynamic section decoding
//!
//! Stage one scans the loader's own `.dynamic` entries into a
//! fixed-size table of raw, link-time values. No value is biased
//! here; the relocation pass adds the load bias where an address is
//! actually needed.

use crate::constants::*;
use crate::elf::ElfDyn;

// ============================================================================
// Dynamic Section Table
// ============================================================================

/// Fixed-size table of dynamic-section values, indexed by tag.
#[derive(Clone, Copy)]
pub struct DynTable {
    slots: [usize; DYN_CNT],
}

impl DynTable {
    pub const fn new() -> Self {
        Self {
            slots: [0; DYN_CNT],
        }
    }

    /// Raw value for `tag`, or zero when the section did not carry it.
    pub fn get(&self, tag: usize) -> usize {
        if tag < DYN_CNT {
            self.slots[tag]
        } else {
            0
        }
    }
}

/// Decode the `.dynamic` entries into a `DynTable`.
///
/// Tags at or above `DYN_CNT` are dropped; nothing is ever written
/// outside the fixed table.
pub unsafe fn decode_dynv(dynv: *const usize) -> DynTable {
    let mut table = DynTable::new();
    let mut p = dynv as *const ElfDyn;
    while (*p).d_tag != DT_NULL {
        let entry = *p;
        if entry.d_tag < DYN_CNT {
            table.slots[entry.d_tag] = entry.d_val;
        }
        p = p.add(1);
    }
    table
}

/// Scan the raw `.dynamic` entries for one tag.
///
/// Used for implementation-specific tags whose numeric value lies
/// outside the `DynTable` range (the local-GOT entry count on
/// architectures that have one). Returns zero when absent.
pub unsafe fn dyn_lookup_raw(dynv: *const usize, tag: usize) -> usize {
    let mut p = dynv as *const ElfDyn;
    while (*p).d_tag != DT_NULL {
        if (*p).d_tag == tag {
            return (*p).d_val;
        }
        p = p.add(1);
    }
    0
}
