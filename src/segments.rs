//! Load-segment model for function-descriptor targets
//!
//! On function-descriptor (FDPIC) architectures there is no single
//! load bias: each loaded segment has its own placement, and every
//! link-time address must be translated through a segment list. The
//! OS loader hands the list over as a load map; when the loader was
//! not FDPIC-aware, stage one synthesizes a single all-encompassing
//! segment from the flat bias instead.

// ============================================================================
// Load Map
// ============================================================================

/// One loaded segment: runtime base, link-time vaddr, span.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct LoadSeg {
    pub addr: usize,
    pub p_vaddr: usize,
    pub p_memsz: usize,
}

/// View a raw load map (entry count followed by segment triples).
pub unsafe fn map_segments(map: *const usize) -> (*const LoadSeg, usize) {
    let nsegs = *map;
    (map.add(1) as *const LoadSeg, nsegs)
}

/// Single segment spanning the whole address space, for images placed
/// by a flat (non-FDPIC-aware) loader.
pub fn flat_segment(base: usize) -> LoadSeg {
    LoadSeg {
        addr: base,
        p_vaddr: 0,
        p_memsz: usize::MAX,
    }
}

/// Translate a link-time vaddr to its runtime address.
///
/// A vaddr covered by no segment translates to null and crashes at
/// first use; no diagnostic channel exists yet.
pub unsafe fn translate(segs: *const LoadSeg, nsegs: usize, vaddr: usize) -> usize {
    for i in 0..nsegs {
        let seg = &*segs.add(i);
        if vaddr.wrapping_sub(seg.p_vaddr) < seg.p_memsz {
            return seg.addr.wrapping_add(vaddr.wrapping_sub(seg.p_vaddr));
        }
    }
    0
}
