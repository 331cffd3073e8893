//! RELATIVE relocation processing for the loader's own image
//!
//! This pass runs before any normal dynamic linking exists. It walks
//! the loader's own REL/RELA tables and applies exactly the entries
//! whose packed `r_info` matches the architecture's RELATIVE pattern;
//! everything else is left for the full resolver in a later stage.
//! The pass is single-shot: running it a second time double-adds the
//! bias and corrupts the image.

use core::mem::size_of;

use crate::arch;
use crate::elf::{ElfRel, ElfRela, ElfSym};
use crate::segments::{self, LoadSeg};

// ============================================================================
// r_info Unpacking
// ============================================================================

#[inline]
pub fn r_type(info: usize) -> u32 {
    (info & 0xffff_ffff) as u32
}

#[inline]
pub fn r_sym(info: usize) -> u32 {
    (info >> 32) as u32
}

/// A RELATIVE entry is the packed pattern itself: the RELATIVE type
/// with symbol index zero. A matching type under a nonzero symbol
/// index is some other relocation and is not ours to apply.
#[inline]
fn is_relative(info: usize) -> bool {
    info == arch::REL_RELATIVE as usize
}

// ============================================================================
// Flat-Bias Passes
// ============================================================================

/// Apply RELATIVE entries of a RELA table: store `base + addend`.
pub unsafe fn apply_rela(rela: *const ElfRela, relasz: usize, relaent: usize, base: usize) {
    let stride = if relaent == 0 {
        size_of::<ElfRela>()
    } else {
        relaent
    };
    let count = relasz / stride;

    for i in 0..count {
        let entry = &*((rela as usize + i * stride) as *const ElfRela);
        if !is_relative(entry.r_info) {
            continue;
        }
        let target = base.wrapping_add(entry.r_offset) as *mut usize;
        *target = base.wrapping_add(entry.r_addend as usize);
    }
}

/// Apply RELATIVE entries of a REL table: the addend lives in the
/// target word, so add `base` in place.
pub unsafe fn apply_rel(rel: *const ElfRel, relsz: usize, relent: usize, base: usize) {
    let stride = if relent == 0 {
        size_of::<ElfRel>()
    } else {
        relent
    };
    let count = relsz / stride;

    for i in 0..count {
        let entry = &*((rel as usize + i * stride) as *const ElfRel);
        if !is_relative(entry.r_info) {
            continue;
        }
        let target = base.wrapping_add(entry.r_offset) as *mut usize;
        *target = (*target).wrapping_add(base);
    }
}

/// Bias the first `count` GOT slots.
///
/// Architectures with a packed local-GOT area need this before either
/// relocation table is walked; the count comes from a dedicated
/// dynamic tag outside the `DynTable` range.
pub unsafe fn fixup_local_got(got: *mut usize, count: usize, base: usize) {
    for i in 0..count {
        let slot = got.add(i);
        *slot = (*slot).wrapping_add(base);
    }
}

// ============================================================================
// Function-Descriptor Pass
// ============================================================================

/// Apply the loader's own REL table on a function-descriptor target.
///
/// RELATIVE entries hold a link-time vaddr in the target word, which
/// is rewritten to its translation through the segment list. The
/// descriptor-construction kind rewrites a two-word descriptor in
/// place: the value word gains the displacement of the segment named
/// by the descriptor's second word plus the symbol's link-time value,
/// and the second word becomes the runtime GOT base, yielding a
/// callable descriptor.
pub unsafe fn apply_rel_fdpic(
    rel: *const ElfRel,
    relsz: usize,
    relent: usize,
    segs: *const LoadSeg,
    nsegs: usize,
    symtab: *const ElfSym,
    got: usize,
) {
    let stride = if relent == 0 {
        size_of::<ElfRel>()
    } else {
        relent
    };
    let count = relsz / stride;

    for i in 0..count {
        let entry = &*((rel as usize + i * stride) as *const ElfRel);

        if is_relative(entry.r_info) {
            let target = segments::translate(segs, nsegs, entry.r_offset) as *mut usize;
            *target = segments::translate(segs, nsegs, *target);
        } else if r_type(entry.r_info) == arch::REL_FUNCDESC_VALUE {
            let target = segments::translate(segs, nsegs, entry.r_offset) as *mut usize;
            let seg = &*segs.add(*target.add(1));
            let sym = &*symtab.add(r_sym(entry.r_info) as usize);
            *target = (*target)
                .wrapping_add(seg.addr.wrapping_sub(seg.p_vaddr))
                .wrapping_add(sym.st_value);
            *target.add(1) = got;
        }
    }
}
