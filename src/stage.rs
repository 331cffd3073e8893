//! Stage one: make the loader's own image internally consistent
//!
//! The trampoline lands here with the raw stack pointer and the
//! runtime address of the loader's own `.dynamic` section, and nothing
//! else can be relied on: the GOT and every global pointer in the
//! image may still hold link-time values. The pipeline is linear and
//! runs once:
//!
//!   decode stack -> decode dynamic -> bias or segments
//!     -> local-GOT prefix (where the arch needs it)
//!     -> RELA pass -> REL pass -> handoff values
//!
//! Nothing in this module may call through a pointer that depends on
//! unrelocated data, and nothing here reports errors: a malformed
//! record crashes undiagnosed, because the machinery that could
//! diagnose it only exists after this stage succeeds.

use crate::arch;
use crate::constants::*;
use crate::dynv::{self, DynTable};
use crate::elf::{ElfPhdr, ElfRel, ElfRela, ElfSym};
use crate::reloc;
use crate::segments::{self, LoadSeg};
use crate::stack::{self, AuxTable};

// ============================================================================
// Handoff
// ============================================================================

/// What the next stage is called with: the flat load bias (or the
/// load-map address on function-descriptor targets) and the untouched
/// raw stack pointer.
#[derive(Clone, Copy)]
pub struct Handoff {
    pub base: usize,
    pub sp: *const usize,
}

// ============================================================================
// Load Bias
// ============================================================================

/// Determine the loader's own load bias.
///
/// The auxiliary vector carries it directly when the kernel invoked
/// the loader as an interpreter. When the loader was executed as an
/// ordinary command the entry is absent, and the bias is recovered
/// from the difference between the runtime address of `.dynamic` and
/// the link-time vaddr recorded in the dynamic program header.
pub unsafe fn compute_load_bias(aux: &AuxTable, dynv: *const usize) -> usize {
    let base = aux.get(AT_BASE);
    if base != 0 {
        return base;
    }

    let phnum = aux.get(AT_PHNUM);
    let phent = if aux.get(AT_PHENT) != 0 {
        aux.get(AT_PHENT)
    } else {
        core::mem::size_of::<ElfPhdr>()
    };

    let mut ph = aux.get(AT_PHDR);
    for _ in 0..phnum {
        let hdr = &*(ph as *const ElfPhdr);
        if hdr.p_type == PT_DYNAMIC {
            return (dynv as usize).wrapping_sub(hdr.p_vaddr);
        }
        ph = ph.wrapping_add(phent);
    }

    0
}

// ============================================================================
// Stage-One Pipeline
// ============================================================================

/// Relocate the loader's own image and compute the handoff values.
pub unsafe fn stage_one(sp: *const usize, dynv: *const usize) -> Handoff {
    let record = stack::parse_boot_record(sp);
    let aux = stack::decode_auxv(record.auxv);
    let dynt = dynv::decode_dynv(dynv);

    if arch::DL_FDPIC {
        stage_one_fdpic(sp, dynv, &aux, &dynt)
    } else {
        stage_one_flat(sp, dynv, &aux, &dynt)
    }
}

/// Flat-address-space path: one scalar bias for the whole image.
pub unsafe fn stage_one_flat(
    sp: *const usize,
    dynv: *const usize,
    aux: &AuxTable,
    dynt: &DynTable,
) -> Handoff {
    let base = compute_load_bias(aux, dynv);

    if arch::LOCAL_GOT_FIXUP {
        let count = dynv::dyn_lookup_raw(dynv, arch::DT_LOCAL_GOT_ENTRIES);
        let got = base.wrapping_add(dynt.get(DT_PLTGOT)) as *mut usize;
        reloc::fixup_local_got(got, count, base);
    }

    if dynt.get(DT_RELA) != 0 && dynt.get(DT_RELASZ) != 0 {
        let rela = base.wrapping_add(dynt.get(DT_RELA)) as *const ElfRela;
        reloc::apply_rela(rela, dynt.get(DT_RELASZ), dynt.get(DT_RELAENT), base);
    }

    if dynt.get(DT_REL) != 0 && dynt.get(DT_RELSZ) != 0 {
        let rel = base.wrapping_add(dynt.get(DT_REL)) as *const ElfRel;
        reloc::apply_rel(rel, dynt.get(DT_RELSZ), dynt.get(DT_RELENT), base);
    }

    Handoff { base, sp }
}

/// Function-descriptor path: per-segment placement instead of one
/// bias. An FDPIC-aware loader leaves its load-map pointer in the
/// reserved word just below the boot record; a flat loader leaves
/// zero there, in which case a single fake segment built from the
/// flat bias stands in for the map.
pub unsafe fn stage_one_fdpic(
    sp: *const usize,
    dynv: *const usize,
    aux: &AuxTable,
    dynt: &DynTable,
) -> Handoff {
    let map = *sp.sub(1) as *const usize;

    if map.is_null() {
        let base = compute_load_bias(aux, dynv);
        let fake = segments::flat_segment(base);
        relocate_through_map(&fake as *const LoadSeg, 1, dynt);
        return Handoff { base, sp };
    }

    let (segs, nsegs) = segments::map_segments(map);
    relocate_through_map(segs, nsegs, dynt);
    Handoff {
        base: map as usize,
        sp,
    }
}

unsafe fn relocate_through_map(segs: *const LoadSeg, nsegs: usize, dynt: &DynTable) {
    if dynt.get(DT_REL) == 0 || dynt.get(DT_RELSZ) == 0 {
        return;
    }
    let rel = segments::translate(segs, nsegs, dynt.get(DT_REL)) as *const ElfRel;
    let symtab = segments::translate(segs, nsegs, dynt.get(DT_SYMTAB)) as *const ElfSym;
    let got = segments::translate(segs, nsegs, dynt.get(DT_PLTGOT));
    reloc::apply_rel_fdpic(
        rel,
        dynt.get(DT_RELSZ),
        dynt.get(DT_RELENT),
        segs,
        nsegs,
        symtab,
        got,
    );
}
