//! Load Bias Determination Tests
//!
//! The direct path (auxv base entry) and the indirect path: walking
//! the program headers for the dynamic segment and subtracting its
//! link-time vaddr from the runtime address of `.dynamic`. The
//! indirect path is what runs when the loader is executed as an
//! ordinary command.

#[cfg(test)]
mod tests {
    use core::mem::size_of;

    use crate::constants::*;
    use crate::elf::ElfPhdr;
    use crate::stack::decode_auxv;
    use crate::stage::compute_load_bias;

    fn phdr(p_type: u32, p_vaddr: usize) -> ElfPhdr {
        ElfPhdr {
            p_type,
            p_flags: 0,
            p_offset: 0,
            p_vaddr,
            p_paddr: 0,
            p_filesz: 0,
            p_memsz: 0,
            p_align: 0x1000,
        }
    }

    #[test]
    fn test_direct_base_entry_wins() {
        let auxv = vec![
            AT_BASE, 0x7f00_0000,
            AT_PHDR, 0xbad0_bad0, // must not be walked when the base is present
            AT_PHNUM, 99,
            AT_NULL, 0,
        ];
        let aux = unsafe { decode_auxv(auxv.as_ptr()) };
        let dynv = [DT_NULL, 0usize];

        let bias = unsafe { compute_load_bias(&aux, dynv.as_ptr()) };

        assert_eq!(bias, 0x7f00_0000);
    }

    #[test]
    fn test_bias_from_dynamic_program_header() {
        let dyn_vaddr = 0x3000;
        let phdrs = [
            phdr(PT_LOAD, 0),
            phdr(PT_DYNAMIC, dyn_vaddr),
            phdr(PT_NOTE, 0x5000),
        ];
        let dynv = [DT_NULL, 0usize];

        let auxv = vec![
            AT_PHDR, phdrs.as_ptr() as usize,
            AT_PHNUM, phdrs.len(),
            AT_PHENT, size_of::<ElfPhdr>(),
            AT_NULL, 0,
        ];
        let aux = unsafe { decode_auxv(auxv.as_ptr()) };

        let bias = unsafe { compute_load_bias(&aux, dynv.as_ptr()) };

        let dynv_runtime = dynv.as_ptr() as usize;
        assert_eq!(bias, dynv_runtime.wrapping_sub(dyn_vaddr));
        // The bias must map the segment's link vaddr back onto the
        // runtime location of .dynamic.
        assert_eq!(bias.wrapping_add(dyn_vaddr), dynv_runtime);
    }

    #[test]
    fn test_phdr_stride_defaults() {
        let dyn_vaddr = 0x4000;
        let phdrs = [phdr(PT_LOAD, 0), phdr(PT_DYNAMIC, dyn_vaddr)];
        let dynv = [DT_NULL, 0usize];

        let auxv = vec![
            AT_PHDR, phdrs.as_ptr() as usize,
            AT_PHNUM, phdrs.len(),
            AT_NULL, 0,
        ];
        let aux = unsafe { decode_auxv(auxv.as_ptr()) };

        let bias = unsafe { compute_load_bias(&aux, dynv.as_ptr()) };

        assert_eq!(bias, (dynv.as_ptr() as usize).wrapping_sub(dyn_vaddr));
    }

    #[test]
    fn test_no_dynamic_header_yields_zero() {
        let phdrs = [phdr(PT_LOAD, 0), phdr(PT_NOTE, 0x5000)];
        let dynv = [DT_NULL, 0usize];

        let auxv = vec![
            AT_PHDR, phdrs.as_ptr() as usize,
            AT_PHNUM, phdrs.len(),
            AT_PHENT, size_of::<ElfPhdr>(),
            AT_NULL, 0,
        ];
        let aux = unsafe { decode_auxv(auxv.as_ptr()) };

        let bias = unsafe { compute_load_bias(&aux, dynv.as_ptr()) };

        assert_eq!(bias, 0, "an image with no dynamic segment has no recoverable bias");
    }
}
