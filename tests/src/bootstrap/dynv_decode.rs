//! Dynamic Section Decoding Tests
//!
//! The loader's own `.dynamic` scan: raw values into the fixed table,
//! out-of-range tags dropped, and the raw scan used for
//! implementation-specific tags outside the table range.

#[cfg(test)]
mod tests {
    use crate::constants::*;
    use crate::dynv::{decode_dynv, dyn_lookup_raw};

    #[test]
    fn test_tags_decoded_into_table() {
        let dynv = vec![
            DT_RELA, 0x600,
            DT_RELASZ, 72,
            DT_RELAENT, 24,
            DT_SYMTAB, 0x300,
            DT_NULL, 0,
        ];

        let dynt = unsafe { decode_dynv(dynv.as_ptr()) };

        assert_eq!(dynt.get(DT_RELA), 0x600);
        assert_eq!(dynt.get(DT_RELASZ), 72);
        assert_eq!(dynt.get(DT_RELAENT), 24);
        assert_eq!(dynt.get(DT_SYMTAB), 0x300);
        assert_eq!(dynt.get(DT_REL), 0, "absent tag should read as zero");
    }

    #[test]
    fn test_values_stay_link_time() {
        // The decoder must not bias address-valued tags; the relocation
        // pass adds the base itself.
        let dynv = vec![DT_PLTGOT, 0x900, DT_NULL, 0];

        let dynt = unsafe { decode_dynv(dynv.as_ptr()) };

        assert_eq!(dynt.get(DT_PLTGOT), 0x900);
    }

    #[test]
    fn test_out_of_range_tags_ignored() {
        let dynv = vec![
            0x6fff_fef5, 0x123, // GNU-extension tag, outside the table
            DT_PLTGOT, 0x900,
            DT_NULL, 0,
        ];

        let dynt = unsafe { decode_dynv(dynv.as_ptr()) };

        assert_eq!(dynt.get(DT_PLTGOT), 0x900);
        for tag in 0..DYN_CNT {
            if tag != DT_PLTGOT {
                assert_eq!(dynt.get(tag), 0, "slot {} perturbed by out-of-range tag", tag);
            }
        }
    }

    #[test]
    fn test_raw_scan_finds_out_of_range_tags() {
        let dynv = vec![
            DT_PLTGOT, 0x900,
            0x7000_000a, 5,
            DT_NULL, 0,
        ];

        unsafe {
            assert_eq!(dyn_lookup_raw(dynv.as_ptr(), 0x7000_000a), 5);
            assert_eq!(dyn_lookup_raw(dynv.as_ptr(), DT_PLTGOT), 0x900);
            assert_eq!(dyn_lookup_raw(dynv.as_ptr(), 0x7000_000b), 0, "absent tag should scan to zero");
        }
    }
}
