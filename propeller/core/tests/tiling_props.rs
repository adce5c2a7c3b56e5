use propeller_disasm::covered_len;
use propeller_disasm::pasm::{self, regions_len, Region};
use propeller_disasm::spin;
use proptest::prelude::*;

fn region() -> impl Strategy<Value = Region> {
    prop_oneof![
        (0usize..16).prop_map(Region::Data),
        (0usize..24).prop_map(Region::Instructions),
        any::<u32>().prop_map(Region::SetOrigin),
        any::<bool>().prop_map(Region::SuspendOrigin),
    ]
}

proptest! {
    #[test]
    fn instruction_chunks_cover_regions(
        binary in prop::collection::vec(any::<u8>(), 0..128),
        regions in prop::collection::vec(region(), 0..12),
    ) {
        let chunks = pasm::disassemble(&binary, 0, &regions);
        prop_assert_eq!(covered_len(&chunks), regions_len(&regions));
        prop_assert_eq!(chunks, pasm::disassemble(&binary, 0, &regions));
    }

    #[test]
    fn bytecode_chunks_cover_method(binary in prop::collection::vec(any::<u8>(), 0..96)) {
        let chunks = spin::disassemble(&binary, 0, binary.len(), "m");
        prop_assert_eq!(chunks[0].len, 0);
        prop_assert_eq!(covered_len(&chunks), binary.len());
        prop_assert!(chunks[1..].iter().all(|chunk| chunk.len > 0));
    }
}
