//! Fuzz target for the assembler.
//!
//! Feeds arbitrary text through both passes to find panics in parsing,
//! operand matching and label resolution.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sim6502::{AddressSpace, Assembler};

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);

    let mut memory = AddressSpace::new();
    let mut assembler = Assembler::default();
    if let Ok(len) = assembler.assemble(&source, &mut memory) {
        assert!(len > 0);
        assert!(assembler.code_len() == len);
    }
});
