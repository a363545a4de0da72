//! Fuzz target for instruction execution.
//!
//! Loads arbitrary bytes at the origin with an arbitrary register file and
//! runs a bounded number of instructions.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sim6502::{AddressSpace, Cpu, MemoryBus, Step};

/// Arbitrary register file
#[derive(Debug, Arbitrary)]
struct FuzzRegisters {
    a: u8,
    x: u8,
    y: u8,
    sp: u16,
    status: u8,
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    registers: FuzzRegisters,
    /// Program bytes loaded at 0x0600
    program: Vec<u8>,
    /// Zero page contents, used by indirect modes
    zero_page: [u8; 256],
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = AddressSpace::new();
    memory.load(0x0000, &input.zero_page);
    let len = input.program.len().min(0x1000);
    memory.load(0x0600, &input.program[..len]);

    let mut cpu = Cpu::new(memory, 0x0600);
    cpu.set_a(input.registers.a);
    cpu.set_x(input.registers.x);
    cpu.set_y(input.registers.y);
    cpu.set_sp(input.registers.sp);
    cpu.set_status(input.registers.status);

    for _ in 0..1000 {
        let step = cpu.step();

        assert!(cpu.sp() <= 0x100);
        assert!(cpu.status() & 0x20 != 0);

        if let Step::Halted(_) = step {
            break;
        }
    }

    // Memory stays readable after any program
    let _ = cpu.memory().read(0xFFFF);
});
