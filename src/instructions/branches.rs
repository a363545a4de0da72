//! # Branch Instructions
//!
//! This module implements conditional branch operations:
//! BCC, BCS, BEQ, BNE, BMI, BPL, BVC, BVS.
//!
//! All branch instructions use relative addressing with an 8-bit displacement
//! measured from the address following the branch. A displacement of 0x80 or
//! more moves backwards by `0x100 - offset`.

use crate::cpu::{branch_target, CpuState};
use crate::MemoryBus;

/// Executes a conditional branch taken when status bit `flag` equals `expected`.
///
/// The displacement byte is always consumed. When the condition holds PC moves
/// to the target, otherwise execution falls through.
///
/// No flags are affected.
pub(crate) fn execute_branch<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, flag: u8, expected: bool) {
    let offset = cpu.fetch_byte(memory);
    if cpu.flag(flag) == expected {
        cpu.pc = branch_target(cpu.pc, offset);
    }
}
