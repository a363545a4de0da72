//! # Register Transfer Instructions
//!
//! TAX, TAY, TXA, TYA and TSX update Z and N from the copied value.
//! TXS copies X into the stack pointer and leaves the flags alone.

use crate::cpu::CpuState;

/// Executes the TAX (Transfer Accumulator to X) instruction.
pub(crate) fn execute_tax(cpu: &mut CpuState) {
    cpu.x = cpu.a;
    cpu.update_zn(cpu.x);
}

/// Executes the TAY (Transfer Accumulator to Y) instruction.
pub(crate) fn execute_tay(cpu: &mut CpuState) {
    cpu.y = cpu.a;
    cpu.update_zn(cpu.y);
}

/// Executes the TXA (Transfer X to Accumulator) instruction.
pub(crate) fn execute_txa(cpu: &mut CpuState) {
    cpu.a = cpu.x;
    cpu.update_zn(cpu.a);
}

/// Executes the TYA (Transfer Y to Accumulator) instruction.
pub(crate) fn execute_tya(cpu: &mut CpuState) {
    cpu.a = cpu.y;
    cpu.update_zn(cpu.a);
}

/// Executes the TSX (Transfer Stack Pointer to X) instruction.
///
/// Only the low byte of SP is copied, so an empty stack (0x100) reads as 0.
pub(crate) fn execute_tsx(cpu: &mut CpuState) {
    cpu.x = (cpu.sp & 0xFF) as u8;
    cpu.update_zn(cpu.x);
}

/// Executes the TXS (Transfer X to Stack Pointer) instruction.
pub(crate) fn execute_txs(cpu: &mut CpuState) {
    cpu.sp = cpu.x as u16;
}
