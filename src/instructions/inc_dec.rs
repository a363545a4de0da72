//! # Increment and Decrement Instructions
//!
//! Memory: INC, DEC. Registers: INX, INY, DEX, DEY.
//! All results wrap at 8 bits and update Z and N.

use crate::cpu::CpuState;
use crate::{AddressingMode, MemoryBus};

/// Executes the INC (Increment Memory) instruction.
pub(crate) fn execute_inc<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let addr = cpu.operand_address(memory, mode);
    let value = memory.read(addr).wrapping_add(1);
    memory.write(addr, value);
    cpu.update_zn(value);
}

/// Executes the DEC (Decrement Memory) instruction.
pub(crate) fn execute_dec<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let addr = cpu.operand_address(memory, mode);
    let value = memory.read(addr).wrapping_sub(1);
    memory.write(addr, value);
    cpu.update_zn(value);
}

/// Executes the INX (Increment X) instruction.
pub(crate) fn execute_inx(cpu: &mut CpuState) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.update_zn(cpu.x);
}

/// Executes the INY (Increment Y) instruction.
pub(crate) fn execute_iny(cpu: &mut CpuState) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.update_zn(cpu.y);
}

/// Executes the DEX (Decrement X) instruction.
pub(crate) fn execute_dex(cpu: &mut CpuState) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.update_zn(cpu.x);
}

/// Executes the DEY (Decrement Y) instruction.
pub(crate) fn execute_dey(cpu: &mut CpuState) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.update_zn(cpu.y);
}
