//! # Load and Store Instructions
//!
//! This module implements load and store operations:
//! - LDA, LDX, LDY: Load a register and update Z and N
//! - STA, STX, STY: Store a register without touching flags
//!
//! Stores go through `MemoryBus::write`, so a store inside a hooked range
//! reaches the attached device.

use crate::cpu::CpuState;
use crate::{AddressingMode, MemoryBus};

/// Executes the LDA (Load Accumulator) instruction.
///
/// # Flag Behavior
///
/// - Zero (Z): Set if A = 0
/// - Negative (N): Set if bit 7 of A is set
/// - Other flags: Not affected
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    cpu.a = cpu.operand_value(memory, mode);
    cpu.update_zn(cpu.a);
}

/// Executes the LDX (Load X Register) instruction.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    cpu.x = cpu.operand_value(memory, mode);
    cpu.update_zn(cpu.x);
}

/// Executes the LDY (Load Y Register) instruction.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    cpu.y = cpu.operand_value(memory, mode);
    cpu.update_zn(cpu.y);
}

/// Executes the STA (Store Accumulator) instruction.
pub(crate) fn execute_sta<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let addr = cpu.operand_address(memory, mode);
    memory.write(addr, cpu.a);
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let addr = cpu.operand_address(memory, mode);
    memory.write(addr, cpu.x);
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let addr = cpu.operand_address(memory, mode);
    memory.write(addr, cpu.y);
}
