//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - BRK: Halt execution
//! - JMP: Jump to address (absolute or indirect)
//! - JSR: Jump to subroutine
//! - RTS: Return from subroutine
//! - RTI: Return from interrupt
//!
//! There are no interrupt vectors. BRK stops the machine instead of vectoring
//! through $FFFE, and RTI simply restores P and PC from the stack.

use crate::cpu::{CpuState, HaltReason};
use crate::{AddressingMode, MemoryBus};

/// Executes the BRK instruction, which halts the machine.
///
/// `address` is where the BRK opcode was fetched from.
pub(crate) fn execute_brk(address: u16) -> HaltReason {
    log::debug!("BRK at ${:04X}", address);
    HaltReason::Break { address }
}

/// Executes the JMP (Jump) instruction.
///
/// Absolute mode loads PC from the operand. Indirect mode loads PC from the
/// word stored at the operand address.
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    cpu.pc = cpu.operand_address(memory, mode);
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last operand byte (return address - 1), high byte
/// first, then jumps to the target.
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let target = cpu.operand_address(memory, mode);
    let return_address = cpu.pc.wrapping_sub(1);
    cpu.push(memory, (return_address >> 8) as u8);
    cpu.push(memory, (return_address & 0xFF) as u8);
    cpu.pc = target;
}

/// Executes the RTS (Return from Subroutine) instruction.
///
/// Pops the low byte then the high byte and resumes one past that address.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M) {
    let low = cpu.pop(memory) as u16;
    let high = cpu.pop(memory) as u16;
    cpu.pc = ((high << 8) | low).wrapping_add(1);
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pops P (bit 5 forced on), then the low and high bytes of PC.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M) {
    let status = cpu.pop(memory);
    cpu.set_status(status);
    let low = cpu.pop(memory) as u16;
    let high = cpu.pop(memory) as u16;
    cpu.pc = (high << 8) | low;
}
