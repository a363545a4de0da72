//! # Stack Operations
//!
//! This module implements stack manipulation instructions:
//! - PHA / PLA: Push and pull the accumulator
//! - PHP / PLP: Push and pull the status register
//!
//! The stack lives at 0x0100-0x01FF. A push decrements SP and then writes to
//! 0x0100 + SP; a pull reads 0x0100 + SP and then increments it. Pushing onto
//! a full stack or pulling from an empty one halts the machine after the
//! instruction finishes.

use crate::cpu::CpuState;
use crate::MemoryBus;

/// Executes the PHA (Push Accumulator) instruction.
///
/// Flags affected: None
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M) {
    let value = cpu.a;
    cpu.push(memory, value);
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The status byte is pushed unchanged.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M) {
    let value = cpu.p;
    cpu.push(memory, value);
}

/// Executes the PLA (Pull Accumulator) instruction. Updates Z and N.
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M) {
    cpu.a = cpu.pop(memory);
    cpu.update_zn(cpu.a);
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// Bit 5 of the pulled value is forced on.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M) {
    let value = cpu.pop(memory);
    cpu.set_status(value);
}
