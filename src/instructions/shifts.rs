//! # Shift and Rotate Instructions
//!
//! ASL, LSR, ROL and ROR, each available on the accumulator (single mode) and
//! on memory. The bit shifted out lands in carry; Z and N reflect the result.

use crate::cpu::{CpuState, FLAG_C};
use crate::{AddressingMode, MemoryBus};

/// Applies `op` to the accumulator or to the memory operand for `mode`.
///
/// `op` receives the input value and the incoming carry and returns the
/// result and the outgoing carry.
fn read_modify_write<M, F>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode, op: F)
where
    M: MemoryBus,
    F: Fn(u8, bool) -> (u8, bool),
{
    let carry_in = cpu.flag(FLAG_C);
    let result = if mode == AddressingMode::Single {
        let (result, carry_out) = op(cpu.a, carry_in);
        cpu.a = result;
        cpu.set_flag(FLAG_C, carry_out);
        result
    } else {
        let addr = cpu.operand_address(memory, mode);
        let (result, carry_out) = op(memory.read(addr), carry_in);
        memory.write(addr, result);
        cpu.set_flag(FLAG_C, carry_out);
        result
    };
    cpu.update_zn(result);
}

/// Executes the ASL (Arithmetic Shift Left) instruction.
pub(crate) fn execute_asl<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    read_modify_write(cpu, memory, mode, |value, _| (value << 1, value & 0x80 != 0));
}

/// Executes the LSR (Logical Shift Right) instruction.
pub(crate) fn execute_lsr<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    read_modify_write(cpu, memory, mode, |value, _| (value >> 1, value & 0x01 != 0));
}

/// Executes the ROL (Rotate Left) instruction. Carry enters at bit 0.
pub(crate) fn execute_rol<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    read_modify_write(cpu, memory, mode, |value, carry| {
        ((value << 1) | carry as u8, value & 0x80 != 0)
    });
}

/// Executes the ROR (Rotate Right) instruction. Carry enters at bit 7.
pub(crate) fn execute_ror<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    read_modify_write(cpu, memory, mode, |value, carry| {
        ((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0)
    });
}
