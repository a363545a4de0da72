//! # ALU (Arithmetic Logic Unit) Instructions
//!
//! This module implements arithmetic and logical operations:
//! - ADC: Add with Carry
//! - SBC: Subtract with Carry
//! - AND, ORA, EOR: Bitwise logic on the accumulator
//! - CMP, CPX, CPY: Register comparisons
//! - BIT: Bit test
//!
//! ADC and SBC honor the decimal flag. In decimal mode each nibble is treated
//! as a BCD digit: the low nibble is corrected by 6 when it passes 9, and the
//! high nibble is corrected by 0x60 at the 0x99/0x100 boundary.

use crate::cpu::{CpuState, FLAG_C, FLAG_D, FLAG_N, FLAG_V, FLAG_Z};
use crate::{AddressingMode, MemoryBus};

/// Adds `value` and the carry to the accumulator.
///
/// The overflow flag starts set when both operands share a sign and is
/// cleared when the result stays within the signed range.
pub(crate) fn add_with_carry(cpu: &mut CpuState, value: u8) {
    let a = cpu.a as u16;
    let v = value as u16;
    let carry = cpu.flag(FLAG_C) as u16;
    let mut overflow = (cpu.a ^ value) & 0x80 == 0;

    let mut tmp;
    if cpu.flag(FLAG_D) {
        tmp = (a & 0x0F) + (v & 0x0F) + carry;
        if tmp >= 10 {
            tmp = 0x10 | ((tmp + 6) & 0x0F);
        }
        tmp += (a & 0xF0) + (v & 0xF0);
        if tmp >= 160 {
            cpu.set_flag(FLAG_C, true);
            if tmp >= 0x180 {
                overflow = false;
            }
            tmp += 0x60;
        } else {
            cpu.set_flag(FLAG_C, false);
            if tmp < 0x80 {
                overflow = false;
            }
        }
    } else {
        tmp = a + v + carry;
        if tmp >= 0x100 {
            cpu.set_flag(FLAG_C, true);
            if tmp >= 0x180 {
                overflow = false;
            }
        } else {
            cpu.set_flag(FLAG_C, false);
            if tmp < 0x80 {
                overflow = false;
            }
        }
    }

    cpu.set_flag(FLAG_V, overflow);
    cpu.a = tmp as u8;
    cpu.update_zn(cpu.a);
}

/// Subtracts `value` and the borrow (inverted carry) from the accumulator.
///
/// The overflow flag starts set when the operands differ in sign and is
/// cleared when the difference stays within the signed range.
pub(crate) fn subtract_with_carry(cpu: &mut CpuState, value: u8) {
    let a = cpu.a as i32;
    let v = value as i32;
    let carry = cpu.flag(FLAG_C) as i32;
    let mut overflow = (cpu.a ^ value) & 0x80 != 0;

    let mut w;
    if cpu.flag(FLAG_D) {
        // Low digit, biased by 0xF so a borrow shows up below 0x10
        let mut tmp = 0x0F + (a & 0x0F) - (v & 0x0F) + carry;
        if tmp < 0x10 {
            w = 0;
            tmp -= 6;
        } else {
            w = 0x10;
            tmp -= 0x10;
        }
        w += 0xF0 + (a & 0xF0) - (v & 0xF0);
        if w < 0x100 {
            cpu.set_flag(FLAG_C, false);
            if w < 0x80 {
                overflow = false;
            }
            w -= 0x60;
        } else {
            cpu.set_flag(FLAG_C, true);
            if w >= 0x180 {
                overflow = false;
            }
        }
        w += tmp;
    } else {
        w = 0xFF + a - v + carry;
        if w < 0x100 {
            cpu.set_flag(FLAG_C, false);
            if w < 0x80 {
                overflow = false;
            }
        } else {
            cpu.set_flag(FLAG_C, true);
            if w >= 0x180 {
                overflow = false;
            }
        }
    }

    cpu.set_flag(FLAG_V, overflow);
    cpu.a = (w & 0xFF) as u8;
    cpu.update_zn(cpu.a);
}

/// Executes the ADC (Add with Carry) instruction.
pub(crate) fn execute_adc<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let value = cpu.operand_value(memory, mode);
    add_with_carry(cpu, value);
}

/// Executes the SBC (Subtract with Carry) instruction.
pub(crate) fn execute_sbc<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let value = cpu.operand_value(memory, mode);
    subtract_with_carry(cpu, value);
}

/// Executes the AND (Logical AND) instruction.
pub(crate) fn execute_and<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let value = cpu.operand_value(memory, mode);
    cpu.a &= value;
    cpu.update_zn(cpu.a);
}

/// Executes the ORA (Logical Inclusive OR) instruction.
pub(crate) fn execute_ora<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let value = cpu.operand_value(memory, mode);
    cpu.a |= value;
    cpu.update_zn(cpu.a);
}

/// Executes the EOR (Exclusive OR) instruction.
pub(crate) fn execute_eor<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let value = cpu.operand_value(memory, mode);
    cpu.a ^= value;
    cpu.update_zn(cpu.a);
}

/// Compares `register` with `value`.
///
/// Carry is set when `register >= value`; Z and N come from the difference.
fn compare(cpu: &mut CpuState, register: u8, value: u8) {
    cpu.set_flag(FLAG_C, register >= value);
    cpu.update_zn(register.wrapping_sub(value));
}

/// Executes the CMP (Compare Accumulator) instruction.
pub(crate) fn execute_cmp<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let value = cpu.operand_value(memory, mode);
    let register = cpu.a;
    compare(cpu, register, value);
}

/// Executes the CPX (Compare X Register) instruction.
pub(crate) fn execute_cpx<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let value = cpu.operand_value(memory, mode);
    let register = cpu.x;
    compare(cpu, register, value);
}

/// Executes the CPY (Compare Y Register) instruction.
pub(crate) fn execute_cpy<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let value = cpu.operand_value(memory, mode);
    let register = cpu.y;
    compare(cpu, register, value);
}

/// Executes the BIT (Bit Test) instruction.
///
/// Z is set when `A & M` is zero. N and V are copied from bits 7 and 6 of the
/// memory operand. The accumulator is not changed.
pub(crate) fn execute_bit<M: MemoryBus>(cpu: &mut CpuState, memory: &mut M, mode: AddressingMode) {
    let value = cpu.operand_value(memory, mode);
    cpu.set_flag(FLAG_Z, cpu.a & value == 0);
    cpu.set_flag(FLAG_N, value & 0x80 != 0);
    cpu.set_flag(FLAG_V, value & 0x40 != 0);
}
