//! # Status Flag Manipulation Instructions
//!
//! This module implements instructions that directly modify processor status flags:
//! - CLC / SEC: Carry
//! - CLI / SEI: Interrupt disable (stored but otherwise inert)
//! - CLD / SED: Decimal mode
//! - CLV: Overflow
//!
//! These instructions use the single addressing mode.

use crate::cpu::CpuState;

/// Clears the flag bits in `mask` (CLC, CLD, CLI, CLV).
pub(crate) fn execute_clear(cpu: &mut CpuState, mask: u8) {
    cpu.set_flag(mask, false);
}

/// Sets the flag bits in `mask` (SEC, SED, SEI).
pub(crate) fn execute_set(cpu: &mut CpuState, mask: u8) {
    cpu.set_flag(mask, true);
}
