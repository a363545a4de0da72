//! Tests for the ADC (Add with Carry) instruction.
//!
//! Tests cover:
//! - Binary addition with and without carry in
//! - Flag updates (C, Z, V, N) at the signed and unsigned boundaries
//! - Decimal mode digit carries
//! - Memory addressing modes

use sim6502::{AddressSpace, Cpu, MemoryBus, Step};

/// Helper function to create a CPU with PC at the default origin
fn setup_cpu() -> Cpu<AddressSpace> {
    Cpu::new(AddressSpace::new(), 0x0600)
}

/// Runs `ADC #value` with the given accumulator and carry.
fn adc_immediate(a: u8, value: u8, carry: bool) -> Cpu<AddressSpace> {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x0600, &[0x69, value]);
    cpu.set_a(a);
    cpu.set_flag_c(carry);
    assert_eq!(cpu.step(), Step::Continue);
    cpu
}

// ========== Basic ADC Operation Tests ==========

#[test]
fn test_adc_immediate_basic() {
    let cpu = adc_immediate(0x10, 0x05, false);

    assert_eq!(cpu.a(), 0x15);
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_z());
    assert!(!cpu.flag_v());
    assert!(!cpu.flag_n());
    assert_eq!(cpu.pc(), 0x0602);
}

#[test]
fn test_adc_with_carry_in() {
    let cpu = adc_immediate(0x10, 0x05, true);
    assert_eq!(cpu.a(), 0x16);
}

// ========== Flag Tests ==========

#[test]
fn test_adc_unsigned_wrap_sets_carry_and_zero() {
    let cpu = adc_immediate(0xFF, 0x01, false);

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_c());
    assert!(cpu.flag_z());
    assert!(!cpu.flag_v());
    assert!(!cpu.flag_n());
}

#[test]
fn test_adc_signed_overflow_positive() {
    let cpu = adc_immediate(0x7F, 0x01, false);

    assert_eq!(cpu.a(), 0x80);
    assert!(cpu.flag_v());
    assert!(cpu.flag_n());
    assert!(!cpu.flag_c());
    assert!(!cpu.flag_z());
}

#[test]
fn test_adc_signed_overflow_negative() {
    // -128 + -1 = +127 with overflow
    let cpu = adc_immediate(0x80, 0xFF, false);

    assert_eq!(cpu.a(), 0x7F);
    assert!(cpu.flag_v());
    assert!(cpu.flag_c());
    assert!(!cpu.flag_n());
}

#[test]
fn test_adc_mixed_signs_never_overflow() {
    let cpu = adc_immediate(0x7F, 0x80, true);

    assert_eq!(cpu.a(), 0x00);
    assert!(!cpu.flag_v());
    assert!(cpu.flag_c());
    assert!(cpu.flag_z());
}

// ========== Decimal Mode Tests ==========

#[test]
fn test_adc_decimal_digit_carry() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x0600, &[0x69, 0x01]);
    cpu.set_a(0x09);
    cpu.set_flag_d(true);
    cpu.step();

    assert_eq!(cpu.a(), 0x10);
    assert!(!cpu.flag_c());
}

#[test]
fn test_adc_decimal_hundreds_carry() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x0600, &[0x69, 0x01]);
    cpu.set_a(0x99);
    cpu.set_flag_d(true);
    cpu.step();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_c());
}

#[test]
fn test_adc_decimal_with_carry_in() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x0600, &[0x69, 0x27]);
    cpu.set_a(0x15);
    cpu.set_flag_c(true);
    cpu.set_flag_d(true);
    cpu.step();

    assert_eq!(cpu.a(), 0x43);
    assert!(!cpu.flag_c());
}

// ========== Addressing Mode Tests ==========

#[test]
fn test_adc_zero_page() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x0600, &[0x65, 0x42]);
    cpu.memory_mut().write(0x0042, 0x20);
    cpu.set_a(0x01);
    cpu.step();

    assert_eq!(cpu.a(), 0x21);
    assert_eq!(cpu.pc(), 0x0602);
}

#[test]
fn test_adc_zero_page_x_wraps() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x0600, &[0x75, 0xF0]);
    cpu.memory_mut().write(0x0010, 0x03);
    cpu.set_x(0x20);
    cpu.set_a(0x01);
    cpu.step();

    assert_eq!(cpu.a(), 0x04);
}

#[test]
fn test_adc_absolute_y() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x0600, &[0x79, 0x00, 0x20]);
    cpu.memory_mut().write(0x2005, 0x11);
    cpu.set_y(0x05);
    cpu.set_a(0x11);
    cpu.step();

    assert_eq!(cpu.a(), 0x22);
    assert_eq!(cpu.pc(), 0x0603);
}

#[test]
fn test_adc_indirect_y() {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x0600, &[0x71, 0x10]);
    cpu.memory_mut().load(0x0010, &[0x00, 0x30]);
    cpu.memory_mut().write(0x3002, 0x40);
    cpu.set_y(0x02);
    cpu.set_a(0x02);
    cpu.step();

    assert_eq!(cpu.a(), 0x42);
}
