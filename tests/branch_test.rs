//! Tests for the conditional branch instructions.
//!
//! Displacements are relative to the address after the two-byte branch.
//! Offsets of 0x80 and above move backwards.

use sim6502::{AddressSpace, Cpu};

/// Helper function to create a CPU with PC at the default origin
fn setup_cpu() -> Cpu<AddressSpace> {
    Cpu::new(AddressSpace::new(), 0x0600)
}

fn branch(opcode: u8, offset: u8, setup: impl FnOnce(&mut Cpu<AddressSpace>)) -> u16 {
    let mut cpu = setup_cpu();
    cpu.memory_mut().load(0x0600, &[opcode, offset]);
    setup(&mut cpu);
    cpu.step();
    cpu.pc()
}

#[test]
fn test_beq_taken_lands_on_target() {
    // BEQ two bytes before its target
    let pc = branch(0xF0, 0x00, |cpu| cpu.set_flag_z(true));
    assert_eq!(pc, 0x0602);

    let pc = branch(0xF0, 0x04, |cpu| cpu.set_flag_z(true));
    assert_eq!(pc, 0x0606);
}

#[test]
fn test_beq_fe_loops_on_itself() {
    let pc = branch(0xF0, 0xFE, |cpu| cpu.set_flag_z(true));
    assert_eq!(pc, 0x0600);
}

#[test]
fn test_beq_not_taken() {
    let pc = branch(0xF0, 0x10, |cpu| cpu.set_flag_z(false));
    assert_eq!(pc, 0x0602);
}

#[test]
fn test_backward_branch_limit() {
    let pc = branch(0xD0, 0x80, |_| {});
    assert_eq!(pc, 0x0602 - 0x80);
}

#[test]
fn test_forward_branch_limit() {
    let pc = branch(0xD0, 0x7F, |_| {});
    assert_eq!(pc, 0x0602 + 0x7F);
}

#[test]
fn test_carry_branches() {
    assert_eq!(branch(0x90, 0x10, |cpu| cpu.set_flag_c(false)), 0x0612);
    assert_eq!(branch(0x90, 0x10, |cpu| cpu.set_flag_c(true)), 0x0602);
    assert_eq!(branch(0xB0, 0x10, |cpu| cpu.set_flag_c(true)), 0x0612);
    assert_eq!(branch(0xB0, 0x10, |cpu| cpu.set_flag_c(false)), 0x0602);
}

#[test]
fn test_negative_branches() {
    assert_eq!(branch(0x30, 0x08, |cpu| cpu.set_flag_n(true)), 0x060A);
    assert_eq!(branch(0x30, 0x08, |cpu| cpu.set_flag_n(false)), 0x0602);
    assert_eq!(branch(0x10, 0x08, |cpu| cpu.set_flag_n(false)), 0x060A);
    assert_eq!(branch(0x10, 0x08, |cpu| cpu.set_flag_n(true)), 0x0602);
}

#[test]
fn test_overflow_branches() {
    assert_eq!(branch(0x70, 0x02, |cpu| cpu.set_flag_v(true)), 0x0604);
    assert_eq!(branch(0x70, 0x02, |cpu| cpu.set_flag_v(false)), 0x0602);
    assert_eq!(branch(0x50, 0x02, |cpu| cpu.set_flag_v(false)), 0x0604);
    assert_eq!(branch(0x50, 0x02, |cpu| cpu.set_flag_v(true)), 0x0602);
}

#[test]
fn test_each_branch_tests_only_its_own_flag() {
    // (opcode, flag bit, branches when set)
    let branches = [
        (0x90, 0x01, false), // BCC
        (0xB0, 0x01, true),  // BCS
        (0xD0, 0x02, false), // BNE
        (0xF0, 0x02, true),  // BEQ
        (0x10, 0x80, false), // BPL
        (0x30, 0x80, true),  // BMI
        (0x50, 0x40, false), // BVC
        (0x70, 0x40, true),  // BVS
    ];
    for (opcode, flag, when_set) in branches {
        let (with_flag, without_flag) = if when_set { (0x0612, 0x0602) } else { (0x0602, 0x0612) };
        assert_eq!(branch(opcode, 0x10, |cpu| cpu.set_status(0xFF)), with_flag, "{:02X}", opcode);
        assert_eq!(branch(opcode, 0x10, |cpu| cpu.set_status(!flag)), without_flag, "{:02X}", opcode);
    }
}

#[test]
fn test_bne_countdown_loop() {
    let mut cpu = setup_cpu();
    // LDX #$03; loop: DEX; BNE loop
    cpu.memory_mut().load(0x0600, &[0xA2, 0x03, 0xCA, 0xD0, 0xFD]);

    for _ in 0..7 {
        cpu.step();
    }

    assert_eq!(cpu.x(), 0x00);
    assert_eq!(cpu.pc(), 0x0605);
}
