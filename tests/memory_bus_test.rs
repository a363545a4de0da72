//! Address space and memory-mapped hook tests
//!
//! Verifies the read/write interception contract of `AddressSpace`.

use sim6502::{AddressSpace, Cpu, MemoryBus};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn test_address_space_initialization() {
    let memory = AddressSpace::new();

    for addr in [0x0000, 0x1234, 0x8000, 0xFFFF].iter() {
        assert_eq!(
            memory.read(*addr),
            0x00,
            "Memory at 0x{:04X} should be initialized to 0",
            addr
        );
    }
}

#[test]
fn test_read_word_little_endian() {
    let mut memory = AddressSpace::new();
    memory.load(0x2000, &[0xCD, 0xAB]);
    assert_eq!(memory.read_word(0x2000), 0xABCD);
}

#[test]
fn test_write_hook_sees_each_write_once() {
    let mut memory = AddressSpace::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&calls);
    memory.register_write_hook(
        0x0200,
        0x05FF,
        Some(Box::new(move |addr, value| log.borrow_mut().push((addr, value)))),
    );

    memory.write(0x0200, 0x01);
    memory.write(0x05FF, 0xFF);
    memory.write(0x0600, 0x02);
    memory.write(0x01FF, 0x03);

    assert_eq!(*calls.borrow(), vec![(0x0200, 0x01), (0x05FF, 0xFF)]);
}

#[test]
fn test_write_hook_receives_stored_value() {
    let mut memory = AddressSpace::new();
    let received = Rc::new(Cell::new(None));
    let slot = Rc::clone(&received);
    memory.register_write_hook(0x10, 0x10, Some(Box::new(move |_, value| slot.set(Some(value)))));
    memory.write(0x10, 0x5A);

    assert_eq!(received.get(), Some(0x5A));
    assert_eq!(memory.read(0x10), 0x5A);
}

#[test]
fn test_read_hook_bypasses_storage() {
    let mut memory = AddressSpace::new();
    let reads = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&reads);
    memory.write(0x00FE, 0x11);
    memory.register_read_hook(
        0x00FE,
        0x00FE,
        Some(Box::new(move |_| {
            counter.set(counter.get() + 1);
            0x80 + counter.get() as u8
        })),
    );

    assert_eq!(memory.read(0x00FE), 0x81);
    assert_eq!(memory.read(0x00FE), 0x82);
    assert_eq!(memory.peek(0x00FE), 0x11);
    assert_eq!(reads.get(), 2);
}

#[test]
fn test_only_one_range_per_direction() {
    let mut memory = AddressSpace::new();
    memory.register_read_hook(0x10, 0x1F, Some(Box::new(|_| 0xAA)));
    memory.register_read_hook(0x20, 0x2F, Some(Box::new(|_| 0xBB)));

    assert_eq!(memory.read(0x10), 0x00);
    assert_eq!(memory.read(0x20), 0xBB);
    let range = memory.read_range().unwrap();
    assert_eq!((range.lo, range.hi), (0x20, 0x2F));
    assert_eq!(range.len(), 16);
}

#[test]
fn test_invalid_registration_fails_open() {
    let mut memory = AddressSpace::new();
    memory.register_write_hook(0x0200, 0x02FF, Some(Box::new(|_, _| panic!("hook cleared"))));
    memory.register_write_hook(0x0300, 0x0200, Some(Box::new(|_, _| {})));

    assert!(memory.write_range().is_none());
    memory.write(0x0250, 0x01);
    assert_eq!(memory.read(0x0250), 0x01);
}

#[test]
fn test_reset_keeps_hooks() {
    let mut memory = AddressSpace::new();
    memory.register_read_hook(0x00FE, 0x00FE, Some(Box::new(|_| 0x42)));
    memory.write(0x3000, 0x99);
    memory.reset();

    assert_eq!(memory.read(0x3000), 0x00);
    assert_eq!(memory.read(0x00FE), 0x42);
}

#[test]
fn test_cpu_reads_through_hook() {
    let mut memory = AddressSpace::new();
    // LDA $FE
    memory.load(0x0600, &[0xA5, 0xFE]);
    memory.register_read_hook(0x00FE, 0x00FE, Some(Box::new(|_| 0x3C)));

    let mut cpu = Cpu::new(memory, 0x0600);
    cpu.step();
    assert_eq!(cpu.a(), 0x3C);
}

#[test]
fn test_cpu_writes_through_hook() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let mut memory = AddressSpace::new();
    // LDA #$07; STA $0200,X
    memory.load(0x0600, &[0xA9, 0x07, 0x9D, 0x00, 0x02]);
    memory.register_write_hook(
        0x0200,
        0x05FF,
        Some(Box::new(move |addr, value| log.borrow_mut().push((addr, value)))),
    );

    let mut cpu = Cpu::new(memory, 0x0600);
    cpu.set_x(0x21);
    cpu.step();
    cpu.step();

    assert_eq!(*seen.borrow(), vec![(0x0221, 0x07)]);
}
