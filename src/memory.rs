//! # Address Space and Memory Bus
//!
//! This module provides the `MemoryBus` trait that decouples the interpreter and
//! the assembler from a specific memory implementation, plus `AddressSpace`, the
//! 64KB store used by the machine.
//!
//! ## Memory-Mapped I/O Hooks
//!
//! `AddressSpace` supports at most one intercepted read range and one intercepted
//! write range at a time:
//!
//! - **Read hook**: consulted *instead of* the stored byte for any address inside
//!   the range. Used for the random-number port.
//! - **Write hook**: invoked *after* the stored byte is updated, with the masked
//!   value. Used for the pixel framebuffer.
//!
//! Registering a range with an invalid bound (`lo > hi`) or without a handler
//! clears that interception entirely. It never fails.

use std::fmt;

/// Size of the full 16-bit address space.
pub const ADDRESS_SPACE_SIZE: usize = 0x10000;

/// Handler invoked in place of the stored byte for intercepted reads.
///
/// Reads go through `&self`, so handlers that carry state (an RNG, a device
/// register) use interior mutability.
pub type ReadHook = Box<dyn Fn(u16) -> u8>;

/// Handler invoked after an intercepted write, receiving the masked value.
pub type WriteHook = Box<dyn FnMut(u16, u8)>;

/// Memory bus trait for reading and writing bytes.
///
/// The interpreter accesses all memory through this abstraction, and the
/// assembler emits its image through it.
///
/// # Design
///
/// - `read(&self)`: Immutable reference allows shared reads
/// - `write(&mut self)`: Mutable reference makes side effects explicit
/// - No error types: every 16-bit address is valid
///
/// # Examples
///
/// ```
/// use sim6502::{AddressSpace, MemoryBus};
///
/// let mut mem = AddressSpace::new();
/// mem.write(0x1234, 0x42);
/// mem.write(0x1235, 0x12);
///
/// assert_eq!(mem.read(0x1234), 0x42);
/// assert_eq!(mem.read_word(0x1234), 0x1242);
/// ```
pub trait MemoryBus {
    /// Reads a byte from the specified 16-bit address.
    ///
    /// This method must never panic.
    fn read(&self, addr: u16) -> u8;

    /// Writes a byte to the specified 16-bit address.
    ///
    /// This method must never panic.
    fn write(&mut self, addr: u16, value: u8);

    /// Reads a little-endian word from `addr` and `addr + 1`.
    ///
    /// The high byte address wraps from 0xFFFF to 0x0000.
    fn read_word(&self, addr: u16) -> u16 {
        let low = self.read(addr) as u16;
        let high = self.read(addr.wrapping_add(1)) as u16;
        (high << 8) | low
    }
}

/// Inclusive address range covered by a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookRange {
    /// First intercepted address
    pub lo: u16,
    /// Last intercepted address (inclusive)
    pub hi: u16,
}

impl HookRange {
    /// Returns true if `addr` lies inside the range.
    pub fn contains(&self, addr: u16) -> bool {
        addr >= self.lo && addr <= self.hi
    }

    /// Number of addresses covered by the range.
    pub fn len(&self) -> usize {
        (self.hi - self.lo) as usize + 1
    }

    /// Always false; a registered range covers at least one address.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// 64KB flat address space with one optional read hook and one optional write hook.
///
/// All 65536 addresses are backed by a contiguous byte array initialized to zero.
///
/// # Examples
///
/// ```
/// use sim6502::{AddressSpace, MemoryBus};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let mut mem = AddressSpace::new();
///
/// // Reads of $FE come from the hook, never from the stored byte
/// mem.register_read_hook(0x00FE, 0x00FE, Some(Box::new(|_addr| 0x42)));
/// assert_eq!(mem.read(0x00FE), 0x42);
///
/// // Writes into $0200-$05FF are observed after being stored
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let log = Rc::clone(&seen);
/// mem.register_write_hook(
///     0x0200,
///     0x05FF,
///     Some(Box::new(move |addr, value| log.borrow_mut().push((addr, value)))),
/// );
/// mem.write(0x0200, 0x05);
/// assert_eq!(*seen.borrow(), vec![(0x0200, 0x05)]);
/// assert_eq!(mem.read(0x0200), 0x05);
/// ```
pub struct AddressSpace {
    /// 64KB contiguous memory array
    data: Box<[u8; ADDRESS_SPACE_SIZE]>,

    read_range: Option<HookRange>,
    read_hook: Option<ReadHook>,

    write_range: Option<HookRange>,
    write_hook: Option<WriteHook>,
}

impl AddressSpace {
    /// Creates a new address space with all bytes zero and no hooks.
    pub fn new() -> Self {
        Self {
            data: Box::new([0; ADDRESS_SPACE_SIZE]),
            read_range: None,
            read_hook: None,
            write_range: None,
            write_hook: None,
        }
    }

    /// Registers the read hook for `[lo, hi]`, replacing any previous one.
    ///
    /// An invalid range (`lo > hi`) or a `None` handler clears read
    /// interception instead.
    pub fn register_read_hook(&mut self, lo: u16, hi: u16, handler: Option<ReadHook>) {
        match handler {
            Some(handler) if lo <= hi => {
                log::debug!("read hook registered for ${:04X}-${:04X}", lo, hi);
                self.read_range = Some(HookRange { lo, hi });
                self.read_hook = Some(handler);
            }
            _ => {
                log::debug!("read hook cleared");
                self.clear_read_hook();
            }
        }
    }

    /// Registers the write hook for `[lo, hi]`, replacing any previous one.
    ///
    /// An invalid range (`lo > hi`) or a `None` handler clears write
    /// interception instead.
    pub fn register_write_hook(&mut self, lo: u16, hi: u16, handler: Option<WriteHook>) {
        match handler {
            Some(handler) if lo <= hi => {
                log::debug!("write hook registered for ${:04X}-${:04X}", lo, hi);
                self.write_range = Some(HookRange { lo, hi });
                self.write_hook = Some(handler);
            }
            _ => {
                log::debug!("write hook cleared");
                self.clear_write_hook();
            }
        }
    }

    /// Removes read interception.
    pub fn clear_read_hook(&mut self) {
        self.read_range = None;
        self.read_hook = None;
    }

    /// Removes write interception.
    pub fn clear_write_hook(&mut self) {
        self.write_range = None;
        self.write_hook = None;
    }

    /// Currently intercepted read range, if any.
    pub fn read_range(&self) -> Option<HookRange> {
        self.read_range
    }

    /// Currently intercepted write range, if any.
    pub fn write_range(&self) -> Option<HookRange> {
        self.write_range
    }

    /// Reads the stored byte, bypassing the read hook.
    pub fn peek(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    /// Zeroes every byte. Hooks stay registered and are not invoked.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    /// Zeroes every byte, then replays a zero write through the write hook for
    /// each intercepted address so the attached device observes the clear.
    pub fn reset_notifying(&mut self) {
        self.reset();
        if let (Some(range), Some(hook)) = (self.write_range, self.write_hook.as_mut()) {
            for addr in range.lo..=range.hi {
                hook(addr, 0);
            }
        }
    }

    /// Copies `bytes` into memory starting at `start`, through the write path.
    pub fn load(&mut self, start: u16, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.write(start.wrapping_add(i as u16), byte);
        }
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AddressSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressSpace")
            .field("read_range", &self.read_range)
            .field("write_range", &self.write_range)
            .finish_non_exhaustive()
    }
}

impl MemoryBus for AddressSpace {
    fn read(&self, addr: u16) -> u8 {
        if let (Some(range), Some(hook)) = (self.read_range, self.read_hook.as_ref()) {
            if range.contains(addr) {
                return hook(addr);
            }
        }
        self.data[addr as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
        if let (Some(range), Some(hook)) = (self.write_range, self.write_hook.as_mut()) {
            if range.contains(addr) {
                hook(addr, value);
            }
        }
    }
}
