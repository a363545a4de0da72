//! Random-number read port.
//!
//! Every read of the port address returns a fresh byte from the wrapped RNG.
//! Programs use it as `LDA $FE`.

use std::cell::RefCell;

use rand_core::RngCore;

use crate::memory::{AddressSpace, ReadHook};

/// Read-only port producing one random byte per read.
///
/// # Examples
///
/// ```
/// use rand_core::{impls, Error, RngCore};
/// use sim6502::{AddressSpace, MemoryBus, RandomPort};
///
/// /// Counter standing in for a real generator.
/// struct Counter(u32);
///
/// impl RngCore for Counter {
///     fn next_u32(&mut self) -> u32 {
///         self.0 += 1;
///         self.0
///     }
///     fn next_u64(&mut self) -> u64 {
///         impls::next_u64_via_u32(self)
///     }
///     fn fill_bytes(&mut self, dest: &mut [u8]) {
///         impls::fill_bytes_via_next(self, dest)
///     }
///     fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
///         self.fill_bytes(dest);
///         Ok(())
///     }
/// }
///
/// let mut memory = AddressSpace::new();
/// RandomPort::new(Counter(0)).attach(&mut memory, 0x00FE);
/// assert_eq!(memory.read(0x00FE), 1);
/// assert_eq!(memory.read(0x00FE), 2);
/// ```
pub struct RandomPort<R: RngCore> {
    rng: RefCell<R>,
}

impl<R: RngCore> RandomPort<R> {
    /// Wraps `rng`.
    pub fn new(rng: R) -> Self {
        Self {
            rng: RefCell::new(rng),
        }
    }

    /// Draws the next byte.
    pub fn read(&self) -> u8 {
        (self.rng.borrow_mut().next_u32() & 0xFF) as u8
    }
}

impl<R: RngCore + 'static> RandomPort<R> {
    /// Converts the port into a read hook.
    pub fn into_hook(self) -> ReadHook {
        Box::new(move |_addr| self.read())
    }

    /// Registers the port as the read hook for the single address `addr`.
    pub fn attach(self, memory: &mut AddressSpace, addr: u16) {
        memory.register_read_hook(addr, addr, Some(self.into_hook()));
    }
}

#[cfg(feature = "os-rng")]
impl RandomPort<rand_core::OsRng> {
    /// Port backed by the operating system's generator.
    pub fn from_os() -> Self {
        Self::new(rand_core::OsRng)
    }
}
