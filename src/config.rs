//! # Machine Configuration
//!
//! Plain option structs with sensible defaults. Every field is public so hosts
//! can use struct update syntax:
//!
//! ```
//! use sim6502::{MachineConfig, Resolution};
//!
//! let config = MachineConfig {
//!     display: Resolution::R64,
//!     ..MachineConfig::default()
//! };
//! assert_eq!(config.origin, 0x0600);
//! assert_eq!(config.display.base(), 0x2000);
//! ```

use crate::devices::Resolution;

/// Default load address for assembled programs.
pub const DEFAULT_ORIGIN: u16 = 0x0600;

/// Default number of instructions executed per scheduler tick.
pub const DEFAULT_QUANTUM: usize = 128;

/// Default address of the random-number read port.
pub const DEFAULT_RANDOM_PORT: u16 = 0x00FE;

/// Default address that receives the last key press.
pub const DEFAULT_KEY_PORT: u16 = 0x00FF;

/// Options for a standalone `Assembler`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Address of the first emitted byte, and where the program counter
    /// returns to at the start of each pass.
    pub origin: u16,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
        }
    }
}

/// Options for a `Machine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Program origin, used by both the assembler and the CPU reset.
    pub origin: u16,

    /// Instructions per tick.
    pub quantum: usize,

    /// Address whose reads return a fresh random byte.
    pub random_port: u16,

    /// Address that `Machine::key_press` writes the key code to.
    pub key_port: u16,

    /// Framebuffer resolution, which also selects its base address.
    pub display: Resolution,
}

impl MachineConfig {
    /// Assembler options derived from this configuration.
    pub fn assembler(&self) -> AssemblerConfig {
        AssemblerConfig {
            origin: self.origin,
        }
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            quantum: DEFAULT_QUANTUM,
            random_port: DEFAULT_RANDOM_PORT,
            key_port: DEFAULT_KEY_PORT,
            display: Resolution::default(),
        }
    }
}
