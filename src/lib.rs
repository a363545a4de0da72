//! # sim6502
//!
//! A two-pass 6502 assembler and an instruction interpreter sharing one 64KB
//! address space, with memory-mapped hooks for a random-number port and a
//! pixel framebuffer.
//!
//! ## Quick Start
//!
//! ```rust
//! use sim6502::{HaltReason, Machine, MachineConfig};
//!
//! let mut machine = Machine::new(MachineConfig::default());
//! machine.assemble("
//!     LDX #$00
//! loop:
//!     INX
//!     CPX #$05
//!     BNE loop
//!     BRK
//! ").unwrap();
//!
//! let halt = machine.run(10);
//! assert!(matches!(halt, Some(HaltReason::Break { .. })));
//! assert_eq!(machine.cpu().x(), 0x05);
//! assert_eq!(machine.symbols().address_of("loop"), Some(0x0602));
//! ```
//!
//! ## Architecture
//!
//! - **Modularity**: the interpreter reaches memory only through the `MemoryBus` trait
//! - **Explicit state**: registers live in `CpuState`, passed by `&mut` to `execute`
//! - **Host-driven time**: the host calls `tick()`; nothing here owns a timer
//! - **Table-driven encoding**: one opcode table serves the assembler and the decoder
//!
//! ## Modules
//!
//! - `memory` - MemoryBus trait and the hooked `AddressSpace`
//! - `addressing` - Addressing mode enumeration
//! - `opcodes` - Mnemonic to encoding table
//! - `cpu` - Registers, flags and the execute routine
//! - `assembler` - Two-pass assembler
//! - `scheduler` - Start/stop and fixed-quantum ticks
//! - `devices` - Random port and framebuffer
//! - `machine` - Everything above behind one facade
//! - `hexdump` - Read-only memory formatter
//! - `diagnostics` - Progress and halt messages
//! - `config` - Machine and assembler options

pub mod addressing;
pub mod assembler;
pub mod config;
pub mod cpu;
pub mod devices;
pub mod diagnostics;
pub mod hexdump;
pub mod machine;
pub mod memory;
pub mod opcodes;
pub mod scheduler;
pub mod wasm;

// Internal instruction implementations (not part of public API)
mod instructions;

// Re-export public API
pub use addressing::AddressingMode;
pub use assembler::symbol_table::SymbolTable;
pub use assembler::{Assembler, AssemblyError, ErrorKind, LineError, Pass, Symbol};
pub use config::{AssemblerConfig, MachineConfig};
pub use cpu::{execute, Cpu, CpuState, HaltReason, Step};
pub use devices::{Framebuffer, Palette, PixelBuffer, PixelSink, RandomPort, Resolution};
pub use diagnostics::{Diagnostics, MessageLog, MessageSink};
pub use hexdump::{hex_dump, HexDumpOptions, HexRow};
pub use machine::Machine;
pub use memory::{AddressSpace, HookRange, MemoryBus, ReadHook, WriteHook};
pub use opcodes::{decode, lookup, InstructionEncodings, Mnemonic, OPCODE_TABLE};
pub use scheduler::{RunState, Scheduler, TickReport};

#[cfg(feature = "wasm")]
pub use wasm::WasmMachine;
