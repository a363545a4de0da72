//! WebAssembly bindings for the sim6502 machine.
//!
//! This module provides JavaScript-callable interfaces to the assembler and
//! interpreter, so a browser page only has to draw pixels and print messages.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::WasmMachine;
