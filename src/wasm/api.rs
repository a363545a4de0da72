//! WASM API for the machine.
//!
//! Provides JavaScript-callable interfaces for assembling, run control,
//! the display and state inspection.

use crate::{HexDumpOptions, Machine, MachineConfig, Resolution, Step};
use rand_core::{impls, RngCore};
use wasm_bindgen::prelude::*;

/// Random source backed by `Math.random`.
struct JsRandom;

impl RngCore for JsRandom {
    fn next_u32(&mut self) -> u32 {
        (js_sys::Math::random() * 4_294_967_296.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        impls::fill_bytes_via_next(self, dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// JavaScript-compatible error wrapper
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsError {
    message: String,
}

#[wasm_bindgen]
impl JsError {
    #[wasm_bindgen(constructor)]
    pub fn new(message: &str) -> JsError {
        JsError {
            message: message.to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> String {
        self.message.clone()
    }
}

/// Result of assembly operation
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct AssemblyResult {
    success: bool,
    byte_count: usize,
    machine_code: Vec<u8>,
    start_addr: u16,
    end_addr: u16,
    error_message: Option<String>,
    error_line: Option<usize>,
}

#[wasm_bindgen]
impl AssemblyResult {
    #[wasm_bindgen(getter)]
    pub fn success(&self) -> bool {
        self.success
    }

    #[wasm_bindgen(getter)]
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    #[wasm_bindgen(getter)]
    pub fn machine_code(&self) -> Vec<u8> {
        self.machine_code.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn start_addr(&self) -> u16 {
        self.start_addr
    }

    #[wasm_bindgen(getter)]
    pub fn end_addr(&self) -> u16 {
        self.end_addr
    }

    #[wasm_bindgen(getter)]
    pub fn error_message(&self) -> Option<String> {
        self.error_message.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn error_line(&self) -> Option<usize> {
        self.error_line
    }
}

/// Machine interface for JavaScript
#[wasm_bindgen]
pub struct WasmMachine {
    machine: Machine,
}

#[wasm_bindgen]
impl WasmMachine {
    /// Create a machine that reports messages through `on_message(text)`
    #[wasm_bindgen(constructor)]
    pub fn new(on_message: js_sys::Function) -> Self {
        let mut machine = Machine::with_rng(MachineConfig::default(), JsRandom);
        machine.set_message_sink(move |text: &str| {
            let _ = on_message.call1(&JsValue::NULL, &JsValue::from_str(text));
        });
        WasmMachine { machine }
    }

    /// Select the display resolution by side length (32, 48, 64, 80, 96 or
    /// 128). Every cell write is reported through `on_pixel(offset, color)`.
    pub fn set_display(&mut self, side: u16, on_pixel: js_sys::Function) -> Result<(), JsError> {
        let resolution = Resolution::from_side(side)
            .ok_or_else(|| JsError::new(&format!("unsupported resolution {}x{}", side, side)))?;
        self.machine.set_display(resolution, move |offset: u16, color: u8| {
            let _ = on_pixel.call2(
                &JsValue::NULL,
                &JsValue::from(offset),
                &JsValue::from(color),
            );
        });
        Ok(())
    }

    /// Assemble source code at the default origin, resetting the machine first
    pub fn assemble(&mut self, source: String) -> AssemblyResult {
        let start_addr = self.machine.assembler().origin();
        match self.machine.assemble(&source) {
            Ok(byte_count) => {
                let machine_code = (0..byte_count)
                    .map(|i| self.machine.memory().peek(start_addr.wrapping_add(i as u16)))
                    .collect();
                AssemblyResult {
                    success: true,
                    byte_count,
                    machine_code,
                    start_addr,
                    end_addr: self.machine.assembler().end_address(),
                    error_message: None,
                    error_line: None,
                }
            }
            Err(err) => AssemblyResult {
                success: false,
                byte_count: 0,
                machine_code: Vec::new(),
                start_addr,
                end_addr: start_addr,
                error_message: Some(err.to_string()),
                error_line: err.line_number(),
            },
        }
    }

    pub fn start(&mut self) {
        self.machine.start();
    }

    pub fn stop(&mut self) {
        self.machine.stop();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.machine.is_running()
    }

    /// Run one quantum; call from `setInterval`. Returns instructions executed.
    pub fn tick(&mut self) -> usize {
        self.machine.tick().executed
    }

    /// Execute a single instruction. Returns false if it halted the machine
    /// or nothing is assembled.
    pub fn step(&mut self) -> bool {
        self.machine.step() == Some(Step::Continue)
    }

    /// Reset registers; a full reset also clears memory and the display
    pub fn reset(&mut self, full: bool) {
        self.machine.reset(full);
    }

    /// Store a key code at the key port
    pub fn key_press(&mut self, code: u8) {
        self.machine.key_press(code);
    }

    // Register getters
    #[wasm_bindgen(getter)]
    pub fn a(&self) -> u8 {
        self.machine.cpu().a()
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> u8 {
        self.machine.cpu().x()
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> u8 {
        self.machine.cpu().y()
    }

    #[wasm_bindgen(getter)]
    pub fn pc(&self) -> u16 {
        self.machine.cpu().pc()
    }

    #[wasm_bindgen(getter)]
    pub fn sp(&self) -> u16 {
        self.machine.cpu().sp()
    }

    #[wasm_bindgen(getter)]
    pub fn status(&self) -> u8 {
        self.machine.cpu().status()
    }

    // Memory access methods

    /// Read a single byte as the CPU would
    pub fn read_memory(&self, addr: u16) -> u8 {
        self.machine.read(addr)
    }

    /// Read a 256-byte page without triggering the read hook
    pub fn get_memory_page(&self, page: u8) -> Vec<u8> {
        let start = (page as u16) << 8;
        (0..256).map(|i| self.machine.memory().peek(start + i)).collect()
    }

    /// Hex dump of the assembled program
    pub fn hex_dump(&self, ascii: bool) -> String {
        self.machine.hex_dump(HexDumpOptions { ascii })
    }

    /// Address of every label from the last assembly, as `name=$xxxx` lines
    pub fn symbols(&self) -> String {
        self.machine
            .symbols()
            .symbols()
            .iter()
            .map(|s| format!("{}=${:04X}", s.name, s.address))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
