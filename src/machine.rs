//! # Machine
//!
//! `Machine` wires the assembler, the CPU, the scheduler and the devices
//! around one `AddressSpace`, and reports progress through `Diagnostics`.
//!
//! ## Example
//!
//! ```
//! use sim6502::{HaltReason, Machine, MachineConfig, MessageLog};
//!
//! let log = MessageLog::new();
//! let mut machine = Machine::new(MachineConfig::default());
//! machine.set_message_sink(log.clone());
//!
//! let len = machine.assemble("LDA #$01\nSTA $00\nLDA $00\nBRK").unwrap();
//! assert_eq!(len, 7);
//!
//! machine.start();
//! let report = machine.tick();
//! assert_eq!(report.halt, Some(HaltReason::Break { address: 0x0606 }));
//! assert_eq!(machine.cpu().a(), 0x01);
//! assert!(!machine.is_running());
//! assert_eq!(log.last().as_deref(), Some("Program end at PC=$0606"));
//! ```

use rand_core::RngCore;

use crate::assembler::symbol_table::SymbolTable;
use crate::assembler::{Assembler, AssemblyError};
use crate::config::MachineConfig;
use crate::cpu::{Cpu, HaltReason, Step};
use crate::devices::{Framebuffer, PixelSink, RandomPort, Resolution};
use crate::diagnostics::{Diagnostics, MessageSink};
use crate::hexdump::{hex_dump, HexDumpOptions};
use crate::memory::{ReadHook, WriteHook};
use crate::scheduler::{Scheduler, TickReport};
use crate::{AddressSpace, MemoryBus};

/// Assembler, interpreter and devices sharing one address space.
#[derive(Debug)]
pub struct Machine {
    config: MachineConfig,
    cpu: Cpu<AddressSpace>,
    assembler: Assembler,
    scheduler: Scheduler,
    diagnostics: Diagnostics,
    framebuffer: Framebuffer,
    /// Set by a successful assembly, cleared by a full reset
    compiled: bool,
}

impl Machine {
    /// Creates a machine with the random port backed by the OS generator.
    #[cfg(feature = "os-rng")]
    pub fn new(config: MachineConfig) -> Self {
        Self::with_rng(config, rand_core::OsRng)
    }

    /// Creates a machine with the random port backed by `rng`.
    pub fn with_rng<R: RngCore + 'static>(config: MachineConfig, rng: R) -> Self {
        let mut machine = Self::without_devices(config);
        RandomPort::new(rng).attach(&mut machine.cpu.memory, config.random_port);
        machine
    }

    /// Creates a machine with no hooks registered.
    pub fn without_devices(config: MachineConfig) -> Self {
        Self {
            config,
            cpu: Cpu::new(AddressSpace::new(), config.origin),
            assembler: Assembler::new(config.assembler()),
            scheduler: Scheduler::new(config.quantum),
            diagnostics: Diagnostics::new(),
            framebuffer: Framebuffer::new(config.display),
            compiled: false,
        }
    }

    /// Configuration the machine was built with.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Forwards diagnostic messages to `sink`.
    pub fn set_message_sink<S: MessageSink + 'static>(&mut self, sink: S) {
        self.diagnostics.set_sink(Some(Box::new(sink)));
    }

    /// Stops forwarding diagnostic messages. They are still logged.
    pub fn clear_message_sink(&mut self) {
        self.diagnostics.set_sink(None);
    }

    /// Resets the machine, then assembles `source` at the configured origin.
    ///
    /// On success a zero byte is stored just past the program, so running
    /// off its end executes BRK. On failure the machine refuses to run until
    /// a later assembly succeeds.
    pub fn assemble(&mut self, source: &str) -> Result<usize, AssemblyError> {
        self.reset(true);
        let len = self
            .assembler
            .assemble_with(source, &mut self.cpu.memory, &mut self.diagnostics)?;
        let end = self.assembler.end_address();
        self.cpu.memory.write(end, 0x00);
        self.compiled = true;
        Ok(len)
    }

    /// True once a program has assembled and no full reset has followed.
    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Starts ticking. Refused with a warning when nothing is assembled.
    pub fn start(&mut self) {
        if self.refuse_uncompiled() {
            return;
        }
        self.scheduler.start();
    }

    /// Stops at the next instruction boundary.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// True between `start` and the next halt or `stop`.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Runs one scheduler quantum.
    pub fn tick(&mut self) -> TickReport {
        let report = self.scheduler.tick(&mut self.cpu.state, &mut self.cpu.memory);
        if let Some(reason) = report.halt {
            self.report_halt(reason);
        }
        report
    }

    /// Executes exactly one instruction, whether or not the machine is running.
    ///
    /// Returns `None` without executing anything when nothing is assembled.
    pub fn step(&mut self) -> Option<Step> {
        if self.refuse_uncompiled() {
            return None;
        }
        let step = self.cpu.step();
        if let Step::Halted(reason) = step {
            self.scheduler.stop();
            self.report_halt(reason);
        }
        Some(step)
    }

    /// Starts the machine and ticks until it halts or `max_ticks` ticks pass.
    ///
    /// Returns the halt reason, or `None` if the program was still running
    /// or nothing is assembled.
    pub fn run(&mut self, max_ticks: usize) -> Option<HaltReason> {
        self.start();
        if !self.is_running() {
            return None;
        }
        for _ in 0..max_ticks {
            if let Some(reason) = self.tick().halt {
                return Some(reason);
            }
        }
        None
    }

    /// Stops the machine and restores the power-on registers.
    ///
    /// A full reset also zeroes memory, notifying the display of every
    /// cleared cell.
    pub fn reset(&mut self, full: bool) {
        self.scheduler.stop();
        self.cpu.reset(self.config.origin);
        if full {
            self.cpu.memory.reset_notifying();
            self.compiled = false;
        }
    }

    fn refuse_uncompiled(&mut self) -> bool {
        if !self.compiled {
            self.diagnostics.warn("no code to run");
        }
        !self.compiled
    }

    fn report_halt(&mut self, reason: HaltReason) {
        if reason.is_fault() {
            self.diagnostics.warn(&reason.to_string());
        }
        let pc = self.cpu.pc().wrapping_sub(1);
        self.diagnostics.info(&format!("Program end at PC=${:04X}", pc));
    }

    /// Replaces the read hook. See `AddressSpace::register_read_hook`.
    pub fn register_read_hook(&mut self, lo: u16, hi: u16, handler: Option<ReadHook>) {
        self.cpu.memory.register_read_hook(lo, hi, handler);
    }

    /// Replaces the write hook. See `AddressSpace::register_write_hook`.
    pub fn register_write_hook(&mut self, lo: u16, hi: u16, handler: Option<WriteHook>) {
        self.cpu.memory.register_write_hook(lo, hi, handler);
    }

    /// Stores a key code at the key port.
    pub fn key_press(&mut self, code: u8) {
        self.cpu.memory.write(self.config.key_port, code);
    }

    /// Attaches `sink` to the framebuffer at the configured resolution.
    pub fn attach_display<S: PixelSink + 'static>(&mut self, sink: S) {
        self.framebuffer.attach(&mut self.cpu.memory, sink);
    }

    /// Switches the framebuffer to `resolution`, attaches `sink` and sends
    /// it the current contents of the new range.
    pub fn set_display<S: PixelSink + 'static>(&mut self, resolution: Resolution, mut sink: S) {
        self.config.display = resolution;
        self.framebuffer = Framebuffer::new(resolution);
        self.framebuffer.refresh(&self.cpu.memory, &mut sink);
        self.framebuffer.attach(&mut self.cpu.memory, sink);
    }

    /// Current framebuffer geometry.
    pub fn framebuffer(&self) -> Framebuffer {
        self.framebuffer
    }

    /// Hex dump of the most recently assembled program.
    pub fn hex_dump(&self, options: HexDumpOptions) -> String {
        hex_dump(
            &self.cpu.memory,
            self.assembler.origin(),
            self.assembler.code_len(),
            options,
        )
    }

    /// Labels from the most recent assembly.
    pub fn symbols(&self) -> &SymbolTable {
        self.assembler.symbols()
    }

    /// Assembler state from the most recent assembly.
    pub fn assembler(&self) -> &Assembler {
        &self.assembler
    }

    /// The interpreter and the memory it owns.
    pub fn cpu(&self) -> &Cpu<AddressSpace> {
        &self.cpu
    }

    /// Mutable access to registers and memory.
    pub fn cpu_mut(&mut self) -> &mut Cpu<AddressSpace> {
        &mut self.cpu
    }

    /// The shared address space.
    pub fn memory(&self) -> &AddressSpace {
        &self.cpu.memory
    }

    /// Mutable address space. Writes go through the write hook.
    pub fn memory_mut(&mut self) -> &mut AddressSpace {
        &mut self.cpu.memory
    }

    /// Reads a byte as the CPU would, through the read hook.
    pub fn read(&self, addr: u16) -> u8 {
        self.cpu.memory.read(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::PixelBuffer;
    use crate::MessageLog;
    use rand_core::impls;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Constant(u8);

    impl RngCore for Constant {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
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

    fn machine() -> (Machine, MessageLog) {
        let log = MessageLog::new();
        let mut machine = Machine::with_rng(MachineConfig::default(), Constant(0x37));
        machine.set_message_sink(log.clone());
        (machine, log)
    }

    #[test]
    fn test_assemble_writes_terminator() {
        let (mut machine, _) = machine();
        let len = machine.assemble("LDA #$05\n*=$0700\nLDX #$01").unwrap();
        assert_eq!(len, 4);
        assert_eq!(machine.assembler().end_address(), 0x0702);
        assert_eq!(machine.read(0x0702), 0x00);
        assert_eq!(machine.read(0x0701), 0x01);
    }

    #[test]
    fn test_assemble_resets_first() {
        let (mut machine, _) = machine();
        machine.assemble("loop: JMP loop").unwrap();
        machine.cpu_mut().set_a(0x99);
        machine.memory_mut().write(0x1000, 0x42);
        machine.start();
        assert!(machine.is_running());

        machine.assemble("NOP").unwrap();
        assert_eq!(machine.cpu().a(), 0);
        assert_eq!(machine.read(0x1000), 0);
        assert!(!machine.is_running());
    }

    #[test]
    fn test_failed_assembly_reports_line() {
        let (mut machine, log) = machine();
        let err = machine.assemble("NOP\nFOO #1").unwrap_err();
        assert_eq!(err.line_number(), Some(2));
        assert_eq!(log.last().as_deref(), Some("syntax error - line 2: FOO #1"));
    }

    #[test]
    fn test_full_reset_forgets_program() {
        let (mut machine, log) = machine();
        machine.assemble("LDA #$01").unwrap();
        assert!(machine.is_compiled());

        machine.reset(false);
        assert!(machine.is_compiled());
        machine.reset(true);
        assert!(!machine.is_compiled());
        assert_eq!(machine.step(), None);
        assert_eq!(log.last().as_deref(), Some("no code to run"));
    }

    #[test]
    fn test_random_port_reads_rng() {
        let (mut machine, _) = machine();
        machine.assemble("LDA $FE").unwrap();
        machine.step();
        assert_eq!(machine.cpu().a(), 0x37);
    }

    #[test]
    fn test_key_press_visible_to_program() {
        let (mut machine, _) = machine();
        machine.assemble("LDX $FF").unwrap();
        machine.key_press(b'w');
        machine.step();
        assert_eq!(machine.cpu().x(), b'w');
    }

    #[test]
    fn test_unknown_opcode_reported() {
        let (mut machine, log) = machine();
        machine.assemble("DCB $02").unwrap();
        let halt = machine.run(1);
        assert_eq!(halt, Some(HaltReason::UnknownOpcode { opcode: 0x02, address: 0x0600 }));
        assert!(log.contains("Address $0600 - unknown opcode $02"));
        assert_eq!(log.last().as_deref(), Some("Program end at PC=$0600"));
    }

    #[test]
    fn test_run_gives_up_after_max_ticks() {
        let (mut machine, _) = machine();
        machine.assemble("loop: JMP loop").unwrap();
        assert_eq!(machine.run(3), None);
        assert!(machine.is_running());
        machine.stop();
        assert!(!machine.is_running());
    }

    #[test]
    fn test_display_receives_pixels() {
        let (mut machine, _) = machine();
        let screen = Rc::new(RefCell::new(PixelBuffer::new(Resolution::R32)));
        machine.attach_display(crate::devices::shared(&screen));

        machine.assemble("LDA #$11\nSTA $0200\nSTA $05FF").unwrap();
        machine.run(1);

        let screen = screen.borrow();
        assert_eq!(screen.get(0, 0), Some(0x01));
        assert_eq!(screen.get(31, 31), Some(0x01));
    }

    #[test]
    fn test_full_reset_clears_display() {
        let (mut machine, _) = machine();
        let screen = Rc::new(RefCell::new(PixelBuffer::new(Resolution::R32)));
        machine.attach_display(crate::devices::shared(&screen));
        machine.assemble("LDA #$05\nSTA $0210").unwrap();
        machine.run(1);
        assert_eq!(screen.borrow().lit(), 1);

        machine.reset(true);
        assert_eq!(screen.borrow().lit(), 0);
    }

    #[test]
    fn test_hex_dump_covers_program() {
        let (mut machine, _) = machine();
        machine.assemble("LDA #$01\nSTA $00\nLDA $00\nBRK").unwrap();
        assert_eq!(
            machine.hex_dump(HexDumpOptions::default()),
            "0600: A9 01 85 00 A5 00 00"
        );
    }
}
