//! # CPU State and Execution
//!
//! This module contains the register file of the 6502 and the
//! fetch-decode-execute routine that drives it.
//!
//! ## CPU State
//!
//! `CpuState` holds:
//! - **Registers**: Accumulator (A), index registers (X, Y)
//! - **Program counter** (PC): 16-bit address of next instruction
//! - **Stack pointer** (SP): offset above the 0x0100 stack page base. The stack
//!   holds 256 bytes; `SP == 0x100` means empty and `SP == 0` means full.
//! - **Status register** (P): packed NV-BDIZC byte, bit 5 always set
//!
//! ## Execution Model
//!
//! - `execute(&mut state, &mut memory)`: executes one instruction and reports
//!   whether the machine should keep running
//! - `Cpu::step()`: the same, for a CPU that owns its memory
//!
//! Halting is not an error. BRK, unknown opcodes, a jump to address 0 and
//! stack overflow or underflow all produce `Step::Halted` with a `HaltReason`.

use std::fmt;

use crate::addressing::AddressingMode;
use crate::instructions::{
    alu, branches, control, flags, inc_dec, load_store, shifts, stack, transfer,
};
use crate::opcodes::{decode, Mnemonic};
use crate::MemoryBus;

/// Carry flag (bit 0)
pub const FLAG_C: u8 = 0b0000_0001;
/// Zero flag (bit 1)
pub const FLAG_Z: u8 = 0b0000_0010;
/// Interrupt disable flag (bit 2, no effect)
pub const FLAG_I: u8 = 0b0000_0100;
/// Decimal mode flag (bit 3)
pub const FLAG_D: u8 = 0b0000_1000;
/// Break flag (bit 4, no effect)
pub const FLAG_B: u8 = 0b0001_0000;
/// Unused bit 5, always set
pub const FLAG_UNUSED: u8 = 0b0010_0000;
/// Overflow flag (bit 6)
pub const FLAG_V: u8 = 0b0100_0000;
/// Negative flag (bit 7)
pub const FLAG_N: u8 = 0b1000_0000;

/// Base address of the stack page.
pub const STACK_BASE: u16 = 0x0100;

/// Stack pointer value of an empty stack.
pub const STACK_EMPTY: u16 = 0x0100;

/// Why execution stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// BRK executed at `address`.
    Break { address: u16 },

    /// Opcode byte with no documented instruction.
    UnknownOpcode { opcode: u8, address: u16 },

    /// Program counter reached 0x0000.
    ProgramEnd,

    /// Push attempted with no room left on the stack.
    StackOverflow,

    /// Pop attempted on an empty stack.
    StackUnderflow,
}

impl HaltReason {
    /// Returns true for halts caused by a fault rather than normal termination.
    pub fn is_fault(&self) -> bool {
        matches!(
            self,
            HaltReason::UnknownOpcode { .. } | HaltReason::StackOverflow | HaltReason::StackUnderflow
        )
    }
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Break { address } => write!(f, "BRK at ${:04X}", address),
            HaltReason::UnknownOpcode { opcode, address } => {
                write!(f, "Address ${:04X} - unknown opcode ${:02X}", address, opcode)
            }
            HaltReason::ProgramEnd => write!(f, "PC reached $0000"),
            HaltReason::StackOverflow => write!(f, "Stack full"),
            HaltReason::StackUnderflow => write!(f, "Stack empty"),
        }
    }
}

/// Outcome of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The instruction completed and execution may continue.
    Continue,

    /// The machine stopped.
    Halted(HaltReason),
}

impl Step {
    /// Returns the halt reason, if any.
    pub fn halt(self) -> Option<HaltReason> {
        match self {
            Step::Continue => None,
            Step::Halted(reason) => Some(reason),
        }
    }
}

/// Architectural register file of the 6502.
///
/// Fields are public so hosts and tests can inspect and seed state directly.
/// Instructions go through the helper methods, which keep P bit 5 set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuState {
    /// Program counter
    pub pc: u16,

    /// Stack pointer, 0..=0x100, added to `STACK_BASE`
    pub sp: u16,

    /// Accumulator
    pub a: u8,

    /// X index register
    pub x: u8,

    /// Y index register
    pub y: u8,

    /// Packed status register (NV-BDIZC)
    pub p: u8,

    /// Stack fault raised during the current instruction
    pub(crate) fault: Option<HaltReason>,
}

impl CpuState {
    /// Creates the power-on state with execution starting at `origin`.
    ///
    /// A, X and Y are zero, the stack is empty, and only the unused flag is set.
    pub fn new(origin: u16) -> Self {
        Self {
            pc: origin,
            sp: STACK_EMPTY,
            a: 0,
            x: 0,
            y: 0,
            p: FLAG_UNUSED,
            fault: None,
        }
    }

    /// Restores the power-on state, keeping memory untouched.
    pub fn reset(&mut self, origin: u16) {
        *self = Self::new(origin);
    }

    /// Returns true if every bit in `mask` is set in P.
    pub fn flag(&self, mask: u8) -> bool {
        self.p & mask == mask
    }

    /// Sets or clears the bits in `mask`.
    pub fn set_flag(&mut self, mask: u8, on: bool) {
        if on {
            self.p |= mask;
        } else {
            self.p &= !mask;
        }
        self.p |= FLAG_UNUSED;
    }

    /// Replaces the whole status register. Bit 5 is forced on.
    pub fn set_status(&mut self, value: u8) {
        self.p = value | FLAG_UNUSED;
    }

    /// Updates Z and N from `value`.
    pub(crate) fn update_zn(&mut self, value: u8) {
        self.set_flag(FLAG_Z, value == 0);
        self.set_flag(FLAG_N, value & 0x80 != 0);
    }

    /// Reads the byte at PC and advances PC.
    pub(crate) fn fetch_byte<M: MemoryBus>(&mut self, memory: &M) -> u8 {
        let value = memory.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Reads a little-endian word at PC and advances PC by two.
    pub(crate) fn fetch_word<M: MemoryBus>(&mut self, memory: &M) -> u16 {
        let low = self.fetch_byte(memory) as u16;
        let high = self.fetch_byte(memory) as u16;
        (high << 8) | low
    }

    /// Pushes a byte onto the stack.
    ///
    /// On a full stack the write is skipped and a `StackOverflow` fault is
    /// recorded for the current instruction.
    pub(crate) fn push<M: MemoryBus>(&mut self, memory: &mut M, value: u8) {
        if self.sp == 0 {
            self.fault.get_or_insert(HaltReason::StackOverflow);
            return;
        }
        self.sp -= 1;
        memory.write(STACK_BASE + self.sp, value);
    }

    /// Pops a byte from the stack.
    ///
    /// On an empty stack this returns 0 and records a `StackUnderflow` fault.
    pub(crate) fn pop<M: MemoryBus>(&mut self, memory: &M) -> u8 {
        if self.sp >= STACK_EMPTY {
            self.fault.get_or_insert(HaltReason::StackUnderflow);
            return 0;
        }
        let value = memory.read(STACK_BASE + self.sp);
        self.sp += 1;
        value
    }

    /// Consumes the operand bytes for `mode` and returns the effective address.
    ///
    /// Zero-page indexed modes wrap within the zero page. Indirect pointers in
    /// the zero page also wrap when read. `Immediate` returns the address of
    /// the operand byte itself.
    pub(crate) fn operand_address<M: MemoryBus>(&mut self, memory: &M, mode: AddressingMode) -> u16 {
        match mode {
            AddressingMode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                addr
            }
            AddressingMode::ZeroPage => self.fetch_byte(memory) as u16,
            AddressingMode::ZeroPageX => self.fetch_byte(memory).wrapping_add(self.x) as u16,
            AddressingMode::ZeroPageY => self.fetch_byte(memory).wrapping_add(self.y) as u16,
            AddressingMode::Absolute => self.fetch_word(memory),
            AddressingMode::AbsoluteX => self.fetch_word(memory).wrapping_add(self.x as u16),
            AddressingMode::AbsoluteY => self.fetch_word(memory).wrapping_add(self.y as u16),
            AddressingMode::IndirectX => {
                let zp = self.fetch_byte(memory).wrapping_add(self.x);
                zero_page_word(memory, zp)
            }
            AddressingMode::IndirectY => {
                let zp = self.fetch_byte(memory);
                zero_page_word(memory, zp).wrapping_add(self.y as u16)
            }
            AddressingMode::Indirect => {
                let pointer = self.fetch_word(memory);
                memory.read_word(pointer)
            }
            AddressingMode::Relative => {
                let offset = self.fetch_byte(memory);
                branch_target(self.pc, offset)
            }
            // Never reached for memory operands; Single has no operand bytes
            AddressingMode::Single => self.pc,
        }
    }

    /// Consumes the operand bytes for `mode` and returns the operand value.
    pub(crate) fn operand_value<M: MemoryBus>(&mut self, memory: &M, mode: AddressingMode) -> u8 {
        let addr = self.operand_address(memory, mode);
        memory.read(addr)
    }
}

impl Default for CpuState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ORIGIN)
    }
}

/// Reads a pointer from the zero page, wrapping the high byte at 0xFF.
fn zero_page_word<M: MemoryBus>(memory: &M, zp: u8) -> u16 {
    let low = memory.read(zp as u16) as u16;
    let high = memory.read(zp.wrapping_add(1) as u16) as u16;
    (high << 8) | low
}

/// Applies a branch displacement to the address following the branch.
///
/// Displacements of 0x80 and above move backwards by `0x100 - offset`.
pub fn branch_target(next_pc: u16, offset: u8) -> u16 {
    if offset > 0x7F {
        next_pc.wrapping_sub(0x100 - offset as u16)
    } else {
        next_pc.wrapping_add(offset as u16)
    }
}

/// Executes one instruction at `state.pc`.
///
/// Operand bytes are consumed in program order. After the instruction
/// completes, a recorded stack fault or a program counter of zero halts the
/// machine.
///
/// # Examples
///
/// ```
/// use sim6502::{execute, AddressSpace, CpuState, HaltReason, MemoryBus, Step};
///
/// let mut memory = AddressSpace::new();
/// memory.load(0x0600, &[0xA9, 0x2A, 0x00]); // LDA #$2A; BRK
///
/// let mut state = CpuState::new(0x0600);
/// assert_eq!(execute(&mut state, &mut memory), Step::Continue);
/// assert_eq!(state.a, 0x2A);
/// assert_eq!(
///     execute(&mut state, &mut memory),
///     Step::Halted(HaltReason::Break { address: 0x0602 })
/// );
/// ```
pub fn execute<M: MemoryBus>(state: &mut CpuState, memory: &mut M) -> Step {
    state.fault = None;
    let address = state.pc;
    let opcode = state.fetch_byte(memory);

    let Some((mnemonic, mode)) = decode(opcode) else {
        log::debug!("unknown opcode ${:02X} at ${:04X}", opcode, address);
        return Step::Halted(HaltReason::UnknownOpcode { opcode, address });
    };

    log::trace!("${:04X}: {} {:?}", address, mnemonic, mode);

    match mnemonic {
        Mnemonic::Adc => alu::execute_adc(state, memory, mode),
        Mnemonic::Sbc => alu::execute_sbc(state, memory, mode),
        Mnemonic::And => alu::execute_and(state, memory, mode),
        Mnemonic::Ora => alu::execute_ora(state, memory, mode),
        Mnemonic::Eor => alu::execute_eor(state, memory, mode),
        Mnemonic::Cmp => alu::execute_cmp(state, memory, mode),
        Mnemonic::Cpx => alu::execute_cpx(state, memory, mode),
        Mnemonic::Cpy => alu::execute_cpy(state, memory, mode),
        Mnemonic::Bit => alu::execute_bit(state, memory, mode),

        Mnemonic::Bcc => branches::execute_branch(state, memory, FLAG_C, false),
        Mnemonic::Bcs => branches::execute_branch(state, memory, FLAG_C, true),
        Mnemonic::Bne => branches::execute_branch(state, memory, FLAG_Z, false),
        Mnemonic::Beq => branches::execute_branch(state, memory, FLAG_Z, true),
        Mnemonic::Bpl => branches::execute_branch(state, memory, FLAG_N, false),
        Mnemonic::Bmi => branches::execute_branch(state, memory, FLAG_N, true),
        Mnemonic::Bvc => branches::execute_branch(state, memory, FLAG_V, false),
        Mnemonic::Bvs => branches::execute_branch(state, memory, FLAG_V, true),

        Mnemonic::Asl => shifts::execute_asl(state, memory, mode),
        Mnemonic::Lsr => shifts::execute_lsr(state, memory, mode),
        Mnemonic::Rol => shifts::execute_rol(state, memory, mode),
        Mnemonic::Ror => shifts::execute_ror(state, memory, mode),

        Mnemonic::Lda => load_store::execute_lda(state, memory, mode),
        Mnemonic::Ldx => load_store::execute_ldx(state, memory, mode),
        Mnemonic::Ldy => load_store::execute_ldy(state, memory, mode),
        Mnemonic::Sta => load_store::execute_sta(state, memory, mode),
        Mnemonic::Stx => load_store::execute_stx(state, memory, mode),
        Mnemonic::Sty => load_store::execute_sty(state, memory, mode),

        Mnemonic::Inc => inc_dec::execute_inc(state, memory, mode),
        Mnemonic::Dec => inc_dec::execute_dec(state, memory, mode),
        Mnemonic::Inx => inc_dec::execute_inx(state),
        Mnemonic::Iny => inc_dec::execute_iny(state),
        Mnemonic::Dex => inc_dec::execute_dex(state),
        Mnemonic::Dey => inc_dec::execute_dey(state),

        Mnemonic::Brk => return Step::Halted(control::execute_brk(address)),
        Mnemonic::Jmp => control::execute_jmp(state, memory, mode),
        Mnemonic::Jsr => control::execute_jsr(state, memory, mode),
        Mnemonic::Rts => control::execute_rts(state, memory),
        Mnemonic::Rti => control::execute_rti(state, memory),
        Mnemonic::Nop => {}

        Mnemonic::Pha => stack::execute_pha(state, memory),
        Mnemonic::Php => stack::execute_php(state, memory),
        Mnemonic::Pla => stack::execute_pla(state, memory),
        Mnemonic::Plp => stack::execute_plp(state, memory),

        Mnemonic::Clc => flags::execute_clear(state, FLAG_C),
        Mnemonic::Cld => flags::execute_clear(state, FLAG_D),
        Mnemonic::Cli => flags::execute_clear(state, FLAG_I),
        Mnemonic::Clv => flags::execute_clear(state, FLAG_V),
        Mnemonic::Sec => flags::execute_set(state, FLAG_C),
        Mnemonic::Sed => flags::execute_set(state, FLAG_D),
        Mnemonic::Sei => flags::execute_set(state, FLAG_I),

        Mnemonic::Tax => transfer::execute_tax(state),
        Mnemonic::Tay => transfer::execute_tay(state),
        Mnemonic::Txa => transfer::execute_txa(state),
        Mnemonic::Tya => transfer::execute_tya(state),
        Mnemonic::Tsx => transfer::execute_tsx(state),
        Mnemonic::Txs => transfer::execute_txs(state),
    }

    if let Some(fault) = state.fault.take() {
        log::debug!("{} at ${:04X}", fault, address);
        return Step::Halted(fault);
    }
    if state.pc == 0 {
        return Step::Halted(HaltReason::ProgramEnd);
    }
    Step::Continue
}

/// 6502 CPU bound to the memory it executes from.
///
/// `Cpu` pairs a `CpuState` with a `MemoryBus` implementation and offers
/// register accessors in the shape hosts and tests expect.
///
/// # Type Parameters
///
/// * `M` - Memory bus implementation (must implement `MemoryBus` trait)
///
/// # Examples
///
/// ```
/// use sim6502::{AddressSpace, Cpu, MemoryBus, Step};
///
/// let mut memory = AddressSpace::new();
/// memory.load(0x0600, &[0xA2, 0x05, 0xE8]); // LDX #$05; INX
///
/// let mut cpu = Cpu::new(memory, 0x0600);
/// cpu.step();
/// assert_eq!(cpu.step(), Step::Continue);
/// assert_eq!(cpu.x(), 0x06);
/// assert_eq!(cpu.pc(), 0x0603);
/// ```
#[derive(Debug)]
pub struct Cpu<M: MemoryBus> {
    pub(crate) state: CpuState,
    pub(crate) memory: M,
}

impl<M: MemoryBus> Cpu<M> {
    /// Creates a CPU in the power-on state with PC at `origin`.
    pub fn new(memory: M, origin: u16) -> Self {
        Self {
            state: CpuState::new(origin),
            memory,
        }
    }

    /// Executes one instruction.
    pub fn step(&mut self) -> Step {
        execute(&mut self.state, &mut self.memory)
    }

    /// Restores the power-on register state with PC at `origin`.
    pub fn reset(&mut self, origin: u16) {
        self.state.reset(origin);
    }

    /// Register file.
    pub fn state(&self) -> &CpuState {
        &self.state
    }

    /// Mutable register file.
    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    /// Memory bus.
    pub fn memory(&self) -> &M {
        &self.memory
    }

    /// Mutable memory bus.
    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Consumes the CPU and returns its memory.
    pub fn into_memory(self) -> M {
        self.memory
    }

    // ========== Register Getters ==========

    /// Returns the accumulator register value.
    pub fn a(&self) -> u8 {
        self.state.a
    }

    /// Returns the X index register value.
    pub fn x(&self) -> u8 {
        self.state.x
    }

    /// Returns the Y index register value.
    pub fn y(&self) -> u8 {
        self.state.y
    }

    /// Returns the program counter value.
    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    /// Returns the stack pointer.
    ///
    /// The next push writes to 0x0100 + SP - 1. 0x100 means the stack is empty.
    pub fn sp(&self) -> u16 {
        self.state.sp
    }

    /// Returns the status register as a packed byte (NV-BDIZC, bit 5 set).
    pub fn status(&self) -> u8 {
        self.state.p
    }

    // ========== Status Flag Getters ==========

    /// Returns true if the Negative flag is set.
    pub fn flag_n(&self) -> bool {
        self.state.flag(FLAG_N)
    }

    /// Returns true if the Overflow flag is set.
    pub fn flag_v(&self) -> bool {
        self.state.flag(FLAG_V)
    }

    /// Returns true if the Break flag is set.
    pub fn flag_b(&self) -> bool {
        self.state.flag(FLAG_B)
    }

    /// Returns true if the Decimal mode flag is set.
    pub fn flag_d(&self) -> bool {
        self.state.flag(FLAG_D)
    }

    /// Returns true if the Interrupt Disable flag is set.
    pub fn flag_i(&self) -> bool {
        self.state.flag(FLAG_I)
    }

    /// Returns true if the Zero flag is set.
    pub fn flag_z(&self) -> bool {
        self.state.flag(FLAG_Z)
    }

    /// Returns true if the Carry flag is set.
    pub fn flag_c(&self) -> bool {
        self.state.flag(FLAG_C)
    }

    // ========== Setters ==========

    /// Sets the accumulator.
    pub fn set_a(&mut self, value: u8) {
        self.state.a = value;
    }

    /// Sets the X register.
    pub fn set_x(&mut self, value: u8) {
        self.state.x = value;
    }

    /// Sets the Y register.
    pub fn set_y(&mut self, value: u8) {
        self.state.y = value;
    }

    /// Sets the program counter.
    pub fn set_pc(&mut self, value: u16) {
        self.state.pc = value;
    }

    /// Sets the stack pointer, clamped to the empty position.
    pub fn set_sp(&mut self, value: u16) {
        self.state.sp = value.min(STACK_EMPTY);
    }

    /// Replaces the status register. Bit 5 is forced on.
    pub fn set_status(&mut self, value: u8) {
        self.state.set_status(value);
    }

    /// Sets or clears the Negative flag.
    pub fn set_flag_n(&mut self, on: bool) {
        self.state.set_flag(FLAG_N, on);
    }

    /// Sets or clears the Overflow flag.
    pub fn set_flag_v(&mut self, on: bool) {
        self.state.set_flag(FLAG_V, on);
    }

    /// Sets or clears the Decimal mode flag.
    pub fn set_flag_d(&mut self, on: bool) {
        self.state.set_flag(FLAG_D, on);
    }

    /// Sets or clears the Zero flag.
    pub fn set_flag_z(&mut self, on: bool) {
        self.state.set_flag(FLAG_Z, on);
    }

    /// Sets or clears the Carry flag.
    pub fn set_flag_c(&mut self, on: bool) {
        self.state.set_flag(FLAG_C, on);
    }
}
