//! 6502 Assembler Module
//!
//! Converts assembly language source code into machine code placed directly
//! into a `MemoryBus`.
//!
//! ## Two passes
//!
//! 1. **Index pass**: walks every line, records each `label:` at the current
//!    program counter and compiles the line only to learn its length. Labels
//!    that are not known yet encode as the placeholder word `$1234`.
//! 2. **Commit pass**: resets the program counter to the origin, compiles every
//!    line again with all labels known and writes the bytes.
//!
//! A label operand always selects a two-byte encoding, so the placeholder has
//! the same width as the final address and both passes agree on every label
//! address.
//!
//! ## Syntax
//!
//! ```text
//! ; comment
//! start:  LDA #$01        ; immediate, hex
//!         STA $0200,X     ; absolute indexed
//!         BNE start       ; relative branch to a label
//! * = $0800               ; relocate the program counter
//! table:  DCB $01,2,$ff   ; literal bytes
//! ```

pub mod encoder;
pub mod parser;
pub mod symbol_table;

use thiserror::Error;

use crate::config::AssemblerConfig;
use crate::diagnostics::Diagnostics;
use crate::memory::MemoryBus;
use crate::opcodes::Mnemonic;
use encoder::EncodeContext;
use parser::{AssemblyLine, Statement};
use symbol_table::SymbolTable;

/// A symbol table entry mapping a label to an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Label name (case-sensitive)
    pub name: String,

    /// Resolved memory address for this label
    pub address: u16,

    /// Source line where label was defined (1-indexed)
    pub defined_at: usize,
}

/// Assembler pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Collects label addresses; unresolved labels are tolerated
    Index,
    /// Emits final bytes; every label must resolve
    Commit,
}

/// Classification of assembly errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed line, unknown instruction or unsupported operand
    Syntax,

    /// Label defined twice
    LabelRedefinition,

    /// Value, branch or relocation outside what the encoding can hold
    Range,

    /// Label still unknown in the commit pass
    UnresolvedLabel,
}

/// Why a single line failed to assemble
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("syntax error")]
    Syntax,

    #[error("unknown instruction `{0}`")]
    UnknownInstruction(String),

    #[error("invalid operand `{operand}` for {mnemonic}")]
    InvalidOperand { mnemonic: String, operand: String },

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("invalid DCB value `{0}`")]
    InvalidByte(String),

    #[error("label `{name}` already defined at line {first_line}")]
    LabelRedefined { name: String, first_line: usize },

    #[error("value {value} out of range (max {max})")]
    ValueOutOfRange { value: u32, max: u32 },

    #[error("unable to relocate code outside 64k memory")]
    RelocationOutOfRange,

    #[error("branch target ${target:04X} out of range")]
    BranchOutOfRange { target: u16 },

    #[error("program does not fit in 64k memory")]
    AddressOverflow,

    #[error("undefined label `{0}`")]
    UnresolvedLabel(String),
}

impl LineError {
    /// Error class of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            LineError::Syntax
            | LineError::UnknownInstruction(_)
            | LineError::InvalidOperand { .. }
            | LineError::InvalidNumber(_)
            | LineError::InvalidByte(_) => ErrorKind::Syntax,
            LineError::LabelRedefined { .. } => ErrorKind::LabelRedefinition,
            LineError::ValueOutOfRange { .. }
            | LineError::RelocationOutOfRange
            | LineError::BranchOutOfRange { .. }
            | LineError::AddressOverflow => ErrorKind::Range,
            LineError::UnresolvedLabel(_) => ErrorKind::UnresolvedLabel,
        }
    }
}

/// An error that aborts assembly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// A line failed; `line_number` is 1-indexed
    #[error("line {line_number}: {reason}: {line_text}")]
    Line {
        line_number: usize,
        line_text: String,
        reason: LineError,
    },

    /// The source assembled to zero bytes
    #[error("no code to run")]
    NoCode,
}

impl AssemblyError {
    /// Error class, or `None` for `NoCode`
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AssemblyError::Line { reason, .. } => Some(reason.kind()),
            AssemblyError::NoCode => None,
        }
    }

    /// 1-indexed failing line, if any
    pub fn line_number(&self) -> Option<usize> {
        match self {
            AssemblyError::Line { line_number, .. } => Some(*line_number),
            AssemblyError::NoCode => None,
        }
    }
}

/// What one line contributes to the image
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineOutput {
    Nothing,
    Bytes(Vec<u8>),
    Relocate(u16),
}

/// Two-pass assembler
///
/// # Examples
///
/// ```
/// use sim6502::{AddressSpace, Assembler, MemoryBus};
///
/// let mut memory = AddressSpace::new();
/// let mut assembler = Assembler::default();
///
/// let len = assembler
///     .assemble("start: LDX #$00\nloop: INX\n BNE loop\n JMP start", &mut memory)
///     .unwrap();
///
/// assert_eq!(len, 8);
/// assert_eq!(assembler.symbols().address_of("loop"), Some(0x0602));
/// assert_eq!(memory.read(0x0604), 0xFD); // branch back to loop
/// ```
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    config: AssemblerConfig,
    symbols: SymbolTable,
    code_len: usize,
    end: u16,
}

impl Assembler {
    /// Creates an assembler with the given options
    pub fn new(config: AssemblerConfig) -> Self {
        Self {
            config,
            symbols: SymbolTable::new(),
            code_len: 0,
            end: config.origin,
        }
    }

    /// Program origin
    pub fn origin(&self) -> u16 {
        self.config.origin
    }

    /// Labels from the most recent assembly
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Bytes emitted by the most recent commit pass
    pub fn code_len(&self) -> usize {
        self.code_len
    }

    /// Program counter after the most recent commit pass
    pub fn end_address(&self) -> u16 {
        self.end
    }

    /// Assembles `source` into `memory` and returns the number of bytes emitted.
    pub fn assemble<M: MemoryBus>(&mut self, source: &str, memory: &mut M) -> Result<usize, AssemblyError> {
        self.assemble_with(source, memory, &mut Diagnostics::new())
    }

    /// Like `assemble`, reporting progress and failures to `diagnostics`.
    pub fn assemble_with<M: MemoryBus>(
        &mut self,
        source: &str,
        memory: &mut M,
        diagnostics: &mut Diagnostics,
    ) -> Result<usize, AssemblyError> {
        diagnostics.info("indexing labels...");
        let indexed = self.run_pass(Pass::Index, source, |_, _| {});
        if let Err(err) = indexed {
            report(diagnostics, &err);
            return Err(err);
        }

        let count = self.symbols.len();
        diagnostics.info(&format!(
            "found {} label{}",
            count,
            if count == 1 { "" } else { "s" }
        ));

        diagnostics.info("compiling code...");
        let committed = self.run_pass(Pass::Commit, source, |addr, byte| memory.write(addr, byte));
        let len = match committed {
            Ok(len) => len,
            Err(err) => {
                report(diagnostics, &err);
                return Err(err);
            }
        };

        if len == 0 {
            diagnostics.warn("no code to run");
            return Err(AssemblyError::NoCode);
        }

        diagnostics.info(&format!("code compiled successfully: {} bytes", len));
        Ok(len)
    }

    /// Runs a single pass over `source`, handing each emitted byte to `emit`.
    ///
    /// The index pass clears and repopulates the symbol table; the commit pass
    /// reads it. Returns the number of bytes emitted.
    pub fn run_pass<F>(&mut self, pass: Pass, source: &str, mut emit: F) -> Result<usize, AssemblyError>
    where
        F: FnMut(u16, u8),
    {
        if pass == Pass::Index {
            self.symbols.clear();
        }

        // Address as u32 so running off the end of memory is detectable
        let mut pc = self.config.origin as u32;
        let mut emitted = 0;

        for (index, text) in source.lines().enumerate() {
            let line_number = index + 1;
            let fail = |reason: LineError| AssemblyError::Line {
                line_number,
                line_text: text.to_string(),
                reason,
            };

            // The index pass only measures; a failing line counts as zero
            // bytes and is reported by the commit pass
            let line = match parser::parse_line(text) {
                Ok(line) => line,
                Err(_) if pass == Pass::Index => continue,
                Err(reason) => return Err(fail(reason)),
            };

            if pass == Pass::Index {
                if let Some(name) = line.label {
                    let addr = u16::try_from(pc).map_err(|_| fail(LineError::AddressOverflow))?;
                    self.symbols
                        .add_symbol(name, addr, line_number)
                        .map_err(|existing| {
                            fail(LineError::LabelRedefined {
                                name: name.to_string(),
                                first_line: existing.defined_at,
                            })
                        })?;
                }
            }

            let output = match self.compile_line(&line, pc, pass) {
                Ok(output) => output,
                Err(_) if pass == Pass::Index => LineOutput::Nothing,
                Err(reason) => return Err(fail(reason)),
            };
            match output {
                LineOutput::Nothing => {}
                LineOutput::Relocate(addr) => pc = addr as u32,
                LineOutput::Bytes(bytes) => {
                    if pc + bytes.len() as u32 > 0x10000 {
                        if pass == Pass::Index {
                            continue;
                        }
                        return Err(fail(LineError::AddressOverflow));
                    }
                    for byte in bytes {
                        emit(pc as u16, byte);
                        pc += 1;
                        emitted += 1;
                    }
                }
            }
        }

        if pass == Pass::Commit {
            self.code_len = emitted;
            // One past the last byte; the terminator byte goes here
            self.end = (pc & 0xFFFF) as u16;
        }
        log::debug!("{:?} pass: {} bytes", pass, emitted);
        Ok(emitted)
    }

    fn compile_line(&self, line: &AssemblyLine<'_>, pc: u32, pass: Pass) -> Result<LineOutput, LineError> {
        match &line.statement {
            Statement::Empty => Ok(LineOutput::Nothing),
            Statement::Relocate(target) => {
                let addr = parser::parse_number(target)?;
                let addr = u16::try_from(addr).map_err(|_| LineError::RelocationOutOfRange)?;
                Ok(LineOutput::Relocate(addr))
            }
            Statement::Dcb(list) => dcb(list).map(LineOutput::Bytes),
            Statement::Instruction { mnemonic, operand } => {
                let mnemonic: Mnemonic = mnemonic
                    .parse()
                    .map_err(|_| LineError::UnknownInstruction(mnemonic.clone()))?;
                let pc = u16::try_from(pc).map_err(|_| LineError::AddressOverflow)?;
                let ctx = EncodeContext {
                    pc,
                    pass,
                    symbols: &self.symbols,
                };
                encoder::encode(mnemonic, operand, &ctx).map(LineOutput::Bytes)
            }
        }
    }
}

/// Parses a `DCB` list. Empty entries are skipped.
fn dcb(list: &str) -> Result<Vec<u8>, LineError> {
    list.split(',')
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let value = parser::parse_number(entry).map_err(|_| LineError::InvalidByte(entry.to_string()))?;
            u8::try_from(value).map_err(|_| LineError::ValueOutOfRange { value, max: 0xFF })
        })
        .collect()
}

fn report(diagnostics: &mut Diagnostics, err: &AssemblyError) {
    let AssemblyError::Line {
        line_number,
        line_text,
        reason,
    } = err
    else {
        return;
    };
    match reason {
        LineError::LabelRedefined { .. } => {
            diagnostics.warn(&format!("label already defined at line {}: {}", line_number, line_text));
        }
        _ => {
            diagnostics.warn(&reason.to_string());
            diagnostics.warn(&format!("syntax error - line {}: {}", line_number, line_text));
        }
    }
}
