//! # Opcode Table
//!
//! This module contains the instruction table that serves as the single source of
//! truth for both directions of translation:
//!
//! - **Assembler**: mnemonic → `{addressing mode → opcode byte}`
//! - **Interpreter**: opcode byte → `(mnemonic, addressing mode)`
//!
//! The table lists all 56 documented NMOS 6502 mnemonics and their 151 opcodes.
//! Undocumented opcodes are not listed; the interpreter halts on them.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::addressing::AddressingMode;
use crate::addressing::AddressingMode::*;

/// The 56 documented 6502 instruction mnemonics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
}

impl Mnemonic {
    /// Upper-case three-letter name.
    pub fn as_str(self) -> &'static str {
        match self {
            Mnemonic::Adc => "ADC",
            Mnemonic::And => "AND",
            Mnemonic::Asl => "ASL",
            Mnemonic::Bcc => "BCC",
            Mnemonic::Bcs => "BCS",
            Mnemonic::Beq => "BEQ",
            Mnemonic::Bit => "BIT",
            Mnemonic::Bmi => "BMI",
            Mnemonic::Bne => "BNE",
            Mnemonic::Bpl => "BPL",
            Mnemonic::Brk => "BRK",
            Mnemonic::Bvc => "BVC",
            Mnemonic::Bvs => "BVS",
            Mnemonic::Clc => "CLC",
            Mnemonic::Cld => "CLD",
            Mnemonic::Cli => "CLI",
            Mnemonic::Clv => "CLV",
            Mnemonic::Cmp => "CMP",
            Mnemonic::Cpx => "CPX",
            Mnemonic::Cpy => "CPY",
            Mnemonic::Dec => "DEC",
            Mnemonic::Dex => "DEX",
            Mnemonic::Dey => "DEY",
            Mnemonic::Eor => "EOR",
            Mnemonic::Inc => "INC",
            Mnemonic::Inx => "INX",
            Mnemonic::Iny => "INY",
            Mnemonic::Jmp => "JMP",
            Mnemonic::Jsr => "JSR",
            Mnemonic::Lda => "LDA",
            Mnemonic::Ldx => "LDX",
            Mnemonic::Ldy => "LDY",
            Mnemonic::Lsr => "LSR",
            Mnemonic::Nop => "NOP",
            Mnemonic::Ora => "ORA",
            Mnemonic::Pha => "PHA",
            Mnemonic::Php => "PHP",
            Mnemonic::Pla => "PLA",
            Mnemonic::Plp => "PLP",
            Mnemonic::Rol => "ROL",
            Mnemonic::Ror => "ROR",
            Mnemonic::Rti => "RTI",
            Mnemonic::Rts => "RTS",
            Mnemonic::Sbc => "SBC",
            Mnemonic::Sec => "SEC",
            Mnemonic::Sed => "SED",
            Mnemonic::Sei => "SEI",
            Mnemonic::Sta => "STA",
            Mnemonic::Stx => "STX",
            Mnemonic::Sty => "STY",
            Mnemonic::Tax => "TAX",
            Mnemonic::Tay => "TAY",
            Mnemonic::Tsx => "TSX",
            Mnemonic::Txa => "TXA",
            Mnemonic::Txs => "TXS",
            Mnemonic::Tya => "TYA",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown mnemonic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMnemonic(pub String);

impl FromStr for Mnemonic {
    type Err = UnknownMnemonic;

    /// Parses a mnemonic case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        OPCODE_TABLE
            .iter()
            .map(|entry| entry.mnemonic)
            .find(|m| m.as_str() == upper)
            .ok_or(UnknownMnemonic(s.to_string()))
    }
}

/// All encodings of one mnemonic, keyed by addressing mode.
///
/// # Examples
///
/// ```
/// use sim6502::{lookup, AddressingMode, Mnemonic};
///
/// let lda = lookup(Mnemonic::Lda);
/// assert_eq!(lda.opcode(AddressingMode::Immediate), Some(0xA9));
/// assert_eq!(lda.opcode(AddressingMode::Relative), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionEncodings {
    /// Instruction mnemonic
    pub mnemonic: Mnemonic,

    /// Supported addressing modes and their opcode bytes
    pub encodings: &'static [(AddressingMode, u8)],
}

impl InstructionEncodings {
    /// Opcode byte for `mode`, or `None` if the mnemonic does not support it.
    pub fn opcode(&self, mode: AddressingMode) -> Option<u8> {
        self.encodings
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, opcode)| *opcode)
    }

    /// Returns true if the mnemonic has an encoding for `mode`.
    pub fn supports(&self, mode: AddressingMode) -> bool {
        self.opcode(mode).is_some()
    }
}

macro_rules! entry {
    ($mnemonic:ident, [$(($mode:ident, $opcode:expr)),* $(,)?]) => {
        InstructionEncodings {
            mnemonic: Mnemonic::$mnemonic,
            encodings: &[$(($mode, $opcode)),*],
        }
    };
}

/// Instruction table, one entry per mnemonic.
pub static OPCODE_TABLE: [InstructionEncodings; 56] = [
    entry!(Adc, [(Immediate, 0x69), (ZeroPage, 0x65), (ZeroPageX, 0x75), (Absolute, 0x6D), (AbsoluteX, 0x7D), (AbsoluteY, 0x79), (IndirectX, 0x61), (IndirectY, 0x71)]),
    entry!(And, [(Immediate, 0x29), (ZeroPage, 0x25), (ZeroPageX, 0x35), (Absolute, 0x2D), (AbsoluteX, 0x3D), (AbsoluteY, 0x39), (IndirectX, 0x21), (IndirectY, 0x31)]),
    entry!(Asl, [(ZeroPage, 0x06), (ZeroPageX, 0x16), (Absolute, 0x0E), (AbsoluteX, 0x1E), (Single, 0x0A)]),
    entry!(Bcc, [(Relative, 0x90)]),
    entry!(Bcs, [(Relative, 0xB0)]),
    entry!(Beq, [(Relative, 0xF0)]),
    entry!(Bit, [(ZeroPage, 0x24), (Absolute, 0x2C)]),
    entry!(Bmi, [(Relative, 0x30)]),
    entry!(Bne, [(Relative, 0xD0)]),
    entry!(Bpl, [(Relative, 0x10)]),
    entry!(Brk, [(Single, 0x00)]),
    entry!(Bvc, [(Relative, 0x50)]),
    entry!(Bvs, [(Relative, 0x70)]),
    entry!(Clc, [(Single, 0x18)]),
    entry!(Cld, [(Single, 0xD8)]),
    entry!(Cli, [(Single, 0x58)]),
    entry!(Clv, [(Single, 0xB8)]),
    entry!(Cmp, [(Immediate, 0xC9), (ZeroPage, 0xC5), (ZeroPageX, 0xD5), (Absolute, 0xCD), (AbsoluteX, 0xDD), (AbsoluteY, 0xD9), (IndirectX, 0xC1), (IndirectY, 0xD1)]),
    entry!(Cpx, [(Immediate, 0xE0), (ZeroPage, 0xE4), (Absolute, 0xEC)]),
    entry!(Cpy, [(Immediate, 0xC0), (ZeroPage, 0xC4), (Absolute, 0xCC)]),
    entry!(Dec, [(ZeroPage, 0xC6), (ZeroPageX, 0xD6), (Absolute, 0xCE), (AbsoluteX, 0xDE)]),
    entry!(Dex, [(Single, 0xCA)]),
    entry!(Dey, [(Single, 0x88)]),
    entry!(Eor, [(Immediate, 0x49), (ZeroPage, 0x45), (ZeroPageX, 0x55), (Absolute, 0x4D), (AbsoluteX, 0x5D), (AbsoluteY, 0x59), (IndirectX, 0x41), (IndirectY, 0x51)]),
    entry!(Inc, [(ZeroPage, 0xE6), (ZeroPageX, 0xF6), (Absolute, 0xEE), (AbsoluteX, 0xFE)]),
    entry!(Inx, [(Single, 0xE8)]),
    entry!(Iny, [(Single, 0xC8)]),
    entry!(Jmp, [(Absolute, 0x4C), (Indirect, 0x6C)]),
    entry!(Jsr, [(Absolute, 0x20)]),
    entry!(Lda, [(Immediate, 0xA9), (ZeroPage, 0xA5), (ZeroPageX, 0xB5), (Absolute, 0xAD), (AbsoluteX, 0xBD), (AbsoluteY, 0xB9), (IndirectX, 0xA1), (IndirectY, 0xB1)]),
    entry!(Ldx, [(Immediate, 0xA2), (ZeroPage, 0xA6), (ZeroPageY, 0xB6), (Absolute, 0xAE), (AbsoluteY, 0xBE)]),
    entry!(Ldy, [(Immediate, 0xA0), (ZeroPage, 0xA4), (ZeroPageX, 0xB4), (Absolute, 0xAC), (AbsoluteX, 0xBC)]),
    entry!(Lsr, [(ZeroPage, 0x46), (ZeroPageX, 0x56), (Absolute, 0x4E), (AbsoluteX, 0x5E), (Single, 0x4A)]),
    entry!(Nop, [(Single, 0xEA)]),
    entry!(Ora, [(Immediate, 0x09), (ZeroPage, 0x05), (ZeroPageX, 0x15), (Absolute, 0x0D), (AbsoluteX, 0x1D), (AbsoluteY, 0x19), (IndirectX, 0x01), (IndirectY, 0x11)]),
    entry!(Pha, [(Single, 0x48)]),
    entry!(Php, [(Single, 0x08)]),
    entry!(Pla, [(Single, 0x68)]),
    entry!(Plp, [(Single, 0x28)]),
    entry!(Rol, [(ZeroPage, 0x26), (ZeroPageX, 0x36), (Absolute, 0x2E), (AbsoluteX, 0x3E), (Single, 0x2A)]),
    entry!(Ror, [(ZeroPage, 0x66), (ZeroPageX, 0x76), (Absolute, 0x6E), (AbsoluteX, 0x7E), (Single, 0x6A)]),
    entry!(Rti, [(Single, 0x40)]),
    entry!(Rts, [(Single, 0x60)]),
    entry!(Sbc, [(Immediate, 0xE9), (ZeroPage, 0xE5), (ZeroPageX, 0xF5), (Absolute, 0xED), (AbsoluteX, 0xFD), (AbsoluteY, 0xF9), (IndirectX, 0xE1), (IndirectY, 0xF1)]),
    entry!(Sec, [(Single, 0x38)]),
    entry!(Sed, [(Single, 0xF8)]),
    entry!(Sei, [(Single, 0x78)]),
    entry!(Sta, [(ZeroPage, 0x85), (ZeroPageX, 0x95), (Absolute, 0x8D), (AbsoluteX, 0x9D), (AbsoluteY, 0x99), (IndirectX, 0x81), (IndirectY, 0x91)]),
    entry!(Stx, [(ZeroPage, 0x86), (ZeroPageY, 0x96), (Absolute, 0x8E)]),
    entry!(Sty, [(ZeroPage, 0x84), (ZeroPageX, 0x94), (Absolute, 0x8C)]),
    entry!(Tax, [(Single, 0xAA)]),
    entry!(Tay, [(Single, 0xA8)]),
    entry!(Tsx, [(Single, 0xBA)]),
    entry!(Txa, [(Single, 0x8A)]),
    entry!(Txs, [(Single, 0x9A)]),
    entry!(Tya, [(Single, 0x98)]),
];

/// Returns the encodings for `mnemonic`.
pub fn lookup(mnemonic: Mnemonic) -> &'static InstructionEncodings {
    // Table rows follow the declaration order of Mnemonic
    &OPCODE_TABLE[mnemonic as usize]
}

/// Reverse table indexed by opcode byte, built once from `OPCODE_TABLE`.
static DECODE_TABLE: Lazy<[Option<(Mnemonic, AddressingMode)>; 256]> = Lazy::new(|| {
    let mut table = [None; 256];
    for entry in OPCODE_TABLE.iter() {
        for &(mode, opcode) in entry.encodings {
            table[opcode as usize] = Some((entry.mnemonic, mode));
        }
    }
    table
});

/// Decodes an opcode byte into its mnemonic and addressing mode.
///
/// Returns `None` for undocumented opcodes.
///
/// # Examples
///
/// ```
/// use sim6502::{decode, AddressingMode, Mnemonic};
///
/// assert_eq!(decode(0xA9), Some((Mnemonic::Lda, AddressingMode::Immediate)));
/// assert_eq!(decode(0x02), None);
/// ```
pub fn decode(opcode: u8) -> Option<(Mnemonic, AddressingMode)> {
    DECODE_TABLE[opcode as usize]
}
