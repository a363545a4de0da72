//! Instruction encoder for the 6502 assembler
//!
//! Chooses the addressing mode for an operand and produces the instruction
//! bytes. Modes are tried in `AddressingMode::MATCH_ORDER`; the first mode the
//! mnemonic supports whose operand pattern matches wins, and its encoding is
//! final even if it then fails a range check.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::addressing::AddressingMode;
use crate::assembler::symbol_table::SymbolTable;
use crate::assembler::{LineError, Pass};
use crate::opcodes::{lookup, Mnemonic};

/// Operand bytes emitted for an unresolved label during the index pass.
pub const PLACEHOLDER: u16 = 0x1234;

/// How the captured operand text is turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    /// No operand
    None,
    /// `$` followed by hex digits
    Hex,
    /// Decimal digits
    Decimal,
    /// Label name
    Label,
    /// `<label` or `>label`
    LabelByte,
}

struct Pattern {
    mode: AddressingMode,
    form: Form,
    regex: Regex,
}

const LABEL: &str = "[0-9A-Za-z_]+";

fn pattern(mode: AddressingMode, form: Form, regex: &str) -> Pattern {
    Pattern {
        mode,
        form,
        regex: Regex::new(regex).expect("operand pattern"),
    }
}

/// Operand patterns grouped by mode, in matching priority order.
static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    use AddressingMode::*;
    vec![
        pattern(Single, Form::None, r"^(?i:a)?$"),
        pattern(Immediate, Form::Hex, r"^#\$([0-9A-Fa-f]{1,2})$"),
        pattern(Immediate, Form::Decimal, r"^#([0-9]{1,3})$"),
        pattern(Immediate, Form::LabelByte, &format!(r"^#([<>]{})$", LABEL)),
        pattern(ZeroPage, Form::Hex, r"^\$([0-9A-Fa-f]{1,2})$"),
        pattern(ZeroPage, Form::Decimal, r"^([0-9]{1,3})$"),
        pattern(ZeroPageX, Form::Hex, r"^\$([0-9A-Fa-f]{1,2}),[Xx]$"),
        pattern(ZeroPageX, Form::Decimal, r"^([0-9]{1,3}),[Xx]$"),
        pattern(ZeroPageY, Form::Hex, r"^\$([0-9A-Fa-f]{1,2}),[Yy]$"),
        pattern(ZeroPageY, Form::Decimal, r"^([0-9]{1,3}),[Yy]$"),
        pattern(AbsoluteX, Form::Hex, r"^\$([0-9A-Fa-f]{3,4}),[Xx]$"),
        pattern(AbsoluteX, Form::Label, &format!(r"^({}),[Xx]$", LABEL)),
        pattern(AbsoluteY, Form::Hex, r"^\$([0-9A-Fa-f]{3,4}),[Yy]$"),
        pattern(AbsoluteY, Form::Label, &format!(r"^({}),[Yy]$", LABEL)),
        pattern(IndirectX, Form::Hex, r"^\(\$([0-9A-Fa-f]{1,2}),[Xx]\)$"),
        pattern(IndirectY, Form::Hex, r"^\(\$([0-9A-Fa-f]{1,2})\),[Yy]$"),
        pattern(Absolute, Form::Hex, r"^\$([0-9A-Fa-f]{3,4})$"),
        pattern(Absolute, Form::Label, &format!(r"^({})$", LABEL)),
        pattern(Relative, Form::Hex, r"^\$([0-9A-Fa-f]{1,4})$"),
        pattern(Relative, Form::Label, &format!(r"^({})$", LABEL)),
        pattern(Indirect, Form::Hex, r"^\(\$([0-9A-Fa-f]{1,4})\)$"),
        pattern(Indirect, Form::Label, &format!(r"^\(({})\)$", LABEL)),
    ]
});

/// Everything the encoder needs to know about where it is.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    /// Address of the instruction's opcode byte
    pub pc: u16,
    /// Which assembler pass is running
    pub pass: Pass,
    /// Labels known so far
    pub symbols: &'a SymbolTable,
}

impl EncodeContext<'_> {
    /// Resolves a label to its address.
    ///
    /// During the index pass an unknown label yields `None` so the caller can
    /// emit a placeholder. During the commit pass it is an error.
    fn resolve(&self, name: &str) -> Result<Option<u16>, LineError> {
        match self.symbols.address_of(name) {
            Some(addr) => Ok(Some(addr)),
            None if self.pass == Pass::Index => Ok(None),
            None => Err(LineError::UnresolvedLabel(name.to_string())),
        }
    }
}

/// Returns the addressing mode `operand` selects for `mnemonic`, if any.
pub fn select_mode(mnemonic: Mnemonic, operand: &str) -> Option<AddressingMode> {
    find_pattern(mnemonic, operand).map(|(p, _)| p.mode)
}

fn find_pattern(mnemonic: Mnemonic, operand: &str) -> Option<(&'static Pattern, String)> {
    let entry = lookup(mnemonic);
    AddressingMode::MATCH_ORDER
        .iter()
        .filter(|mode| entry.supports(**mode))
        .flat_map(|mode| PATTERNS.iter().filter(move |p| p.mode == *mode))
        .find_map(|p| {
            p.regex.captures(operand).map(|caps| {
                let text = caps.get(1).map_or("", |m| m.as_str()).to_string();
                (p, text)
            })
        })
}

fn byte_value(text: &str, radix: u32) -> Result<u8, LineError> {
    let value = u32::from_str_radix(text, radix).map_err(|_| LineError::InvalidNumber(text.to_string()))?;
    u8::try_from(value).map_err(|_| LineError::ValueOutOfRange { value, max: 0xFF })
}

fn word_value(text: &str) -> Result<u16, LineError> {
    let value = u32::from_str_radix(text, 16).map_err(|_| LineError::InvalidNumber(text.to_string()))?;
    u16::try_from(value).map_err(|_| LineError::ValueOutOfRange { value, max: 0xFFFF })
}

/// Encode an instruction into bytes
///
/// `operand` must already have its spaces removed.
pub fn encode(mnemonic: Mnemonic, operand: &str, ctx: &EncodeContext<'_>) -> Result<Vec<u8>, LineError> {
    let Some((pattern, text)) = find_pattern(mnemonic, operand) else {
        return Err(LineError::InvalidOperand {
            mnemonic: mnemonic.as_str().to_string(),
            operand: operand.to_string(),
        });
    };

    let mode = pattern.mode;
    let opcode = lookup(mnemonic).opcode(mode).ok_or(LineError::Syntax)?;

    let mut bytes = Vec::with_capacity(mode.instruction_size() as usize);
    bytes.push(opcode);

    match (mode, pattern.form) {
        (AddressingMode::Single, _) => {}
        (AddressingMode::Relative, form) => {
            let target = match form {
                Form::Hex => Some(word_value(&text)?),
                _ => ctx.resolve(&text)?,
            };
            bytes.push(branch_offset(ctx, target)?);
        }
        (_, Form::LabelByte) => {
            let (selector, name) = text.split_at(1);
            let value = match ctx.symbols.address_of(name) {
                Some(addr) if selector == ">" => (addr >> 8) as u8,
                Some(addr) => (addr & 0xFF) as u8,
                None => 0,
            };
            bytes.push(value);
        }
        (_, Form::Label) => {
            let addr = ctx.resolve(&text)?.unwrap_or(PLACEHOLDER);
            bytes.extend_from_slice(&addr.to_le_bytes());
        }
        (mode, Form::Hex) if mode.operand_size() == 2 => {
            bytes.extend_from_slice(&word_value(&text)?.to_le_bytes());
        }
        (_, Form::Hex) => bytes.push(byte_value(&text, 16)?),
        (_, Form::Decimal) => bytes.push(byte_value(&text, 10)?),
        (_, Form::None) => {}
    }

    Ok(bytes)
}

/// Displacement byte for a branch to `target`.
///
/// An unknown target, or one out of reach during the index pass, encodes as 0
/// so the instruction still occupies two bytes.
fn branch_offset(ctx: &EncodeContext<'_>, target: Option<u16>) -> Result<u8, LineError> {
    let Some(target) = target else {
        return Ok(0);
    };
    let next = ctx.pc as i32 + 2;
    let displacement = target as i32 - next;
    match i8::try_from(displacement) {
        Ok(offset) => Ok(offset as u8),
        Err(_) if ctx.pass == Pass::Index => Ok(0),
        Err(_) => Err(LineError::BranchOutOfRange { target }),
    }
}
