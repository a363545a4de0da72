//! Assembly source parser
//!
//! Splits one source line into an optional label and a statement. Operand
//! interpretation is left to the encoder.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::assembler::LineError;

static LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-Za-z_]+):\s*(.*)$").expect("label pattern"));

static RELOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\*\s*=\s*(\$?[0-9A-Fa-f]*)$").expect("relocation pattern"));

static INSTRUCTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9A-Za-z_]+)(?:\s+(.*))?$").expect("instruction pattern"));

/// A parsed line of assembly source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyLine<'a> {
    /// Optional label definition (e.g., "start" from "start:")
    pub label: Option<&'a str>,

    /// What the rest of the line asks for
    pub statement: Statement,
}

/// The non-label part of a source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Blank, comment-only or label-only line
    Empty,

    /// `* = address`
    Relocate(String),

    /// `DCB` byte list, spaces removed
    Dcb(String),

    /// Mnemonic (upper-cased) and operand text with spaces removed
    Instruction { mnemonic: String, operand: String },
}

/// Removes a trailing `;` comment and surrounding whitespace
pub fn strip_comment(line: &str) -> &str {
    let code = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };
    code.trim()
}

/// Parse one source line
///
/// A mnemonic must be separated from its operand by whitespace; `LDA#$01` is a
/// syntax error.
pub fn parse_line(line: &str) -> Result<AssemblyLine<'_>, LineError> {
    let code = strip_comment(line);

    let (label, rest) = match LABEL.captures(code) {
        Some(caps) => {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let rest = caps.get(2).map_or("", |m| m.as_str()).trim();
            (Some(name), rest)
        }
        None => (None, code),
    };

    if rest.is_empty() {
        return Ok(AssemblyLine {
            label,
            statement: Statement::Empty,
        });
    }

    if let Some(caps) = RELOCATION.captures(rest) {
        let target = caps.get(1).map_or("", |m| m.as_str());
        return Ok(AssemblyLine {
            label,
            statement: Statement::Relocate(target.to_string()),
        });
    }

    let caps = INSTRUCTION.captures(rest).ok_or(LineError::Syntax)?;
    let mnemonic = caps.get(1).map_or("", |m| m.as_str()).to_ascii_uppercase();
    let operand: String = caps
        .get(2)
        .map_or("", |m| m.as_str())
        .chars()
        .filter(|c| *c != ' ')
        .collect();

    let statement = if mnemonic == "DCB" {
        Statement::Dcb(operand)
    } else {
        Statement::Instruction { mnemonic, operand }
    };

    Ok(AssemblyLine { label, statement })
}

/// Parse a number from a string (supports hex $XX, decimal, binary %XXXXXXXX)
///
/// The result is wide enough for range checks against 8 and 16 bit limits.
pub fn parse_number(s: &str) -> Result<u32, LineError> {
    let s = s.trim();
    let invalid = || LineError::InvalidNumber(s.to_string());

    if let Some(hex) = s.strip_prefix('$') {
        u32::from_str_radix(hex, 16).map_err(|_| invalid())
    } else if let Some(bin) = s.strip_prefix('%') {
        u32::from_str_radix(bin, 2).map_err(|_| invalid())
    } else if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.parse::<u32>().map_err(|_| invalid())
    } else {
        Err(invalid())
    }
}
