//! Hex dump of an address range.
//!
//! Rows are 16 bytes wide and start with the address of their first byte:
//!
//! ```text
//! 0600: A9 01 85 00 A5 00 00
//! ```
//!
//! Bytes are taken with `AddressSpace::peek`, so dumping never triggers a
//! read hook.

use std::fmt;

use crate::AddressSpace;

/// Bytes shown per row.
pub const BYTES_PER_ROW: usize = 16;

/// Formatting options for `hex_dump`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexDumpOptions {
    /// Append a printable-ASCII column after the hex bytes
    pub ascii: bool,
}

/// One row of a hex dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRow {
    pub address: u16,
    pub bytes: Vec<u8>,
}

impl HexRow {
    /// The bytes as printable ASCII, with `.` for anything else.
    pub fn ascii(&self) -> String {
        self.bytes
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect()
    }

    /// Formats the row, padding short rows so the ASCII column lines up.
    pub fn format(&self, options: HexDumpOptions) -> String {
        let hex: Vec<String> = self.bytes.iter().map(|b| format!("{:02X}", b)).collect();
        let mut line = format!("{:04X}: {}", self.address, hex.join(" "));
        if options.ascii {
            let missing = BYTES_PER_ROW.saturating_sub(self.bytes.len());
            line.push_str(&" ".repeat(missing * 3));
            line.push_str("  |");
            line.push_str(&self.ascii());
            line.push('|');
        }
        line
    }
}

impl fmt::Display for HexRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(HexDumpOptions::default()))
    }
}

/// Splits `len` bytes starting at `start` into rows.
///
/// The range is clipped at the end of the address space.
pub fn rows(memory: &AddressSpace, start: u16, len: usize) -> Vec<HexRow> {
    let len = len.min(0x10000 - start as usize);
    let bytes: Vec<u8> = (0..len).map(|i| memory.peek(start + i as u16)).collect();

    bytes
        .chunks(BYTES_PER_ROW)
        .enumerate()
        .map(|(i, chunk)| HexRow {
            address: start + (i * BYTES_PER_ROW) as u16,
            bytes: chunk.to_vec(),
        })
        .collect()
}

/// Formats `len` bytes starting at `start`, one row per line.
///
/// # Examples
///
/// ```
/// use sim6502::{hex_dump, AddressSpace, HexDumpOptions};
///
/// let mut memory = AddressSpace::new();
/// memory.load(0x0600, &[0xA9, 0x48, 0x49]);
///
/// let dump = hex_dump(&memory, 0x0600, 3, HexDumpOptions { ascii: true });
/// assert!(dump.starts_with("0600: A9 48 49 "));
/// assert!(dump.ends_with("  |.HI|"));
/// ```
pub fn hex_dump(memory: &AddressSpace, start: u16, len: usize, options: HexDumpOptions) -> String {
    rows(memory, start, len)
        .iter()
        .map(|row| row.format(options))
        .collect::<Vec<_>>()
        .join("\n")
}
