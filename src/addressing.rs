//! # Addressing Modes
//!
//! This module defines the addressing modes understood by the assembler and the
//! interpreter. Each mode determines how operand bytes follow an opcode and how
//! the interpreter calculates the effective memory address.

/// 6502 addressing mode enumeration.
///
/// # Operand Sizes
///
/// - **0 bytes**: Single (implied or accumulator)
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, IndirectX, IndirectY, Relative
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// 8-bit constant operand in instruction.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X register, wrapping within zero page.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y register, wrapping within zero page.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    IndirectY,

    /// No operand bytes. Covers implied instructions and the accumulator
    /// form of the shifts.
    ///
    /// Examples: CLC, RTS, ASL
    Single,

    /// Signed 8-bit offset for branch instructions.
    ///
    /// Example: BEQ label
    Relative,

    /// Indirect jump through a 16-bit pointer. Only used by JMP.
    ///
    /// Example: JMP ($FFFC)
    Indirect,
}

impl AddressingMode {
    /// Order in which the assembler tries to recognize an operand.
    ///
    /// Zero-page forms come before the absolute forms they overlap with, and
    /// the indexed forms come before plain absolute so that `label,X` is never
    /// read as a bare label.
    pub const MATCH_ORDER: [AddressingMode; 12] = [
        AddressingMode::Single,
        AddressingMode::Immediate,
        AddressingMode::ZeroPage,
        AddressingMode::ZeroPageX,
        AddressingMode::ZeroPageY,
        AddressingMode::AbsoluteX,
        AddressingMode::AbsoluteY,
        AddressingMode::IndirectX,
        AddressingMode::IndirectY,
        AddressingMode::Absolute,
        AddressingMode::Relative,
        AddressingMode::Indirect,
    ];

    /// Number of operand bytes following the opcode.
    pub fn operand_size(self) -> u8 {
        match self {
            AddressingMode::Single => 0,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 1,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
        }
    }

    /// Total instruction size in bytes (opcode plus operand).
    pub fn instruction_size(self) -> u8 {
        1 + self.operand_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_order_covers_every_mode_once() {
        let order = AddressingMode::MATCH_ORDER;
        for (i, mode) in order.iter().enumerate() {
            assert!(!order[i + 1..].contains(mode), "{:?} listed twice", mode);
        }
        assert_eq!(order[0], AddressingMode::Single);
        assert_eq!(order[10], AddressingMode::Relative);
    }

    #[test]
    fn test_instruction_sizes() {
        assert_eq!(AddressingMode::Single.instruction_size(), 1);
        assert_eq!(AddressingMode::Immediate.instruction_size(), 2);
        assert_eq!(AddressingMode::Relative.instruction_size(), 2);
        assert_eq!(AddressingMode::AbsoluteY.instruction_size(), 3);
        assert_eq!(AddressingMode::Indirect.instruction_size(), 3);
    }
}
