//! Integration tests for the two-pass assembler.

use sim6502::{AddressSpace, Assembler, AssemblerConfig, AssemblyError, ErrorKind, LineError, MemoryBus, Pass};

fn assemble(source: &str) -> Result<(Vec<u8>, Assembler), AssemblyError> {
    let mut memory = AddressSpace::new();
    let mut assembler = Assembler::default();
    let len = assembler.assemble(source, &mut memory)?;
    let bytes = (0..len as u16).map(|i| memory.read(0x0600 + i)).collect();
    Ok((bytes, assembler))
}

fn bytes(source: &str) -> Vec<u8> {
    assemble(source).expect("source should assemble").0
}

fn error_kind(source: &str) -> Option<ErrorKind> {
    assemble(source).err().and_then(|e| e.kind())
}

#[test]
fn test_seven_byte_program() {
    assert_eq!(
        bytes("LDA #$01\nSTA $00\nLDA $00\nBRK"),
        vec![0xA9, 0x01, 0x85, 0x00, 0xA5, 0x00, 0x00]
    );
}

#[test]
fn test_dcb_emits_literal_bytes() {
    assert_eq!(bytes("DCB $01,2,$ff"), vec![0x01, 0x02, 0xFF]);
    assert_eq!(bytes("dcb 1, 2 , 3"), vec![0x01, 0x02, 0x03]);
}

#[test]
fn test_dcb_rejects_non_numeric() {
    let err = assemble("DCB $01,foo").unwrap_err();
    assert!(matches!(
        err,
        AssemblyError::Line { reason: LineError::InvalidByte(_), line_number: 1, .. }
    ));
    assert_eq!(err.kind(), Some(ErrorKind::Syntax));
}

#[test]
fn test_comments_and_blank_lines() {
    let source = "; header comment\n\n   NOP ; trailing\n\t\nBRK";
    assert_eq!(bytes(source), vec![0xEA, 0x00]);
}

#[test]
fn test_mnemonics_case_insensitive() {
    assert_eq!(bytes("lda #$10\nLdX #2"), vec![0xA9, 0x10, 0xA2, 0x02]);
}

#[test]
fn test_operand_spaces_removed() {
    assert_eq!(bytes("LDA $10 , X"), vec![0xB5, 0x10]);
    assert_eq!(bytes("LDA ($20) , Y"), vec![0xB1, 0x20]);
}

// ========== Addressing Mode Selection ==========

#[test]
fn test_every_operand_form() {
    assert_eq!(bytes("LDA #$44"), vec![0xA9, 0x44]);
    assert_eq!(bytes("LDA #68"), vec![0xA9, 0x44]);
    assert_eq!(bytes("LDA $44"), vec![0xA5, 0x44]);
    assert_eq!(bytes("LDA 68"), vec![0xA5, 0x44]);
    assert_eq!(bytes("LDA $44,X"), vec![0xB5, 0x44]);
    assert_eq!(bytes("LDX $44,Y"), vec![0xB6, 0x44]);
    assert_eq!(bytes("LDA $4400"), vec![0xAD, 0x00, 0x44]);
    assert_eq!(bytes("LDA $4400,X"), vec![0xBD, 0x00, 0x44]);
    assert_eq!(bytes("LDA $4400,Y"), vec![0xB9, 0x00, 0x44]);
    assert_eq!(bytes("LDA ($44,X)"), vec![0xA1, 0x44]);
    assert_eq!(bytes("LDA ($44),Y"), vec![0xB1, 0x44]);
    assert_eq!(bytes("JMP ($4400)"), vec![0x6C, 0x00, 0x44]);
}

#[test]
fn test_zero_page_y_only_where_supported() {
    // LDA has no zero-page,Y form; a two-digit operand is not absolute either
    assert!(assemble("LDA $44,Y").is_err());
    assert_eq!(bytes("LDA $044,Y"), vec![0xB9, 0x44, 0x00]);
}

#[test]
fn test_accumulator_forms() {
    assert_eq!(bytes("ASL\nASL A\nLSR a\nROL\nROR A"), vec![0x0A, 0x0A, 0x4A, 0x2A, 0x6A]);
}

#[test]
fn test_implied_with_operand_is_error() {
    assert_eq!(error_kind("INX #1"), Some(ErrorKind::Syntax));
}

#[test]
fn test_unknown_mnemonic() {
    let err = assemble("NOP\nXYZ $10").unwrap_err();
    assert_eq!(err.line_number(), Some(2));
    assert!(matches!(
        err,
        AssemblyError::Line { reason: LineError::UnknownInstruction(ref m), .. } if m == "XYZ"
    ));
}

// ========== Range Checks ==========

#[test]
fn test_immediate_out_of_range() {
    assert_eq!(error_kind("LDA #256"), Some(ErrorKind::Range));
    assert_eq!(bytes("LDA #255"), vec![0xA9, 0xFF]);
}

#[test]
fn test_relocation() {
    let mut memory = AddressSpace::new();
    let mut assembler = Assembler::default();
    let len = assembler.assemble("NOP\n*=$0700\nNOP\n* = 2048\nBRK", &mut memory).unwrap();

    assert_eq!(len, 3);
    assert_eq!(memory.read(0x0600), 0xEA);
    assert_eq!(memory.read(0x0700), 0xEA);
    assert_eq!(memory.read(0x0800), 0x00);
    assert_eq!(assembler.end_address(), 0x0801);
}

#[test]
fn test_relocation_outside_memory() {
    let err = assemble("*=$10000\nNOP").unwrap_err();
    assert!(matches!(
        err,
        AssemblyError::Line { reason: LineError::RelocationOutOfRange, .. }
    ));
    assert_eq!(err.kind(), Some(ErrorKind::Range));
}

#[test]
fn test_program_past_end_of_memory() {
    let err = assemble("*=$FFFF\nLDA $1234").unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Range));
}

// ========== Labels ==========

#[test]
fn test_forward_reference_resolves() {
    let (code, assembler) = assemble("JMP end\nNOP\nend: BRK").unwrap();

    assert_eq!(code, vec![0x4C, 0x04, 0x06, 0xEA, 0x00]);
    assert_eq!(assembler.symbols().address_of("end"), Some(0x0604));
}

#[test]
fn test_forward_indexed_reference() {
    let (code, _) = assemble("LDA table,X\nSTA table,Y\nBRK\ntable: DCB 1,2,3").unwrap();
    assert_eq!(&code[..6], &[0xBD, 0x07, 0x06, 0x99, 0x07, 0x06]);
}

#[test]
fn test_undefined_label_rejected_in_commit_pass() {
    let err = assemble("JMP nowhere").unwrap_err();
    assert!(matches!(
        err,
        AssemblyError::Line { reason: LineError::UnresolvedLabel(ref name), .. } if name == "nowhere"
    ));
    assert_eq!(err.kind(), Some(ErrorKind::UnresolvedLabel));
}

#[test]
fn test_label_redefinition() {
    let err = assemble("loop: NOP\nloop: BRK").unwrap_err();
    assert_eq!(err.line_number(), Some(2));
    assert_eq!(err.kind(), Some(ErrorKind::LabelRedefinition));
}

#[test]
fn test_label_only_line_emits_nothing() {
    let (code, assembler) = assemble("start:\n  LDA #1\nmiddle:\nend:\n  BRK").unwrap();
    assert_eq!(code, vec![0xA9, 0x01, 0x00]);
    assert_eq!(assembler.symbols().address_of("middle"), Some(0x0602));
    assert_eq!(assembler.symbols().address_of("end"), Some(0x0602));
}

#[test]
fn test_label_low_high_bytes() {
    let source = "LDA #<data\nLDX #>data\nBRK\n*=$1234\ndata: DCB 0";
    let (code, _) = assemble(source).unwrap();
    assert_eq!(&code[..4], &[0xA9, 0x34, 0xA2, 0x12]);
}

#[test]
fn test_label_byte_of_unknown_label_is_zero() {
    assert_eq!(bytes("LDA #<missing"), vec![0xA9, 0x00]);
}

// ========== Branches ==========

#[test]
fn test_backward_branch() {
    let (code, _) = assemble("loop: DEX\nBNE loop").unwrap();
    assert_eq!(code, vec![0xCA, 0xD0, 0xFD]);
}

#[test]
fn test_forward_branch() {
    let (code, _) = assemble("BEQ skip\nNOP\nNOP\nskip: BRK").unwrap();
    assert_eq!(code, vec![0xF0, 0x02, 0xEA, 0xEA, 0x00]);
}

#[test]
fn test_branch_to_self() {
    let (code, _) = assemble("here: BEQ here").unwrap();
    assert_eq!(code, vec![0xF0, 0xFE]);
}

#[test]
fn test_branch_to_literal_address() {
    assert_eq!(bytes("BNE $0600"), vec![0xD0, 0xFE]);
}

#[test]
fn test_branch_out_of_range() {
    let mut source = String::from("BNE far\n");
    for _ in 0..130 {
        source.push_str("NOP\n");
    }
    source.push_str("far: BRK");
    assert_eq!(error_kind(&source), Some(ErrorKind::Range));
}

// ========== Passes ==========

#[test]
fn test_index_and_commit_images_match_without_forward_refs() {
    let source = "start: LDX #$08\nloop: DEX\nSTA $0200,Y\nBNE loop\nJMP start";
    let mut assembler = Assembler::default();

    let mut index_image = Vec::new();
    assembler
        .run_pass(Pass::Index, source, |addr, byte| index_image.push((addr, byte)))
        .unwrap();
    let mut commit_image = Vec::new();
    assembler
        .run_pass(Pass::Commit, source, |addr, byte| commit_image.push((addr, byte)))
        .unwrap();

    assert_eq!(index_image, commit_image);
}

#[test]
fn test_forward_reference_uses_placeholder_in_index_pass() {
    let source = "JMP later\nlater: BRK";
    let mut assembler = Assembler::default();
    let mut index_image = Vec::new();
    assembler
        .run_pass(Pass::Index, source, |_, byte| index_image.push(byte))
        .unwrap();

    assert_eq!(index_image, vec![0x4C, 0x34, 0x12, 0x00]);
}

#[test]
fn test_index_pass_measures_past_failing_lines() {
    let source = "LDA #$01\nFOO\nLDA#$02\nend: BRK";
    let mut assembler = Assembler::default();
    let emitted = assembler.run_pass(Pass::Index, source, |_, _| {}).unwrap();

    assert_eq!(emitted, 3);
    assert_eq!(assembler.symbols().address_of("end"), Some(0x0602));
}

#[test]
fn test_redefinition_wins_over_earlier_syntax_error() {
    let err = assemble("dup: NOP\nFOO\ndup: NOP").unwrap_err();
    assert_eq!(err.line_number(), Some(3));
    assert_eq!(err.kind(), Some(ErrorKind::LabelRedefinition));
}

#[test]
fn test_first_failing_line_reported_by_commit_pass() {
    let err = assemble("NOP\nFOO\nLDA#$02").unwrap_err();
    assert_eq!(err.line_number(), Some(2));
    assert_eq!(err.kind(), Some(ErrorKind::Syntax));
}

#[test]
fn test_custom_origin() {
    let mut memory = AddressSpace::new();
    let mut assembler = Assembler::new(AssemblerConfig { origin: 0xC000 });
    assembler.assemble("here: JMP here", &mut memory).unwrap();

    assert_eq!(memory.read(0xC000), 0x4C);
    assert_eq!(memory.read_word(0xC001), 0xC000);
}

#[test]
fn test_empty_source_has_no_code() {
    assert_eq!(assemble("; nothing\n\n").unwrap_err(), AssemblyError::NoCode);
    assert_eq!(assemble("label:").unwrap_err(), AssemblyError::NoCode);
}
