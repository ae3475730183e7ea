use moncky_rs::encoder::{TAG_ALU, TAG_JCC};
use moncky_rs::instructions::TABLE;
use moncky_rs::parser::parse_line;
use moncky_rs::{encode, AluOp, AsmError, Cond, Instruction, Op, Operand, Program};
use pretty_assertions::assert_eq;

fn word(src: &str) -> u16 {
    encode(&parse_line(src, 1).unwrap()).unwrap().value()
}

#[test]
fn reference_words() {
    let cases = [
        ("halt", 0x0000),
        ("li r1, 5", 0x1051),
        ("li r15, 255", 0x1FFF),
        ("ld r1, (r2)", 0x8012),
        ("st r3, (r4)", 0xA034),
        ("jp r3", 0xC003),
        ("jpc r0", 0xF000),
        ("jpz r3", 0xF023),
        ("jpno r15", 0xF07F),
        ("nop r0, r0", 0x4000),
        ("and r1, r2", 0x4212),
        ("add r1, r2", 0x4412),
        ("neg r14, r9", 0x4AE9),
    ];
    for (src, expected) in cases {
        assert_eq!(word(src), expected, "{src}");
    }
}

#[test]
fn mnemonics_ignore_case() {
    assert_eq!(word("LI R1, 5"), 0x1051);
    assert_eq!(word("JpNz r2"), 0xF032);
}

#[test]
fn alu_and_jump_tags_are_distinct() {
    let mut seen = std::collections::HashSet::new();
    for alu in AluOp::ALL {
        let w = encode(&Instruction::new(
            Op::Alu(alu),
            vec![Operand::Reg(0), Operand::Reg(0)],
        ))
        .unwrap()
        .value();
        assert_eq!(w >> 8, TAG_ALU + alu.index());
        assert!(seen.insert(w >> 8));
    }
    for cond in Cond::ALL {
        let w = word(&format!("jp{} r0", cond.suffix()));
        assert_eq!(w >> 7, TAG_JCC);
        assert_eq!((w >> 4) & 0x7, cond.code());
    }
}

#[test]
fn every_table_mnemonic_parses() {
    for desc in TABLE {
        let src = match desc.form.arity() {
            0 => desc.mnemonic.to_string(),
            1 => format!("{} r1", desc.mnemonic),
            _ if desc.op == Op::Li => format!("{} r1, 9", desc.mnemonic),
            _ if matches!(desc.op, Op::Ld | Op::St) => format!("{} r1, (r2)", desc.mnemonic),
            _ => format!("{} r1, r2", desc.mnemonic),
        };
        let instr = parse_line(&src, 1).unwrap();
        assert_eq!(instr.op, desc.op, "{src}");
        assert!(encode(&instr).is_ok(), "{src}");
    }
}

#[test]
fn unknown_conditional_jump() {
    assert_eq!(
        parse_line("jpx r1", 1),
        Err(AsmError::UnknownInstruction("jpx".to_string()))
    );
}

#[test]
fn unresolved_label_does_not_encode() {
    let instr = parse_line("li r1, :nowhere", 1).unwrap();
    assert!(!instr.is_resolved());
    assert_eq!(
        encode(&instr),
        Err(AsmError::LabelNotFound(":nowhere".to_string()))
    );
    let program = Program::new("li r1, :nowhere\nhalt");
    assert_eq!(
        program.resolve(instr),
        Err(AsmError::LabelNotFound(":nowhere".to_string()))
    );
}
