use crate::decoder::{AluOp, Cond, Op};

/// Operand shape of an instruction as written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// `halt`
    None,
    /// `li rA, imm`
    RegImm,
    /// `ld rA, (rB)`
    RegMem,
    /// `jp rA`
    Reg,
    /// `add rA, rB`
    RegReg,
}

impl Form {
    pub fn arity(self) -> usize {
        match self {
            Form::None => 0,
            Form::Reg => 1,
            Form::RegImm | Form::RegMem | Form::RegReg => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InstrDesc {
    pub op: Op,
    pub mnemonic: &'static str,
    pub form: Form,
}

const fn desc(op: Op, mnemonic: &'static str, form: Form) -> InstrDesc {
    InstrDesc { op, mnemonic, form }
}

pub const TABLE: &[InstrDesc] = &[
    desc(Op::Halt, "halt", Form::None),
    desc(Op::Li, "li", Form::RegImm),
    desc(Op::Ld, "ld", Form::RegMem),
    desc(Op::St, "st", Form::RegMem),
    desc(Op::Jp, "jp", Form::Reg),
    desc(Op::Jcc(Cond::Carry), "jpc", Form::Reg),
    desc(Op::Jcc(Cond::NoCarry), "jpnc", Form::Reg),
    desc(Op::Jcc(Cond::Zero), "jpz", Form::Reg),
    desc(Op::Jcc(Cond::NotZero), "jpnz", Form::Reg),
    desc(Op::Jcc(Cond::Sign), "jps", Form::Reg),
    desc(Op::Jcc(Cond::NotSign), "jpns", Form::Reg),
    desc(Op::Jcc(Cond::Overflow), "jpo", Form::Reg),
    desc(Op::Jcc(Cond::NoOverflow), "jpno", Form::Reg),
    desc(Op::Alu(AluOp::Nop), "nop", Form::RegReg),
    desc(Op::Alu(AluOp::Or), "or", Form::RegReg),
    desc(Op::Alu(AluOp::And), "and", Form::RegReg),
    desc(Op::Alu(AluOp::Xor), "xor", Form::RegReg),
    desc(Op::Alu(AluOp::Add), "add", Form::RegReg),
    desc(Op::Alu(AluOp::Sub), "sub", Form::RegReg),
    desc(Op::Alu(AluOp::Shl), "shl", Form::RegReg),
    desc(Op::Alu(AluOp::Shr), "shr", Form::RegReg),
    desc(Op::Alu(AluOp::Ashr), "ashr", Form::RegReg),
    desc(Op::Alu(AluOp::Not), "not", Form::RegReg),
    desc(Op::Alu(AluOp::Neg), "neg", Form::RegReg),
];

/// Case-insensitive mnemonic lookup.
pub fn lookup(mnemonic: &str) -> Option<&'static InstrDesc> {
    TABLE
        .iter()
        .find(|d| d.mnemonic.eq_ignore_ascii_case(mnemonic))
}

/// Table row for `op`. Rows are ordered so the index follows from the opcode.
pub fn describe(op: Op) -> &'static InstrDesc {
    let idx = match op {
        Op::Halt => 0,
        Op::Li => 1,
        Op::Ld => 2,
        Op::St => 3,
        Op::Jp => 4,
        Op::Jcc(c) => 5 + c.code() as usize,
        Op::Alu(a) => 13 + a.index() as usize,
    };
    &TABLE[idx]
}
