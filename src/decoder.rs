use serde::{Deserialize, Serialize};

/// Flag condition selected by a conditional jump; discriminant is the 3-bit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cond {
    Carry = 0,
    NoCarry = 1,
    Zero = 2,
    NotZero = 3,
    Sign = 4,
    NotSign = 5,
    Overflow = 6,
    NoOverflow = 7,
}

impl Cond {
    pub const ALL: [Cond; 8] = [
        Cond::Carry,
        Cond::NoCarry,
        Cond::Zero,
        Cond::NotZero,
        Cond::Sign,
        Cond::NotSign,
        Cond::Overflow,
        Cond::NoOverflow,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Mnemonic suffix after `jp`.
    pub fn suffix(self) -> &'static str {
        match self {
            Cond::Carry => "c",
            Cond::NoCarry => "nc",
            Cond::Zero => "z",
            Cond::NotZero => "nz",
            Cond::Sign => "s",
            Cond::NotSign => "ns",
            Cond::Overflow => "o",
            Cond::NoOverflow => "no",
        }
    }
}

/// ALU operations; discriminant is the offset from tag `0100_0000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AluOp {
    Nop = 0,
    Or = 1,
    And = 2,
    Xor = 3,
    Add = 4,
    Sub = 5,
    Shl = 6,
    Shr = 7,
    Ashr = 8,
    Not = 9,
    Neg = 10,
}

impl AluOp {
    pub const ALL: [AluOp; 11] = [
        AluOp::Nop,
        AluOp::Or,
        AluOp::And,
        AluOp::Xor,
        AluOp::Add,
        AluOp::Sub,
        AluOp::Shl,
        AluOp::Shr,
        AluOp::Ashr,
        AluOp::Not,
        AluOp::Neg,
    ];

    pub fn index(self) -> u16 {
        self as u16
    }

    pub fn from_index(idx: u16) -> Option<Self> {
        Self::ALL.get(idx as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Halt,
    Li,
    Ld,
    St,
    Jp,
    Jcc(Cond),
    Alu(AluOp),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// `rN`
    Reg(u8),
    /// `(rN)`
    Mem(u8),
    /// 8-bit literal of `li`
    Imm(u8),
    /// `:name`, replaced by `Imm` once resolved
    Label(String),
}

/// A decoded instruction. `line` is the 1-based source line and is ignored by `==`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    pub op: Op,
    pub operands: Vec<Operand>,
    pub line: usize,
}

impl Instruction {
    pub fn new(op: Op, operands: Vec<Operand>) -> Self {
        Self {
            op,
            operands,
            line: 0,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn is_resolved(&self) -> bool {
        !self
            .operands
            .iter()
            .any(|o| matches!(o, Operand::Label(_)))
    }
}

impl PartialEq for Instruction {
    fn eq(&self, other: &Self) -> bool {
        self.op == other.op && self.operands == other.operands
    }
}

impl Eq for Instruction {}

pub trait Decoder {
    fn decode(&self, word: u16) -> Option<Instruction>;
}
