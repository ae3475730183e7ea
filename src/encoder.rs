use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decoder::{Instruction, Op, Operand};
use crate::error::AsmError;

pub const WORD_BITS: u32 = 16;

pub const TAG_LI: u16 = 0b0001;
pub const TAG_LD: u16 = 0b1000_0000;
pub const TAG_ST: u16 = 0b1010_0000;
pub const TAG_JP: u16 = 0b1100_0000_0000;
pub const TAG_JCC: u16 = 0b1_1110_0000;
pub const TAG_ALU: u16 = 0b0100_0000;

/// One assembled 16-bit instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EncodedWord(pub u16);

impl EncodedWord {
    pub fn value(self) -> u16 {
        self.0
    }

    /// 16-character MSB-first bit string.
    pub fn to_bits(self) -> String {
        format!("{:016b}", self.0)
    }
}

impl fmt::Display for EncodedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

impl From<EncodedWord> for u16 {
    fn from(w: EncodedWord) -> u16 {
        w.0
    }
}

/// Concatenate `(value, width)` fields MSB first. Widths must total 16 bits.
fn pack(fields: &[(u16, u32)]) -> Result<EncodedWord, AsmError> {
    let width: u32 = fields.iter().map(|&(_, w)| w).sum();
    if width != WORD_BITS {
        return Err(AsmError::Encoding { width });
    }
    let mut word: u32 = 0;
    for &(value, w) in fields {
        let value = value as u32;
        if value >> w != 0 {
            return Err(AsmError::Range {
                what: "field",
                value: value as i64,
                max: ((1u32 << w) - 1) as u16,
            });
        }
        word = (word << w) | value;
    }
    Ok(EncodedWord(word as u16))
}

fn reg(operand: Option<&Operand>) -> Result<u16, AsmError> {
    match operand {
        Some(Operand::Reg(r)) | Some(Operand::Mem(r)) => Ok(*r as u16),
        Some(Operand::Imm(v)) => Err(AsmError::parse("register", &v.to_string())),
        Some(Operand::Label(l)) => Err(AsmError::parse("register", l)),
        None => Err(AsmError::parse("register", "")),
    }
}

fn imm(operand: Option<&Operand>) -> Result<u16, AsmError> {
    match operand {
        Some(Operand::Imm(v)) => Ok(*v as u16),
        Some(Operand::Label(l)) => Err(AsmError::LabelNotFound(l.clone())),
        Some(Operand::Reg(r)) | Some(Operand::Mem(r)) => {
            Err(AsmError::parse("immediate", &format!("r{r}")))
        }
        None => Err(AsmError::parse("immediate", "")),
    }
}

/// Encode a resolved instruction into its 16-bit word.
pub fn encode(instr: &Instruction) -> Result<EncodedWord, AsmError> {
    let ops = &instr.operands;
    match instr.op {
        Op::Halt => pack(&[(0, 16)]),
        Op::Li => pack(&[(TAG_LI, 4), (imm(ops.get(1))?, 8), (reg(ops.first())?, 4)]),
        Op::Ld => pack(&[(TAG_LD, 8), (reg(ops.first())?, 4), (reg(ops.get(1))?, 4)]),
        Op::St => pack(&[(TAG_ST, 8), (reg(ops.first())?, 4), (reg(ops.get(1))?, 4)]),
        Op::Jp => pack(&[(TAG_JP, 12), (reg(ops.first())?, 4)]),
        Op::Jcc(cond) => pack(&[(TAG_JCC, 9), (cond.code(), 3), (reg(ops.first())?, 4)]),
        Op::Alu(alu) => pack(&[
            (TAG_ALU + alu.index(), 8),
            (reg(ops.first())?, 4),
            (reg(ops.get(1))?, 4),
        ]),
    }
}
