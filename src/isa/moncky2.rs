use crate::decoder::{AluOp, Cond, Decoder, Instruction, Op, Operand};
use crate::encoder::{TAG_ALU, TAG_JCC, TAG_JP, TAG_LD, TAG_LI, TAG_ST};

/// Moncky-2 word decoder, the inverse of [`crate::encoder::encode`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Moncky2Decoder;

impl Moncky2Decoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for Moncky2Decoder {
    fn decode(&self, word: u16) -> Option<Instruction> {
        let lo = (word & 0xF) as u8;
        let mid = ((word >> 4) & 0xF) as u8;

        if word == 0 {
            return Some(Instruction::new(Op::Halt, Vec::new()));
        }
        if word >> 12 == TAG_LI {
            let imm = ((word >> 4) & 0xFF) as u8;
            return Some(Instruction::new(
                Op::Li,
                vec![Operand::Reg(lo), Operand::Imm(imm)],
            ));
        }
        if word >> 4 == TAG_JP {
            return Some(Instruction::new(Op::Jp, vec![Operand::Reg(lo)]));
        }
        if word >> 7 == TAG_JCC {
            let cond = Cond::from_code((word >> 4) & 0x7)?;
            return Some(Instruction::new(Op::Jcc(cond), vec![Operand::Reg(lo)]));
        }
        match word >> 8 {
            TAG_LD => Some(Instruction::new(
                Op::Ld,
                vec![Operand::Reg(mid), Operand::Mem(lo)],
            )),
            TAG_ST => Some(Instruction::new(
                Op::St,
                vec![Operand::Reg(mid), Operand::Mem(lo)],
            )),
            tag if tag >= TAG_ALU => {
                let alu = AluOp::from_index(tag - TAG_ALU)?;
                Some(Instruction::new(
                    Op::Alu(alu),
                    vec![Operand::Reg(mid), Operand::Reg(lo)],
                ))
            }
            _ => None,
        }
    }
}
