use std::fmt;

use crate::decoder::{Decoder, Instruction, Operand};
use crate::encoder::EncodedWord;
use crate::instructions::describe;

fn operand(o: &Operand) -> String {
    match o {
        Operand::Reg(r) => format!("r{r}"),
        Operand::Mem(r) => format!("(r{r})"),
        Operand::Imm(v) => v.to_string(),
        Operand::Label(l) => l.clone(),
    }
}

/// Canonical source text, e.g. `ld r1, (r2)`.
pub fn fmt_instruction(instr: &Instruction) -> String {
    let mn = describe(instr.op).mnemonic;
    if instr.operands.is_empty() {
        return mn.to_string();
    }
    let ops: Vec<String> = instr.operands.iter().map(operand).collect();
    format!("{} {}", mn, ops.join(", "))
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_instruction(self))
    }
}

/// One listing row per word: address, hex word, bit string, disassembly.
pub fn listing<D: Decoder>(dec: &D, words: &[EncodedWord]) -> Vec<String> {
    words
        .iter()
        .enumerate()
        .map(|(addr, w)| {
            let text = dec
                .decode(w.value())
                .map(|i| fmt_instruction(&i))
                .unwrap_or_else(|| ".word".to_string());
            format!("{addr:04x}:  {w}  {}  {text}", w.to_bits())
        })
        .collect()
}
