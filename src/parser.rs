use std::num::IntErrorKind;

use crate::decoder::{Instruction, Operand};
use crate::error::AsmError;
use crate::instructions::{self, Form};

pub const REGISTER_COUNT: u8 = 16;
pub const IMM_MAX: u16 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Label,
    Instruction,
}

pub fn classify_line(line: &str) -> LineKind {
    let t = line.trim();
    if t.is_empty() {
        LineKind::Blank
    } else if t.starts_with(';') {
        LineKind::Comment
    } else if t.starts_with(':') {
        LineKind::Label
    } else {
        LineKind::Instruction
    }
}

/// Split a line into `[mnemonic, operand, ...]`.
///
/// Whitespace and commas separate tokens; a token starting with `;` ends the line.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .take_while(|t| !t.starts_with(';'))
        .collect()
}

/// True for `(rN)` style tokens.
pub fn is_memory_ref(token: &str) -> bool {
    let t = token.trim_end_matches(',');
    t.starts_with('(') && t.ends_with(')')
}

pub fn is_label_ref(token: &str) -> bool {
    token.starts_with(':')
}

/// Parse `rN`, `rN,` or `(rN)` into a register index.
pub fn parse_register(token: &str) -> Result<u8, AsmError> {
    let t = token.trim_end_matches(',');
    let t = t
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(t);
    let digits = t
        .strip_prefix('r')
        .or_else(|| t.strip_prefix('R'))
        .ok_or_else(|| AsmError::parse("register", token))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AsmError::parse("register", token));
    }
    let value = digits.parse::<u64>().map_or(i64::MAX, |v| v.min(i64::MAX as u64) as i64);
    if value < REGISTER_COUNT as i64 {
        Ok(value as u8)
    } else {
        Err(AsmError::Range {
            what: "register",
            value,
            max: (REGISTER_COUNT - 1) as u16,
        })
    }
}

/// Parse a decimal, `0x`, `0b` or `0o` literal that must fit the 8-bit `li` field.
pub fn parse_number(token: &str) -> Result<u8, AsmError> {
    let t = token.trim();
    let (digits, radix) = if let Some(h) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        (h, 16)
    } else if let Some(b) = t.strip_prefix("0b").or_else(|| t.strip_prefix("0B")) {
        (b, 2)
    } else if let Some(o) = t.strip_prefix("0o").or_else(|| t.strip_prefix("0O")) {
        (o, 8)
    } else {
        (t, 10)
    };
    let value = match i64::from_str_radix(digits, radix) {
        Ok(v) => v,
        Err(e) => {
            return Err(match e.kind() {
                IntErrorKind::PosOverflow => range_imm(i64::MAX),
                IntErrorKind::NegOverflow => range_imm(i64::MIN),
                _ => AsmError::parse("number", token),
            })
        }
    };
    if (0..=IMM_MAX as i64).contains(&value) {
        Ok(value as u8)
    } else {
        Err(range_imm(value))
    }
}

fn range_imm(value: i64) -> AsmError {
    AsmError::Range {
        what: "immediate",
        value,
        max: IMM_MAX,
    }
}

/// `li` source operand: numeric literal or deferred label reference.
pub fn parse_immediate(token: &str) -> Result<Operand, AsmError> {
    if is_label_ref(token) {
        if token.len() == 1 {
            return Err(AsmError::parse("label", token));
        }
        return Ok(Operand::Label(token.to_string()));
    }
    parse_number(token).map(Operand::Imm)
}

/// Decode one source line. Labels stay unresolved; see [`crate::Program::resolve`].
pub fn parse_line(line: &str, number: usize) -> Result<Instruction, AsmError> {
    let tokens = tokenize(line);
    let (mnemonic, args) = tokens.split_first().ok_or(AsmError::EmptyLine)?;
    let desc = instructions::lookup(mnemonic)
        .ok_or_else(|| AsmError::UnknownInstruction(mnemonic.to_string()))?;
    if args.len() != desc.form.arity() {
        return Err(AsmError::Arity {
            mnemonic: desc.mnemonic.to_string(),
            expected: desc.form.arity(),
            found: args.len(),
        });
    }
    let operands = match desc.form {
        Form::None => Vec::new(),
        Form::RegImm => vec![
            Operand::Reg(parse_register(args[0])?),
            parse_immediate(args[1])?,
        ],
        Form::RegMem => vec![
            Operand::Reg(parse_register(args[0])?),
            Operand::Mem(parse_register(args[1])?),
        ],
        Form::Reg => vec![Operand::Reg(parse_register(args[0])?)],
        Form::RegReg => vec![
            Operand::Reg(parse_register(args[0])?),
            Operand::Reg(parse_register(args[1])?),
        ],
    };
    Ok(Instruction {
        op: desc.op,
        operands,
        line: number,
    })
}
