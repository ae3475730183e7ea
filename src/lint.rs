use std::fmt;

use serde::Serialize;

use crate::cpu::PC;
use crate::decoder::Op;
use crate::error::AsmError;
use crate::instructions::{self, Form};
use crate::parser::{self, LineKind};
use crate::program::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagKind {
    Syntax,
    Value,
    Argument,
    UnknownInstruction,
    MissingLabel,
    DuplicateLabel,
    Warning,
}

impl DiagKind {
    /// Errors are exactly the lines the engine would refuse to run.
    pub fn is_error(self) -> bool {
        !matches!(self, DiagKind::DuplicateLabel | DiagKind::Warning)
    }
}

impl fmt::Display for DiagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagKind::Syntax => "SYNTAX",
            DiagKind::Value => "VALUE",
            DiagKind::Argument => "ARGUMENT",
            DiagKind::UnknownInstruction => "UNKNOWN INSTRUCTION",
            DiagKind::MissingLabel => "MISSING LABEL",
            DiagKind::DuplicateLabel => "DUPLICATE LABEL",
            DiagKind::Warning => "WARNING",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub kind: DiagKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.line, self.kind, self.message)
    }
}

#[derive(Clone, Copy)]
enum Slot {
    Register,
    Memory,
    Immediate,
}

impl Slot {
    fn describe(self) -> &'static str {
        match self {
            Slot::Register => "register",
            Slot::Memory => "memory reference",
            Slot::Immediate => "immediate value",
        }
    }
}

fn slots(form: Form) -> &'static [Slot] {
    match form {
        Form::None => &[],
        Form::RegImm => &[Slot::Register, Slot::Immediate],
        Form::RegMem => &[Slot::Register, Slot::Memory],
        Form::Reg => &[Slot::Register],
        Form::RegReg => &[Slot::Register, Slot::Register],
    }
}

fn ordinal(i: usize) -> &'static str {
    match i {
        0 => "first",
        1 => "second",
        _ => "third",
    }
}

/// Best-effort pass over every line of `program`; never stops at the first problem.
pub fn lint(program: &Program) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for line in program.lines() {
        if parser::classify_line(&line.text) == LineKind::Instruction {
            LineCheck {
                program,
                line: line.number,
                out: &mut out,
            }
            .run(&line.text);
        }
    }
    out
}

struct LineCheck<'a> {
    program: &'a Program,
    line: usize,
    out: &'a mut Vec<Diagnostic>,
}

impl LineCheck<'_> {
    fn emit(&mut self, kind: DiagKind, message: String) {
        self.out.push(Diagnostic {
            line: self.line,
            kind,
            message,
        });
    }

    fn run(&mut self, text: &str) {
        let tokens = parser::tokenize(text);
        let Some((mnemonic, args)) = tokens.split_first() else {
            self.emit(DiagKind::Syntax, format!("no instruction in {text:?}"));
            return;
        };
        let Some(desc) = instructions::lookup(mnemonic) else {
            let msg = if mnemonic.to_ascii_lowercase().starts_with("jp") {
                format!("conditional jump \"{mnemonic}\" does not exist")
            } else {
                format!("unknown command \"{mnemonic}\"")
            };
            self.emit(DiagKind::UnknownInstruction, msg);
            return;
        };
        let mn = desc.mnemonic;
        let expected = slots(desc.form);

        for (i, slot) in expected.iter().enumerate().skip(args.len()) {
            self.emit(
                DiagKind::Argument,
                format!("missing {} argument in {mn} instruction ({})", ordinal(i), slot.describe()),
            );
        }
        for extra in args.iter().skip(expected.len()) {
            self.emit(
                DiagKind::Argument,
                format!("unknown argument \"{extra}\" after {mn} instruction"),
            );
        }

        // comma separation is a style matter; the tokenizer accepts either
        if expected.len() == 2 && args.len() >= 2 {
            let first = args[0];
            let comma = text
                .trim_start()
                .get(mnemonic.len()..)
                .and_then(|rest| rest.trim_start().strip_prefix(first))
                .map_or(true, |rest| rest.trim_start().starts_with(','));
            if !comma {
                self.emit(
                    DiagKind::Warning,
                    format!("missing comma after \"{first}\" in {mn} instruction"),
                );
            }
        }

        for (i, (slot, token)) in expected.iter().zip(args.iter()).enumerate() {
            match slot {
                Slot::Register | Slot::Memory => {
                    let reg = self.check_register(mn, i, *slot, token);
                    if i == 0 && reg == Some(PC as u8) {
                        self.warn_pc(desc.op);
                    }
                }
                Slot::Immediate => self.check_immediate(mn, token),
            }
        }
    }

    fn check_register(&mut self, mn: &str, i: usize, slot: Slot, token: &str) -> Option<u8> {
        match (slot, parser::is_memory_ref(token)) {
            (Slot::Memory, false) => self.emit(
                DiagKind::Warning,
                format!("{} argument \"{token}\" in {mn} instruction should be written \"(rN)\"", ordinal(i)),
            ),
            (Slot::Register, true) => self.emit(
                DiagKind::Warning,
                format!("{} argument \"{token}\" in {mn} instruction should be written \"rN\"", ordinal(i)),
            ),
            _ => {}
        }
        match parser::parse_register(token) {
            Ok(r) => Some(r),
            Err(AsmError::Range { value, .. }) => {
                self.emit(
                    DiagKind::Value,
                    format!(
                        "register number \"{token}\" in {mn} instruction is too high (0-15), no register with number {value}"
                    ),
                );
                None
            }
            Err(_) => {
                self.emit(
                    DiagKind::Syntax,
                    format!("{} argument \"{token}\" in {mn} instruction is not a register \"rN\"", ordinal(i)),
                );
                None
            }
        }
    }

    fn check_immediate(&mut self, mn: &str, token: &str) {
        if parser::is_label_ref(token) {
            if parser::parse_immediate(token).is_err() {
                self.emit(DiagKind::Syntax, format!("empty label reference in {mn} instruction"));
            } else {
                self.check_label(token);
            }
            return;
        }
        match parser::parse_number(token) {
            Ok(_) => {}
            Err(AsmError::Range { .. }) => self.emit(
                DiagKind::Value,
                format!("value \"{token}\" in {mn} instruction does not fit in 8 bits (0-255)"),
            ),
            Err(_) => self.emit(
                DiagKind::Value,
                format!("value \"{token}\" in {mn} instruction is not a valid number"),
            ),
        }
    }

    fn check_label(&mut self, label: &str) {
        let program = self.program;
        let labels = program.labels();
        match labels.get(label) {
            None => {
                self.emit(DiagKind::MissingLabel, format!("label {label} not found in code"));
                return;
            }
            Some(addr) if addr > parser::IMM_MAX => self.emit(
                DiagKind::Value,
                format!("label {label} resolves to {addr}, which does not fit in 8 bits"),
            ),
            Some(_) => {}
        }
        let first = labels.declared_at(label).unwrap_or(0);
        let dups: Vec<usize> = labels
            .duplicates()
            .iter()
            .filter(|d| d.name == label)
            .map(|d| d.line)
            .collect();
        for line in dups {
            self.emit(
                DiagKind::DuplicateLabel,
                format!("duplicate label \"{label}\" at line {line}, the declaration at line {first} is used"),
            );
        }
    }

    fn warn_pc(&mut self, op: Op) {
        let msg = match op {
            Op::Jp | Op::Jcc(_) => {
                "jumping through r15 repeats the current instruction forever".to_string()
            }
            Op::Li | Op::Ld | Op::Alu(_) => {
                "writing r15 changes the next instruction fetched, use jp to jump".to_string()
            }
            Op::Halt | Op::St => return,
        };
        self.emit(DiagKind::Warning, msg);
    }
}
