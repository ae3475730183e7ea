use std::collections::HashMap;

use tracing::warn;

use crate::decoder::{Instruction, Operand};
use crate::error::AsmError;
use crate::parser::{self, LineKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// 1-based line number in the source text
    pub number: usize,
    pub text: String,
}

/// A label declared more than once. Resolution keeps the first declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateLabel {
    pub name: String,
    pub first_line: usize,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LabelDef {
    addr: u16,
    line: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    defs: HashMap<String, LabelDef>,
    duplicates: Vec<DuplicateLabel>,
}

impl LabelTable {
    /// Bind every `:label` line to the number of executable lines before it.
    pub fn scan<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let mut table = LabelTable::default();
        let mut count: u16 = 0;
        for (number, raw) in lines {
            match parser::classify_line(raw) {
                LineKind::Instruction => count = count.wrapping_add(1),
                LineKind::Label => {
                    let name = raw.trim();
                    if let Some(first) = table.defs.get(name) {
                        table.duplicates.push(DuplicateLabel {
                            name: name.to_string(),
                            first_line: first.line,
                            line: number,
                        });
                    } else {
                        table.defs.insert(
                            name.to_string(),
                            LabelDef {
                                addr: count,
                                line: number,
                            },
                        );
                    }
                }
                LineKind::Blank | LineKind::Comment => {}
            }
        }
        table
    }

    pub fn get(&self, label: &str) -> Option<u16> {
        self.defs.get(label).map(|d| d.addr)
    }

    pub fn resolve(&self, label: &str) -> Result<u16, AsmError> {
        self.get(label)
            .ok_or_else(|| AsmError::LabelNotFound(label.to_string()))
    }

    /// Source line of the winning declaration.
    pub fn declared_at(&self, label: &str) -> Option<usize> {
        self.defs.get(label).map(|d| d.line)
    }

    pub fn duplicates(&self) -> &[DuplicateLabel] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Source text split once into its raw lines, its executable lines and its labels.
#[derive(Debug, Clone)]
pub struct Program {
    lines: Vec<SourceLine>,
    executable: Vec<SourceLine>,
    labels: LabelTable,
}

impl Program {
    pub fn new(source: &str) -> Self {
        let lines: Vec<SourceLine> = source
            .lines()
            .enumerate()
            .map(|(i, text)| SourceLine {
                number: i + 1,
                text: text.trim().to_string(),
            })
            .collect();
        let executable = lines
            .iter()
            .filter(|l| parser::classify_line(&l.text) == LineKind::Instruction)
            .cloned()
            .collect();
        let labels = LabelTable::scan(lines.iter().map(|l| (l.number, l.text.as_str())));
        for dup in labels.duplicates() {
            warn!(
                label = %dup.name,
                line = dup.line,
                first_line = dup.first_line,
                "duplicate label, keeping first declaration"
            );
        }
        Self {
            lines,
            executable,
            labels,
        }
    }

    pub fn lines(&self) -> &[SourceLine] {
        &self.lines
    }

    pub fn executable(&self) -> &[SourceLine] {
        &self.executable
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Executable line at instruction address `pc`.
    pub fn fetch(&self, pc: u16) -> Option<&SourceLine> {
        self.executable.get(pc as usize)
    }

    pub fn len(&self) -> usize {
        self.executable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executable.is_empty()
    }

    /// Replace label operands with their 8-bit addresses.
    pub fn resolve(&self, mut instr: Instruction) -> Result<Instruction, AsmError> {
        for operand in instr.operands.iter_mut() {
            if let Operand::Label(name) = operand {
                let addr = self.labels.resolve(name)?;
                let imm = u8::try_from(addr).map_err(|_| AsmError::Range {
                    what: "label address",
                    value: addr as i64,
                    max: crate::parser::IMM_MAX,
                })?;
                *operand = Operand::Imm(imm);
            }
        }
        Ok(instr)
    }
}
