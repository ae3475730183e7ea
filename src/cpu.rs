use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::decoder::Instruction;
use crate::encoder::{encode, EncodedWord};
use crate::error::AsmError;
use crate::exec::{Executor, Flow};
use crate::memory::Bus;
use crate::parser;
use crate::program::{Program, SourceLine};

/// Register 15 doubles as the program counter.
pub const PC: usize = 15;

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flags: u8 {
const C = 1 << 0; // Carry, never set by any operation
const Z = 1 << 1; // Zero
const S = 1 << 2; // Sign
const V = 1 << 3; // Overflow
}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Halted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    pub regs: [u16; 16],
    pub flags: Flags,
    pub state: RunState,
}

#[derive(thiserror::Error, Debug)]
pub enum Trap {
    #[error("line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: AsmError,
    },
    #[error("program counter {pc} runs past the end of the program ({len} instructions)")]
    PcOutOfRange { pc: u16, len: usize },
    #[error("line {line}: bus error at {addr:#06x}: {source}")]
    Bus {
        line: usize,
        addr: u16,
        #[source]
        source: anyhow::Error,
    },
    #[error("step limit of {limit} reached without halting")]
    StepLimit { limit: u64 },
}

impl Trap {
    /// Source line of the offending instruction, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Trap::Decode { line, .. } | Trap::Bus { line, .. } => Some(*line),
            Trap::PcOutOfRange { .. } | Trap::StepLimit { .. } => None,
        }
    }
}

/// Parse, resolve and encode one executable line of `program`.
pub fn decode_line(program: &Program, line: &SourceLine) -> Result<(Instruction, EncodedWord), Trap> {
    let decode = |source| Trap::Decode {
        line: line.number,
        source,
    };
    let instr = parser::parse_line(&line.text, line.number)
        .and_then(|i| program.resolve(i))
        .map_err(decode)?;
    let word = encode(&instr).map_err(decode)?;
    Ok((instr, word))
}

/// What one executed instruction produced.
#[derive(Debug, Clone)]
pub struct Step {
    pub pc: u16,
    pub instr: Instruction,
    pub word: EncodedWord,
    pub flow: Flow,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            regs: [0; 16],
            flags: Flags::empty(),
            state: RunState::Running,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn pc(&self) -> u16 {
        self.regs[PC]
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.regs[PC] = pc;
    }

    pub fn halted(&self) -> bool {
        self.state == RunState::Halted
    }

    /// Fetch the line at PC, decode and encode it, then execute it.
    ///
    /// Decoding fails before any register, flag or memory write.
    pub fn step<B: Bus, X: Executor>(
        &mut self,
        bus: &mut B,
        program: &Program,
        exec: &X,
    ) -> Result<Step, Trap> {
        let pc = self.pc();
        let line = program.fetch(pc).ok_or(Trap::PcOutOfRange {
            pc,
            len: program.len(),
        })?;
        let (instr, word) = decode_line(program, line)?;
        let flow = exec.exec(self, bus, &instr)?;
        match flow {
            Flow::Next => self.set_pc(self.pc().wrapping_add(1)),
            Flow::Jump => {}
            Flow::Halt => self.state = RunState::Halted,
        }
        Ok(Step {
            pc,
            instr,
            word,
            flow,
        })
    }
}
