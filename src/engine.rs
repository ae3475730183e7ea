use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cpu::{decode_line, Cpu, Trap};
use crate::decoder::Op;
use crate::encoder::EncodedWord;
use crate::exec::{Executor, IntExecutor};
use crate::memory::{Bus, LinearMemory};
use crate::program::Program;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Abort with [`Trap::StepLimit`] after this many instructions.
    pub max_steps: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Encoded word of every executed instruction, in execution order.
    /// This is a trace; loop bodies repeat and unreached lines are absent.
    pub words: Vec<EncodedWord>,
    pub steps: u64,
}

/// Owns the CPU and its memory and runs programs to completion.
pub struct Engine<B: Bus = LinearMemory, X: Executor = IntExecutor> {
    cpu: Cpu,
    bus: B,
    exec: X,
    cfg: EngineConfig,
}

impl Engine {
    pub fn new(cfg: EngineConfig) -> Self {
        Self::with_parts(LinearMemory::default(), IntExecutor, cfg)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<B: Bus, X: Executor> Engine<B, X> {
    pub fn with_parts(bus: B, exec: X, cfg: EngineConfig) -> Self {
        Self {
            cpu: Cpu::new(),
            bus,
            exec,
            cfg,
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Reset registers, flags and memory, then execute from address 0 until `halt`.
    pub fn run(&mut self, program: &Program) -> Result<RunReport, Trap> {
        self.cpu.reset();
        self.bus.clear();
        let mut report = RunReport::default();

        while !self.cpu.halted() {
            if let Some(limit) = self.cfg.max_steps {
                if report.steps >= limit {
                    return Err(Trap::StepLimit { limit });
                }
            }
            let step = self.cpu.step(&mut self.bus, program, &self.exec)?;
            trace!(
                pc = step.pc,
                line = step.instr.line,
                word = %step.word,
                instr = %step.instr,
                "step"
            );
            report.words.push(step.word);
            report.steps += 1;
        }

        debug!(steps = report.steps, "halted");
        Ok(report)
    }
}

/// Assemble `source` into its memory image. See [`assemble_program`].
pub fn assemble(source: &str) -> Result<Vec<EncodedWord>, Trap> {
    assemble_program(&Program::new(source))
}

/// One word per executable line in program order, through the first `halt`.
///
/// Label addresses are positions in this image, so jumps land on the right word.
pub fn assemble_program(program: &Program) -> Result<Vec<EncodedWord>, Trap> {
    let mut words = Vec::with_capacity(program.len());
    for line in program.executable() {
        let (instr, word) = decode_line(program, line)?;
        words.push(word);
        if instr.op == Op::Halt {
            break;
        }
    }
    debug!(words = words.len(), "assembled");
    Ok(words)
}
