pub mod cpu;
pub mod decoder;
pub mod disasm;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod exec;
pub mod hexrec;
pub mod instructions;
pub mod lint;
pub mod memory;
pub mod parser;
pub mod program;

pub mod isa {
    pub mod moncky2; // Moncky-2 16-bit word layouts
}

pub use cpu::{Cpu, Flags, RunState, Trap};
pub use decoder::{AluOp, Cond, Instruction, Op, Operand};
pub use encoder::{encode, EncodedWord};
pub use engine::{Engine, EngineConfig, RunReport};
pub use error::AsmError;
pub use memory::{Bus, LinearMemory};
pub use program::Program;
