use crate::cpu::{Cpu, Flags, Trap};
use crate::decoder::{AluOp, Cond, Instruction, Op, Operand};
use crate::error::AsmError;
use crate::memory::Bus;

/// How the program counter moves after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// PC + 1
    Next,
    /// PC already written by the instruction
    Jump,
    Halt,
}

pub trait Executor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, instr: &Instruction) -> Result<Flow, Trap>;
}

pub struct IntExecutor;
impl Executor for IntExecutor {
    fn exec<B: Bus>(&self, cpu: &mut Cpu, bus: &mut B, instr: &Instruction) -> Result<Flow, Trap> {
        let line = instr.line;
        // every register index is checked before any state changes
        if let Some(r) = instr.operands.iter().find_map(|o| match o {
            Operand::Reg(r) | Operand::Mem(r) if *r as usize >= cpu.regs.len() => Some(*r),
            _ => None,
        }) {
            return Err(Trap::Decode {
                line,
                source: AsmError::Range {
                    what: "register",
                    value: r as i64,
                    max: (cpu.regs.len() - 1) as u16,
                },
            });
        }
        match (instr.op, instr.operands.as_slice()) {
            (Op::Halt, []) => return Ok(Flow::Halt),
            (Op::Li, [Operand::Reg(rd), Operand::Imm(v)]) => {
                cpu.regs[*rd as usize] = *v as u16;
            }
            (Op::Ld, [Operand::Reg(rd), Operand::Mem(ra)]) => {
                let addr = cpu.regs[*ra as usize];
                let val = bus
                    .read_word(addr)
                    .map_err(|source| Trap::Bus { line, addr, source })?;
                cpu.regs[*rd as usize] = val;
            }
            (Op::St, [Operand::Reg(ra), Operand::Mem(rs)]) => {
                // first operand holds the address, second the value
                let addr = cpu.regs[*ra as usize];
                let val = cpu.regs[*rs as usize];
                bus.write_word(addr, val)
                    .map_err(|source| Trap::Bus { line, addr, source })?;
            }
            (Op::Jp, [Operand::Reg(r)]) => {
                cpu.set_pc(cpu.regs[*r as usize]);
                return Ok(Flow::Jump);
            }
            (Op::Jcc(cond), [Operand::Reg(r)]) => {
                if condition_holds(cpu.flags, cond) {
                    cpu.set_pc(cpu.regs[*r as usize]);
                    return Ok(Flow::Jump);
                }
            }
            (Op::Alu(op), [Operand::Reg(rd), Operand::Reg(rs)]) => {
                alu(cpu, op, *rd as usize, *rs as usize);
            }
            _ => {
                return Err(Trap::Decode {
                    line,
                    source: AsmError::parse("operands", &instr.to_string()),
                })
            }
        }
        Ok(Flow::Next)
    }
}

pub fn condition_holds(flags: Flags, cond: Cond) -> bool {
    match cond {
        Cond::Carry => flags.contains(Flags::C),
        Cond::NoCarry => !flags.contains(Flags::C),
        Cond::Zero => flags.contains(Flags::Z),
        Cond::NotZero => !flags.contains(Flags::Z),
        Cond::Sign => flags.contains(Flags::S),
        Cond::NotSign => !flags.contains(Flags::S),
        Cond::Overflow => flags.contains(Flags::V),
        Cond::NoOverflow => !flags.contains(Flags::V),
    }
}

fn alu(cpu: &mut Cpu, op: AluOp, rd: usize, rs: usize) {
    let a = cpu.regs[rd];
    let b = cpu.regs[rs];
    let flags = &mut cpu.flags;
    let res = match op {
        AluOp::Nop => {
            *flags = Flags::empty();
            b
        }
        AluOp::Or | AluOp::And | AluOp::Xor => {
            let res = match op {
                AluOp::Or => a | b,
                AluOp::And => a & b,
                _ => a ^ b,
            };
            *flags = Flags::empty();
            flags.set(Flags::Z, res == 0);
            res
        }
        AluOp::Add => {
            let res = a.wrapping_add(b);
            let sum = a as i16 as i32 + b as i16 as i32;
            *flags = Flags::empty();
            flags.set(Flags::Z, res == 0);
            flags.set(Flags::V, sum > i16::MAX as i32);
            res
        }
        AluOp::Sub => {
            let res = a.wrapping_sub(b);
            flags.remove(Flags::C | Flags::V);
            if res == 0 {
                // sign keeps its previous value
                flags.insert(Flags::Z);
            } else {
                flags.remove(Flags::Z);
                flags.set(Flags::S, (res as i16) < 0);
            }
            res
        }
        AluOp::Shl => shl(a, b),
        AluOp::Shr => shr(a, b),
        AluOp::Ashr => ashr(a, b),
        AluOp::Not => !b,
        AluOp::Neg => (!b).wrapping_add(1),
    };
    cpu.regs[rd] = res;
}

/// Shift count held in a register; read as signed, non-positive means no shift.
fn shift_count(count: u16) -> u32 {
    (count as i16).max(0) as u32
}

pub(crate) fn shl(v: u16, count: u16) -> u16 {
    v.checked_shl(shift_count(count)).unwrap_or(0)
}

pub(crate) fn shr(v: u16, count: u16) -> u16 {
    v.checked_shr(shift_count(count)).unwrap_or(0)
}

pub(crate) fn ashr(v: u16, count: u16) -> u16 {
    ((v as i16) >> shift_count(count).min(15)) as u16
}
