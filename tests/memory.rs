use moncky_rs::exec::IntExecutor;
use moncky_rs::{Bus, Engine, EngineConfig, LinearMemory, Program, Trap};
use pretty_assertions::assert_eq;

#[test]
fn store_then_load() {
    // st: first operand is the address register, second the value
    let src = "\
li r1, 42
li r2, 100
st r2, (r1)
ld r3, (r2)
halt
";
    let program = Program::new(src);
    let mut engine = Engine::default();
    engine.run(&program).unwrap();
    assert_eq!(engine.cpu().regs[3], 42);
    assert_eq!(engine.bus().mem[100], 42);
    assert_eq!(engine.bus().nonzero().collect::<Vec<_>>(), vec![(100, 42)]);
}

#[test]
fn store_to_top_of_memory() {
    // r1 = 0xFFFF via neg of 1
    let src = "\
li r2, 1
neg r1, r2
li r3, 7
st r1, (r3)
ld r4, (r1)
halt
";
    let program = Program::new(src);
    let mut engine = Engine::default();
    engine.run(&program).unwrap();
    assert_eq!(engine.bus().mem[0xFFFF], 7);
    assert_eq!(engine.cpu().regs[4], 7);
}

#[test]
fn memory_is_cleared_between_runs() {
    let mut engine = Engine::default();
    engine
        .run(&Program::new("li r1, 5\nli r2, 9\nst r1, (r2)\nhalt"))
        .unwrap();
    assert_eq!(engine.bus().mem[5], 9);

    engine
        .run(&Program::new("li r1, 5\nld r2, (r1)\nhalt"))
        .unwrap();
    assert_eq!(engine.cpu().regs[2], 0);
}

#[test]
fn small_bus_faults_out_of_range() {
    let program = Program::new("li r1, 200\nld r2, (r1)\nhalt");
    let mut engine = Engine::with_parts(LinearMemory::new(16), IntExecutor, EngineConfig::default());
    let err = engine.run(&program).unwrap_err();
    assert!(matches!(err, Trap::Bus { line: 2, addr: 200, .. }));
}

#[test]
fn linear_memory_bus() {
    let mut mem = LinearMemory::new(4);
    mem.write_word(3, 0xBEEF).unwrap();
    assert_eq!(mem.read_word(3).unwrap(), 0xBEEF);
    assert!(mem.read_word(4).is_err());
    assert!(mem.write_word(4, 1).is_err());
    mem.clear();
    assert_eq!(mem.read_word(3).unwrap(), 0);
}

#[test]
fn bad_register_aborts_with_prior_state_intact() {
    let program = Program::new("li r1, 7\nadd r1, r16\nhalt");
    let mut engine = Engine::default();
    let err = engine.run(&program).unwrap_err();
    assert!(matches!(
        err,
        Trap::Decode {
            line: 2,
            source: moncky_rs::AsmError::Range { what: "register", value: 16, max: 15 },
        }
    ));
    assert_eq!(engine.cpu().regs[1], 7);
    assert_eq!(engine.cpu().pc(), 1);
}

#[test]
fn executor_rejects_out_of_range_registers() {
    use moncky_rs::exec::Executor;
    use moncky_rs::{AluOp, Cpu, Instruction, Op, Operand};

    let exec = IntExecutor;
    let mut cpu = Cpu::new();
    let mut mem = LinearMemory::new(16);
    cpu.regs[1] = 5;

    let add = Instruction::new(Op::Alu(AluOp::Add), vec![Operand::Reg(1), Operand::Reg(16)]).at_line(4);
    let ld = Instruction::new(Op::Ld, vec![Operand::Reg(200), Operand::Mem(1)]).at_line(5);
    let st = Instruction::new(Op::St, vec![Operand::Reg(1), Operand::Mem(17)]).at_line(6);
    for (instr, line, reg) in [(add, 4, 16), (ld, 5, 200), (st, 6, 17)] {
        let err = exec.exec(&mut cpu, &mut mem, &instr).unwrap_err();
        assert!(matches!(
            err,
            Trap::Decode {
                line: l,
                source: moncky_rs::AsmError::Range { what: "register", value, max: 15 },
            } if l == line && value == reg
        ));
    }
    assert_eq!(cpu.regs[1], 5);
    assert_eq!(cpu.pc(), 0);
    assert!(mem.nonzero().next().is_none());
}
