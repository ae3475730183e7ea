use moncky_rs::{Engine, Flags, Program};
use pretty_assertions::assert_eq;

fn run(src: &str) -> Engine {
    let program = Program::new(src);
    let mut engine = Engine::default();
    engine.run(&program).unwrap();
    engine
}

#[test]
fn and_or_xor_results_and_zero_flag() {
    let src = "\
li r1, 0xf0
li r2, 0x3c
nop r3, r1
and r3, r2
nop r4, r1
or r4, r2
nop r5, r1
xor r5, r2
nop r6, r1
xor r6, r1
halt
";
    let engine = run(src);
    let cpu = engine.cpu();
    assert_eq!(cpu.regs[3], 0x30);
    assert_eq!(cpu.regs[4], 0xFC);
    assert_eq!(cpu.regs[5], 0xCC);
    assert_eq!(cpu.regs[6], 0);
    assert_eq!(cpu.flags, Flags::Z);
}

#[test]
fn nop_copies_and_clears_flags() {
    let engine = run("li r1, 1\nli r2, 1\nsub r1, r2\nli r3, 42\nnop r4, r3\nhalt");
    assert_eq!(engine.cpu().regs[4], 42);
    assert_eq!(engine.cpu().flags, Flags::empty());
}

#[test]
fn add_overflow_only_on_positive_excess() {
    // 0x8000 + 0x8000 wraps to zero without overflow
    let src = "\
li r1, 0x80
li r2, 8
shl r1, r2
nop r3, r1
add r1, r3
halt
";
    let engine = run(src);
    assert_eq!(engine.cpu().regs[1], 0);
    assert_eq!(engine.cpu().flags, Flags::Z);
}

#[test]
fn sub_sign_and_zero() {
    let engine = run("li r1, 1\nli r2, 2\nsub r1, r2\nhalt");
    assert_eq!(engine.cpu().regs[1], 0xFFFF);
    assert_eq!(engine.cpu().flags, Flags::S);

    // a zero result leaves the previous sign in place
    let engine = run("li r1, 1\nli r2, 2\nsub r1, r2\nli r3, 0\nsub r3, r3\nhalt");
    assert_eq!(engine.cpu().flags, Flags::S | Flags::Z);

    let engine = run("li r1, 9\nli r2, 2\nsub r1, r2\nhalt");
    assert_eq!(engine.cpu().regs[1], 7);
    assert_eq!(engine.cpu().flags, Flags::empty());
}

#[test]
fn shifts_by_register_count() {
    let src = "\
li r1, 0x80
li r2, 8
shl r1, r2
nop r4, r1
li r3, 4
ashr r1, r3
shr r4, r3
li r5, 0x81
li r6, 0
shl r5, r6
halt
";
    let engine = run(src);
    let cpu = engine.cpu();
    assert_eq!(cpu.regs[1], 0xF800);
    assert_eq!(cpu.regs[4], 0x0800);
    assert_eq!(cpu.regs[5], 0x81);
}

#[test]
fn shifts_leave_flags_alone() {
    let engine = run("li r1, 1\nli r2, 1\nsub r1, r2\nli r3, 3\nshl r2, r3\nhalt");
    assert_eq!(engine.cpu().regs[2], 8);
    assert_eq!(engine.cpu().flags, Flags::Z);
}

#[test]
fn not_and_neg() {
    let src = "\
li r1, 5
not r2, r1
neg r3, r1
li r4, 0
neg r5, r4
halt
";
    let engine = run(src);
    let cpu = engine.cpu();
    assert_eq!(cpu.regs[2], 0xFFFA);
    assert_eq!(cpu.regs[3], 0xFFFB);
    assert_eq!(cpu.regs[5], 0);
    assert_eq!(cpu.flags, Flags::empty());
}
