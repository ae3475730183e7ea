use moncky_rs::program::LabelTable;
use moncky_rs::{AsmError, Engine, Program, Trap};
use pretty_assertions::assert_eq;

const SRC: &str = "\
:start
li r1, :end
:mid
:alias
li r2, :start
; comment

add r1, r2
:end
halt
";

#[test]
fn labels_bind_to_following_instruction() {
    let program = Program::new(SRC);
    let labels = program.labels();
    assert_eq!(labels.len(), 4);
    assert_eq!(labels.get(":start"), Some(0));
    assert_eq!(labels.get(":mid"), Some(1));
    assert_eq!(labels.get(":alias"), Some(1));
    assert_eq!(labels.get(":end"), Some(3));
    assert_eq!(labels.get("end"), None);
    assert_eq!(labels.declared_at(":end"), Some(9));
    assert_eq!(program.len(), 4);
    assert_eq!(program.fetch(3).unwrap().text, "halt");
}

#[test]
fn label_values_reach_registers() {
    let mut engine = Engine::default();
    engine.run(&Program::new(SRC)).unwrap();
    assert_eq!(engine.cpu().regs[1], 3);
    assert_eq!(engine.cpu().regs[2], 0);
}

#[test]
fn first_declaration_wins() {
    let table = LabelTable::scan([(1, ":a"), (2, "halt"), (3, ":a"), (4, "halt")]);
    assert_eq!(table.get(":a"), Some(0));
    assert_eq!(table.len(), 1);
    let dup = &table.duplicates()[0];
    assert_eq!((dup.name.as_str(), dup.first_line, dup.line), (":a", 1, 3));
}

#[test]
fn missing_label() {
    let program = Program::new("halt");
    assert_eq!(
        program.labels().resolve(":gone"),
        Err(AsmError::LabelNotFound(":gone".to_string()))
    );
}

#[test]
fn far_label_does_not_fit_li() {
    let mut src = String::from("li r1, :far\n");
    for _ in 0..300 {
        src.push_str("nop r0, r0\n");
    }
    src.push_str(":far\nhalt\n");
    let program = Program::new(&src);
    assert_eq!(program.labels().get(":far"), Some(301));

    let err = Engine::default().run(&program).unwrap_err();
    assert!(matches!(
        err,
        Trap::Decode {
            line: 1,
            source: AsmError::Range { what: "label address", value: 301, max: 255 },
        }
    ));
}
