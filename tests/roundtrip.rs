//! Text to bytecode and back again.

use cardscript::{assemble, disassemble, validate, DecoderConfig};

mod common;
use common::{COMPLEX_PROGRAM, COMPLEX_PROGRAM_CANONICAL, SIMPLE_PROGRAM};

fn lines(strs: &[&str]) -> Vec<String> { strs.iter().map(|s| s.to_string()).collect() }

#[test]
fn simple() {
    let assembled = assemble(SIMPLE_PROGRAM);
    assert!(assembled.is_ok(), "{:?}", assembled.errors);
    assert_eq!(assembled.bytecode, vec![0x01, 0x00, 0x01, 0x02, 0x0D]);
    assert_eq!(assembled.disassembly, lines(&["DAMAGE OPPONENT 3", "END"]));
}

#[test]
fn complex() {
    let assembled = assemble(COMPLEX_PROGRAM);
    assert!(assembled.is_ok(), "{:?}", assembled.errors);
    assert_eq!(assembled.bytecode.len(), 29);
    assert_eq!(assembled.disassembly, lines(COMPLEX_PROGRAM_CANONICAL));

    let disassembly = disassemble(&assembled.bytecode, &DecoderConfig::default());
    assert!(disassembly.is_ok());
    assert_eq!(disassembly.lines, assembled.disassembly);

    // canonical text is a fixed point
    let reassembled = assemble(&disassembly.text());
    assert!(reassembled.is_ok(), "{:?}", reassembled.errors);
    assert_eq!(reassembled.bytecode, assembled.bytecode);

    let validity = validate(&assembled.bytecode, &DecoderConfig::default());
    assert!(validity.is_valid());
    assert!(validity.has_statements());
}

#[test]
fn complex_snapshot() {
    let assembled = assemble(COMPLEX_PROGRAM);
    let text = assembled.disassembly.join("\n");
    insta::assert_snapshot!(text, @r###"
    DRAW 1
    WHEN ON_ATTACK
        IF GT IMM 5 STAT_OF OPPONENT ATTACK
            DAMAGE OPPONENT 2
        ELSE
            HEAL SELF 1
        ENDIF
    ENDWHEN
    WHEN ON_ENTER
        BUFF_STAT SELF ATTACK 1
    ENDWHEN
    END
    "###);
}

#[test]
fn errors_do_not_stop_assembly() {
    let assembled = assemble("INVALID_OPCODE\nDAMAGE SELF 1\nEND");
    assert!(!assembled.is_ok());
    assert_eq!(assembled.errors.len(), 1);
    // the good lines still made it out, but there is no self-check without a clean assembly
    assert_eq!(assembled.bytecode, vec![0x01, 0x00, 0x00, 0x00, 0x0D]);
    assert!(assembled.disassembly.is_empty());
}

#[test]
fn aliases_come_back_canonical() {
    let assembled = assemble("TRIGGER_START ON_DEATH\n  CREATE_TOKEN 2\nTRIGGER_END\nEND");
    assert!(assembled.is_ok(), "{:?}", assembled.errors);
    assert_eq!(assembled.disassembly, lines(&[
        "WHEN ON_DEATH",
        "    CREATE_TOKEN 2",
        "ENDWHEN",
        "END",
    ]));
}

#[test]
fn empty_else_survives() {
    let source = "IF LT STAT_OF SELF HEALTH IMM 3\n    HEAL SELF 2\nELSE\nENDIF\nEND";
    let assembled = assemble(source);
    assert!(assembled.is_ok(), "{:?}", assembled.errors);
    assert_eq!(assembled.disassembly, lines(&[
        "IF LT STAT_OF SELF HEALTH IMM 3",
        "    HEAL SELF 2",
        "ELSE",
        "ENDIF",
        "END",
    ]));

    // legal syntax, but not a legal ability
    let validity = validate(&assembled.bytecode, &DecoderConfig::default());
    assert_eq!(validity, cardscript::Validity::Invalid(cardscript::Stage::Semantic));
}
