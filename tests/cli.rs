//! Make sure the binary's subcommands are wired up and report problems usefully.

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::function::function as pred;

mod common;
use common::{TestFile, SIMPLE_PROGRAM};

fn cardscript() -> Command {
    Command::cargo_bin("cardscript").unwrap()
}

#[test]
fn help_actually_helps() {
    cardscript()
        .arg("assemble")
        .arg("--help")
        .assert()
        .success()
        // look for part of the --version-byte help
        .stderr(pred(|s: &str| s.contains("version-byte")))
    ;
}

#[test]
fn show_subcommands_error() {
    cardscript()
        .assert()
        .failure()
        .stderr(pred(|s: &str| s.contains("cardscript assemble")))
        .stderr(pred(|s: &str| s.contains("cardscript check")))
    ;
}

#[test]
fn show_subcommands_help() {
    cardscript()
        .arg("--help")
        .assert()
        .success()
        .stderr(pred(|s: &str| s.contains("cardscript disassemble")))
    ;
}

#[test]
fn versions() {
    cardscript().arg("--version").assert().success();
    cardscript().arg("assemble").arg("--version").assert().success();
}

#[test]
fn missing_input() {
    cardscript()
        .arg("check")
        .assert()
        .failure()
        .stderr(pred(|s: &str| s.contains("Usage: ")))
        .stderr(pred(|s: &str| s.contains("missing required")))
    ;
}

#[test]
fn assemble_then_disassemble() {
    let source = TestFile::from_content("input.cards", SIMPLE_PROGRAM);
    let bytecode = TestFile::new_temp("output.bin");

    cardscript()
        .arg("assemble").arg(source.as_path())
        .arg("-o").arg(bytecode.as_path())
        .assert()
        .success()
        .stdout(pred(|s: &str| s.contains("assembled 5 bytes")))
    ;
    assert_eq!(bytecode.read(), vec![0x01, 0x00, 0x01, 0x02, 0x0D]);

    cardscript()
        .arg("check").arg(bytecode.as_path())
        .assert()
        .success()
        .stdout(pred(|s: &str| s.contains(": valid")))
    ;

    cardscript()
        .arg("disassemble").arg(bytecode.as_path())
        .assert()
        .success()
        .stdout("DAMAGE OPPONENT 3\nEND\n")
    ;

    let text = TestFile::new_temp("roundtrip.cards");
    cardscript()
        .arg("disassemble").arg(bytecode.as_path())
        .arg("-o").arg(text.as_path())
        .assert()
        .success()
    ;
    assert_eq!(text.read_to_string(), "DAMAGE OPPONENT 3\nEND\n");
}

#[test]
fn assemble_error() {
    let source = TestFile::from_content("input.cards", "DAMGE OPPONENT 3\nEND\n");
    let bytecode = TestFile::new_temp("output.bin");

    cardscript()
        .arg("assemble").arg(source.as_path())
        .arg("-o").arg(bytecode.as_path())
        .assert()
        .failure()
        .stderr(pred(|s: &str| s.contains("unknown mnemonic")))
        .stderr(pred(|s: &str| s.contains("did you mean 'DAMAGE'?")))
    ;
    assert!(!bytecode.as_path().exists());
}

#[test]
fn assemble_rejects_unreadable_output() {
    // every line assembles, but the blocks do not nest
    let source = TestFile::from_content("input.cards", "WHEN ON_CAST\nDRAW 1\nEND\n");
    let bytecode = TestFile::new_temp("output.bin");

    cardscript()
        .arg("assemble").arg(source.as_path())
        .arg("-o").arg(bytecode.as_path())
        .assert()
        .failure()
        .stderr(pred(|s: &str| s.contains("assembled bytecode does not parse")))
        .stderr(pred(|s: &str| s.contains("no bytecode was written")))
    ;
    assert!(!bytecode.as_path().exists());
}

#[test]
fn assemble_warns_about_semantics() {
    let source = TestFile::from_content("input.cards", "DRAW 1\nDRAW 2\nEND\n");
    cardscript()
        .arg("assemble").arg(source.as_path())
        .assert()
        .success()
        .stderr(pred(|s: &str| s.contains("multiple DRAW operations not allowed")))
    ;
}

#[test]
fn check_semantic_failure() {
    // DRAW 1, DRAW 2, END
    let bytecode = TestFile::from_content("repeat.bin", [0x01u8, 0x04, 0x00, 0x04, 0x01, 0x0D]);
    cardscript()
        .arg("check").arg(bytecode.as_path())
        .assert()
        .failure()
        .stdout(pred(|s: &str| s.contains("invalid (semantic stage)")))
    ;
}

#[test]
fn check_strict_version() {
    let bytecode = TestFile::from_content("other.bin", [0x02u8, 0x0D]);
    cardscript().arg("check").arg(bytecode.as_path()).assert().success();
    cardscript()
        .arg("check").arg(bytecode.as_path())
        .arg("--strict-version")
        .assert()
        .failure()
        .stdout(pred(|s: &str| s.contains("invalid (decode stage)")))
    ;
    cardscript()
        .arg("check").arg(bytecode.as_path())
        .arg("--strict-version").arg("--version-byte").arg("2")
        .assert()
        .success()
    ;
}

#[test]
fn decode_listing() {
    let bytecode = TestFile::from_content("simple.bin", [0x01u8, 0x00, 0x01, 0x02, 0x0D]);
    cardscript()
        .arg("decode").arg(bytecode.as_path())
        .assert()
        .success()
        .stdout(pred(|s: &str| s.contains("size: 5 bytes")))
        .stdout(pred(|s: &str| s.contains("tokens: 2")))
        .stdout(pred(|s: &str| s.contains("    DAMAGE OPPONENT 3\n")))
    ;
}

#[test]
fn decode_json() {
    let bytecode = TestFile::from_content("simple.bin", [0x01u8, 0x00, 0x01, 0x02, 0x0D]);
    let output = cardscript()
        .arg("decode").arg(bytecode.as_path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["header"], 1);
    assert_eq!(report["tokens"][0]["op"], "DAMAGE");
    assert_eq!(report["tokens"][0]["target"], "OPPONENT");
    assert_eq!(report["tokens"][1]["op"], "END");
    assert_eq!(report["tokens"][1]["pc"], 4);
}

#[test]
fn missing_file() {
    cardscript()
        .arg("check").arg("this-file-does-not-exist.bin")
        .assert()
        .failure()
        .stderr(pred(|s: &str| s.contains("while reading")))
    ;
}
