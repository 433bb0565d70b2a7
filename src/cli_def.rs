//! Entry points of the `cardscript` binary.
//!
//! Each subcommand is a module with a `main` that parses its own arguments, and a `run`
//! that does the work and reports problems through a [`crate::diagnostic::Emitter`].

use anyhow::Context;
use std::path::Path;

pub fn main(version: &str) -> ! {
    let args = std::env::args().collect::<Vec<_>>();

    let subcommands: Vec<(&str, fn(&[String]) -> !, &str)> = vec![
        ("assemble", assemble::main, "compile mnemonic text into bytecode"),
        ("disassemble", disassemble::main, "turn bytecode back into mnemonic text"),
        ("decode", decode::main, "show every stage of reading a bytecode file"),
        ("check", check::main, "exit with success iff a bytecode file is a valid program"),
    ];

    let print_usage = || {
        let mut usage_or_align = "usage: ";
        for &(subcommand, _, help) in &subcommands {
            eprintln!("{} cardscript {:<12} ARGS...    {}", usage_or_align, subcommand, help);
            usage_or_align = "       ";
        }
    };
    let err_with_usage = || -> ! {
        print_usage();
        std::process::exit(1);
    };

    let user_subcommand = match args.get(1) {
        Some(arg) => arg.as_str(),
        None => err_with_usage(),
    };
    match user_subcommand {
        "--version" | "-V" => {
            println!("cardscript {}", version);
            std::process::exit(0);
        },
        "--help" | "-h" => {
            print_usage();
            std::process::exit(0);
        },
        _ => {},
    }
    for &(subcommand, function, _) in &subcommands {
        if subcommand == user_subcommand {
            function(&args[2..]);
        }
    }

    err_with_usage();
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("while reading '{}'", path.display()))
}

fn write_file(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, data).with_context(|| format!("while writing '{}'", path.display()))
}

/// Exit after reporting an error that happened outside of the actual toolchain.
fn exit_with(e: anyhow::Error) -> ! {
    crate::cli_helper::emit_nospans(&e);
    std::process::exit(1);
}

pub mod assemble {
    use super::*;
    use crate::asm::{self, AssemblerConfig};
    use crate::decode::DecoderConfig;
    use crate::diagnostic::{self, Emitter};

    pub fn main(args: &[String]) -> ! {
        use crate::{cli_helper as cli, args, args_pat};

        let args_pat![input, output, config] = cli::cli(
            "cardscript assemble", args, "FILE [OPTIONS...]",
            args![cli::input(), cli::output(), cli::assembler_config()],
        );
        match run(&input, output.as_deref(), &config) {
            Ok(true) => std::process::exit(0),
            Ok(false) => std::process::exit(1),
            Err(e) => exit_with(e),
        }
    }

    /// Returns `false` if there were errors in the source.
    pub fn run(path: &Path, output: Option<&Path>, config: &AssemblerConfig) -> anyhow::Result<bool> {
        let bytes = read_file(path)?;
        let text = String::from_utf8(bytes).with_context(|| format!("'{}' is not UTF-8 text", path.display()))?;

        let assembled = asm::assemble_with(&text, config);
        let mut emitter = Emitter::stderr(path.display().to_string(), text.as_str());
        emitter.emit_all(&assembled.errors)?;
        for err in &assembled.self_check_errors {
            emitter.emit(&diagnostic::self_check_in_source(err, &assembled))?;
        }
        if !assembled.is_ok() {
            eprintln!("{} error(s); no bytecode was written", emitter.error_count());
            return Ok(false);
        }

        // the bytecode is fine, but the program may still not be a legal ability
        let decoder_config = DecoderConfig { version_byte: config.version_byte, strict_version: false };
        if let Some(program) = crate::api::disassemble(&assembled.bytecode, &decoder_config).program {
            for err in crate::api::check(&program) {
                emitter.emit(&diagnostic::semantic_in_source(&err, &assembled))?;
            }
        }

        println!("assembled {} bytes", assembled.bytecode.len());
        println!();
        for line in &assembled.disassembly {
            println!("    {}", line);
        }

        if let Some(output) = output {
            write_file(output, &assembled.bytecode)?;
            println!();
            println!("bytecode written to '{}'", output.display());
        }
        Ok(true)
    }
}

pub mod disassemble {
    use super::*;
    use crate::decode::DecoderConfig;
    use crate::diagnostic::Emitter;

    pub fn main(args: &[String]) -> ! {
        use crate::{cli_helper as cli, args, args_pat};

        let args_pat![input, output, config] = cli::cli(
            "cardscript disassemble", args, "FILE [OPTIONS...]",
            args![cli::input(), cli::output(), cli::decoder_config()],
        );
        match run(&input, output.as_deref(), &config) {
            Ok(true) => std::process::exit(0),
            Ok(false) => std::process::exit(1),
            Err(e) => exit_with(e),
        }
    }

    /// Returns `false` if the bytecode could not be read cleanly.  Whatever could be recovered
    /// is still written.
    pub fn run(path: &Path, output: Option<&Path>, config: &DecoderConfig) -> anyhow::Result<bool> {
        let bytes = read_file(path)?;
        let disassembly = crate::api::disassemble(&bytes, config);

        let mut emitter = Emitter::stderr(path.display().to_string(), "");
        emitter.emit_all(&disassembly.decode_errors)?;
        emitter.emit_all(&disassembly.parse_errors)?;

        let text = disassembly.text();
        match output {
            Some(output) => write_file(output, text.as_bytes())?,
            None => print!("{}", text),
        }
        Ok(disassembly.is_ok())
    }
}

pub mod decode {
    use super::*;
    use crate::decode::{self as decoder, DecoderConfig};
    use crate::diagnostic::Emitter;
    use crate::fmt::Formatter;
    use crate::parse;

    pub fn main(args: &[String]) -> ! {
        use crate::{cli_helper as cli, args, args_pat};

        let args_pat![input, json, config] = cli::cli(
            "cardscript decode", args, "FILE [OPTIONS...]",
            args![cli::input(), cli::json(), cli::decoder_config()],
        );
        let result = match json {
            true => run_json(&input, &config),
            false => run(&input, &config),
        };
        match result {
            Ok(()) => std::process::exit(0),
            Err(e) => exit_with(e),
        }
    }

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect::<Vec<_>>().join(" ")
    }

    pub fn run(path: &Path, config: &DecoderConfig) -> anyhow::Result<()> {
        let bytes = read_file(path)?;
        println!("input: {}", path.display());
        println!("size: {} bytes", bytes.len());
        println!("hex: {}", hex(&bytes));
        println!();

        let mut emitter = Emitter::stderr(path.display().to_string(), "");

        let decoded = decoder::decode(&bytes, config);
        emitter.emit_all(&decoded.errors)?;
        println!("tokens: {}", decoded.tokens.len());
        for token in &decoded.tokens {
            println!("    {}", token);
        }
        println!();

        let parsed = parse::parse(&decoded.tokens);
        emitter.emit_all(&parsed.errors)?;
        if let Some(program) = &parsed.program {
            let semantic_errors = crate::api::check(program);
            emitter.emit_all(&semantic_errors)?;

            println!("program:");
            let stdout = std::io::stdout();
            let mut f = Formatter::new(std::io::BufWriter::new(stdout.lock())).with_initial_indent(1);
            f.fmt(program)?;
            f.into_inner()?;
        }
        Ok(())
    }

    #[derive(serde::Serialize)]
    struct Report<'a> {
        header: Option<u8>,
        tokens: &'a [crate::token::Token],
        decode_errors: Vec<String>,
        program: Option<&'a crate::ast::Program>,
        parse_errors: Vec<String>,
        semantic_errors: Vec<SemanticReport>,
        valid: bool,
    }

    #[derive(serde::Serialize)]
    struct SemanticReport {
        message: String,
        pc: usize,
    }

    pub fn run_json(path: &Path, config: &DecoderConfig) -> anyhow::Result<()> {
        let bytes = read_file(path)?;
        let decoded = decoder::decode(&bytes, config);
        let parsed = parse::parse(&decoded.tokens);
        let semantic_errors = parsed.program.as_ref().map(crate::api::check).unwrap_or_default();

        let report = Report {
            header: decoded.header,
            tokens: &decoded.tokens,
            decode_errors: decoded.errors.iter().map(ToString::to_string).collect(),
            program: parsed.program.as_ref(),
            parse_errors: parsed.errors.iter().map(ToString::to_string).collect(),
            semantic_errors: semantic_errors.iter().map(|e| SemanticReport { message: e.message(), pc: e.pc }).collect(),
            valid: decoded.is_ok() && parsed.is_ok() && semantic_errors.is_empty(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

pub mod check {
    use super::*;
    use crate::api::{self, Validity};
    use crate::decode::DecoderConfig;

    pub fn main(args: &[String]) -> ! {
        use crate::{cli_helper as cli, args, args_pat};

        let args_pat![input, config] = cli::cli(
            "cardscript check", args, "FILE [OPTIONS...]",
            args![cli::input(), cli::decoder_config()],
        );
        match run(&input, &config) {
            Ok(validity) => std::process::exit(if validity.is_valid() { 0 } else { 1 }),
            Err(e) => exit_with(e),
        }
    }

    pub fn run(path: &Path, config: &DecoderConfig) -> anyhow::Result<Validity> {
        let bytes = read_file(path)?;
        let validity = api::validate(&bytes, config);
        match &validity {
            Validity::Valid(_) => println!("{}: valid", path.display()),
            Validity::Invalid(stage) => println!("{}: invalid ({} stage)", path.display(), stage),
        }
        Ok(validity)
    }
}
