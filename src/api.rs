//! The whole pipeline in single calls, for front-ends that only care about the end result.
//!
//! Everything here is a thin composition of [`crate::decode`], [`crate::parse`],
//! [`crate::passes`] and [`crate::fmt`].

use crate::ast::Program;
use crate::decode::{self, DecoderConfig};
use crate::error::{DecodeError, ParseError, SemanticError};
use crate::parse;
use crate::passes;

/// Flag constructs that parse but are not legal card abilities.
///
/// See [`passes::check_semantics::run`].
pub fn check(program: &Program) -> Vec<SemanticError> {
    passes::check_semantics::run(program)
}

// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Disassembly {
    /// Formatted program, one line per entry.  Empty if parsing could not produce a program.
    pub lines: Vec<String>,
    pub program: Option<Program>,
    pub decode_errors: Vec<DecodeError>,
    pub parse_errors: Vec<ParseError>,
}

impl Disassembly {
    pub fn is_ok(&self) -> bool { self.decode_errors.is_empty() && self.parse_errors.is_empty() }

    /// All lines, each followed by a newline.
    pub fn text(&self) -> String {
        self.lines.iter().map(|line| format!("{}\n", line)).collect()
    }
}

/// Bytecode to text.
pub fn disassemble(bytes: &[u8], config: &DecoderConfig) -> Disassembly {
    let decoded = decode::decode(bytes, config);
    let parsed = parse::parse(&decoded.tokens);
    let lines = match &parsed.program {
        Some(program) => crate::fmt::format_program(program),
        None => vec![],
    };
    Disassembly {
        lines,
        program: parsed.program,
        decode_errors: decoded.errors,
        parse_errors: parsed.errors,
    }
}

// =============================================================================

/// The first phase that found a problem.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display)]
pub enum Stage {
    #[strum(to_string = "decode")] Decode,
    #[strum(to_string = "parse")] Parse,
    #[strum(to_string = "semantic")] Semantic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Invalid(Stage),
    Valid(Program),
}

impl Validity {
    pub fn is_valid(&self) -> bool { matches!(self, Validity::Valid(_)) }

    /// Valid, and does at least something.
    pub fn has_statements(&self) -> bool {
        match self {
            Validity::Valid(program) => !program.top_level.is_empty(),
            Validity::Invalid(_) => false,
        }
    }

    pub fn program(&self) -> Option<&Program> {
        match self {
            Validity::Valid(program) => Some(program),
            Validity::Invalid(_) => None,
        }
    }
}

/// Decide whether a byte string is a legal card ability.
///
/// A byte string is valid when decoding, parsing and checking all report no errors.
pub fn validate(bytes: &[u8], config: &DecoderConfig) -> Validity {
    let decoded = decode::decode(bytes, config);
    if !decoded.is_ok() {
        return Validity::Invalid(Stage::Decode);
    }
    let program = match parse::parse(&decoded.tokens) {
        parse::Parsed { program: Some(program), errors } if errors.is_empty() => program,
        _ => return Validity::Invalid(Stage::Parse),
    };
    if !check(&program).is_empty() {
        return Validity::Invalid(Stage::Semantic);
    }
    Validity::Valid(program)
}
