//! Error types for each phase.
//!
//! None of the phases stop at the first problem.  Each one returns its output alongside a
//! `Vec` of these errors, and a phase succeeded iff its list is empty.  To show them to a
//! user, convert them through [`crate::diagnostic`].

use thiserror::Error;

use crate::isa::Opcode;
use crate::pos::Span;

/// Failure to turn bytes into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing bytecode (need at least 1 byte)")]
    MissingBytecode,

    #[error("opcode {opcode} at {pc} missing {missing} argument byte(s)")]
    Truncated { opcode: Opcode, pc: usize, missing: usize },

    /// Cannot currently happen, since the opcode byte is reduced modulo the number of opcodes
    /// before lookup.  It would become reachable if the opcode set ever stopped being contiguous.
    #[error("unknown opcode 0x{byte:02x} at byte {pc}")]
    UnknownOpcode { byte: u8, pc: usize },

    #[error("header byte 0x{found:02x} does not match expected version 0x{expected:02x}")]
    VersionMismatch { expected: u8, found: u8 },
}

impl DecodeError {
    pub fn pc(&self) -> Option<usize> {
        match *self {
            DecodeError::Truncated { pc, .. } => Some(pc),
            DecodeError::UnknownOpcode { pc, .. } => Some(pc),
            DecodeError::VersionMismatch { .. } => Some(0),
            DecodeError::MissingBytecode => None,
        }
    }
}

/// Failure to recover block structure from tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} but reached end")]
    ExpectedButReachedEnd { expected: Opcode },

    #[error("expected {expected} but found {found} at {pc}")]
    Expected { expected: Opcode, found: Opcode, pc: usize },

    #[error("expected comparison operator at token {pc}")]
    MissingComparison { pc: usize },

    #[error("unexpected {opcode} inside statement sequence at pc={pc}")]
    UnexpectedTerminator { opcode: Opcode, pc: usize },

    #[error("unexpected end of input while parsing statement")]
    UnexpectedEndOfInput,

    #[error("token stream has no {}", Opcode::End)]
    MissingTerminator,
}

impl ParseError {
    pub fn pc(&self) -> Option<usize> {
        match *self {
            ParseError::Expected { pc, .. } => Some(pc),
            ParseError::MissingComparison { pc } => Some(pc),
            ParseError::UnexpectedTerminator { pc, .. } => Some(pc),
            ParseError::ExpectedButReachedEnd { .. } => None,
            ParseError::UnexpectedEndOfInput => None,
            ParseError::MissingTerminator => None,
        }
    }
}

/// A problem found by reading freshly assembled bytecode back in.
///
/// The assembler only checks one line at a time, so these catch what only shows up in the
/// whole output, such as unbalanced blocks or a conditional cut short at the end of input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelfCheckError {
    #[error("assembled bytecode does not decode cleanly: {0}")]
    Decode(#[from] DecodeError),

    #[error("assembled bytecode does not parse: {0}")]
    Parse(#[from] ParseError),
}

impl SelfCheckError {
    pub fn pc(&self) -> Option<usize> {
        match self {
            SelfCheckError::Decode(e) => e.pc(),
            SelfCheckError::Parse(e) => e.pc(),
        }
    }
}

/// A construct that parses fine but is not a legal card ability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at pc={pc})")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub pc: usize,
}

impl SemanticError {
    pub fn message(&self) -> String { self.kind.to_string() }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    #[error("multiple DRAW operations not allowed")]
    MultipleDraw,
    #[error("multiple DISCARD operations")]
    MultipleDiscard,
    #[error("multiple CREATE_TOKEN operations")]
    MultipleCreateToken,
    #[error("multiple DESTROY operations for the same target")]
    MultipleDestroy,
    #[error("multiple DAMAGE operations for the same target")]
    MultipleDamage,
    #[error("multiple HEAL operations for the same target")]
    MultipleHeal,
    #[error("multiple BUFF_STAT operations for the same target and stat")]
    MultipleBuffStat,
    #[error("multiple DEBUFF_STAT operations for the same target and stat")]
    MultipleDebuffStat,
    #[error("empty THEN branch")]
    EmptyThen,
    #[error("empty ELSE branch")]
    EmptyElse,
    #[error("IMM direct comparisons not allowed")]
    ImmediateComparison,
    #[error("empty WHEN body")]
    EmptyWhen,
}

/// Failure on one line of assembly text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct AsmError {
    /// 1-based line number.
    pub line: usize,
    /// Location of the offending text within the whole source.
    pub span: Span,
    pub kind: AsmErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmErrorKind {
    #[error("unknown mnemonic '{name}'")]
    UnknownMnemonic { name: String, suggestion: Option<&'static str> },

    #[error("unknown {role} '{name}'")]
    UnknownOperand { role: OperandRole, name: String, suggestion: Option<&'static str> },

    #[error("{role} must be an integer from {min} to {max}, got '{text}'")]
    BadLiteral { role: OperandRole, text: String, min: u8, max: u8 },

    #[error("{mnemonic} takes {expected} operand(s) but {found} were given")]
    ArgCount { mnemonic: Opcode, expected: usize, found: usize },

    #[error("unexpected character(s) '{text}'")]
    BadCharacter { text: String },
}

impl AsmErrorKind {
    pub fn suggestion(&self) -> Option<&'static str> {
        match *self {
            AsmErrorKind::UnknownMnemonic { suggestion, .. } => suggestion,
            AsmErrorKind::UnknownOperand { suggestion, .. } => suggestion,
            _ => None,
        }
    }
}

/// What an operand in assembly text is supposed to be.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, strum::Display)]
pub enum OperandRole {
    #[strum(to_string = "target")] Target,
    #[strum(to_string = "stat")] Stat,
    #[strum(to_string = "amount")] Amount,
    #[strum(to_string = "event")] Event,
    #[strum(to_string = "comparator")] Comparator,
    #[strum(to_string = "comparison operand kind")] CmpOperandKind,
    #[strum(to_string = "immediate")] Immediate,
}
