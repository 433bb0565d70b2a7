//! Mnemonic text to bytecode.
//!
//! ```text
//! ; comments run to the end of the line
//! WHEN ON_ATTACK
//!     IF GT IMM 5 STAT_OF OPPONENT ATTACK
//!         DAMAGE OPPONENT 2
//!     ENDIF
//! ENDWHEN
//! END
//! ```
//!
//! One instruction per line, operands separated by whitespace, in the same order they have
//! in bytecode.  Block structure is not checked here; that is the parser's job when the
//! output is decoded again.
//!
//! A line with a problem produces no bytes and one [`AsmError`], and assembly moves on to
//! the next line.  Once every line assembles, the output is decoded and parsed again, and
//! anything that fails there is reported as a [`SelfCheckError`].

use std::str::FromStr;

use crate::ast::CmpOperand;
use crate::decode::{self, DecoderConfig, DEFAULT_VERSION_BYTE};
use crate::encode;
use crate::error::{AsmError, AsmErrorKind, OperandRole, SelfCheckError};
use crate::isa::{Amount, CmpOperandKind, Comparator, EventKind, Imm, Opcode, Stat, Target, CMP_OPERAND_SLOT};
use crate::parse;
use crate::pos::{Sp, Span};
use crate::token::TokenKind;

use lexer::{Line, Token};

pub mod lexer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Written as the header byte.
    pub version_byte: u8,
}

impl Default for AssemblerConfig {
    fn default() -> Self { AssemblerConfig { version_byte: DEFAULT_VERSION_BYTE } }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assembled {
    /// Header byte followed by every line that assembled cleanly, even if others did not.
    pub bytecode: Vec<u8>,
    pub errors: Vec<AsmError>,
    /// The bytecode decoded and formatted again.  Empty unless `errors` is empty.
    pub disassembly: Vec<String>,
    /// Problems hit while producing `disassembly`.  Empty unless `errors` is empty.
    pub self_check_errors: Vec<SelfCheckError>,
    /// Byte offset of each emitted instruction and the source text it came from.
    pub source_map: Vec<(usize, Span)>,
}

impl Assembled {
    /// Every line assembled, and the output reads back as a program.
    pub fn is_ok(&self) -> bool { self.errors.is_empty() && self.self_check_errors.is_empty() }

    /// Source location of the instruction that begins at `pc`.
    pub fn span_at_pc(&self, pc: usize) -> Option<Span> {
        self.source_map.iter().find(|&&(p, _)| p == pc).map(|&(_, span)| span)
    }
}

/// Assemble with the default header byte.
pub fn assemble(text: &str) -> Assembled {
    assemble_with(text, &AssemblerConfig::default())
}

pub fn assemble_with(text: &str, config: &AssemblerConfig) -> Assembled {
    let mut out = Assembled { bytecode: vec![config.version_byte], ..Default::default() };

    for line in lexer::lines(text) {
        match assemble_line(text, &line) {
            Ok(kind) => {
                out.source_map.push((out.bytecode.len(), line.span()));
                // writing to a Vec cannot fail
                let _ = encode::write_token(&mut out.bytecode, &kind);
            },
            Err(err) => out.errors.push(AsmError { line: line.number, span: err.span, kind: err.value }),
        }
    }

    if out.errors.is_empty() {
        self_check(&mut out, config);
    }
    out
}

/// Decode, parse and format what was just assembled.
fn self_check(out: &mut Assembled, config: &AssemblerConfig) {
    let decoder_config = DecoderConfig { version_byte: config.version_byte, strict_version: false };
    let decoded = decode::decode(&out.bytecode, &decoder_config);
    let parsed = parse::parse(&decoded.tokens);

    out.self_check_errors.extend(decoded.errors.into_iter().map(SelfCheckError::from));
    out.self_check_errors.extend(parsed.errors.into_iter().map(SelfCheckError::from));
    if let Some(program) = &parsed.program {
        out.disassembly = crate::fmt::format_program(program);
    }
}

type LineResult<T> = Result<T, Sp<AsmErrorKind>>;

fn assemble_line(text: &str, line: &Line<'_>) -> LineResult<TokenKind> {
    if let Some(bad) = line.words.iter().find(|w| w.value == Token::Error) {
        let text = text[bad.span.range()].to_string();
        return Err(sp!(bad.span => AsmErrorKind::BadCharacter { text }));
    }

    let (mnemonic, operands) = match line.words.split_first() {
        Some(split) => split,
        None => return Err(sp!(line.span() => AsmErrorKind::UnknownMnemonic { name: String::new(), suggestion: None })),
    };
    let opcode = resolve_mnemonic(mnemonic)?;

    let expected = expected_operand_count(opcode, operands);
    if operands.len() != expected {
        return Err(sp!(line.span() => AsmErrorKind::ArgCount { mnemonic: opcode, expected, found: operands.len() }));
    }

    let mut ops = Operands { opcode, words: operands, index: 0 };
    let kind = match opcode {
        Opcode::Damage => TokenKind::Damage { target: ops.target()?, amount: ops.amount()? },
        Opcode::Heal => TokenKind::Heal { target: ops.target()?, amount: ops.amount()? },
        Opcode::BuffStat => TokenKind::BuffStat { target: ops.target()?, stat: ops.stat()?, amount: ops.amount()? },
        Opcode::DebuffStat => TokenKind::DebuffStat { target: ops.target()?, stat: ops.stat()?, amount: ops.amount()? },
        Opcode::Draw => TokenKind::Draw { amount: ops.amount()? },
        Opcode::Discard => TokenKind::Discard { amount: ops.amount()? },
        Opcode::CreateToken => TokenKind::CreateToken { amount: ops.amount()? },
        Opcode::Destroy => TokenKind::Destroy { target: ops.target()? },
        Opcode::If => TokenKind::If { cmp: ops.comparator()?, lhs: ops.cmp_operand()?, rhs: ops.cmp_operand()? },
        Opcode::Else => TokenKind::Else,
        Opcode::EndIf => TokenKind::EndIf,
        Opcode::When => TokenKind::When { event: ops.event()? },
        Opcode::EndWhen => TokenKind::EndWhen,
        Opcode::End => TokenKind::End,
    };
    Ok(kind)
}

fn resolve_mnemonic(word: &Sp<Token<'_>>) -> LineResult<Opcode> {
    let name = word_text(word);
    Opcode::from_str(name).map_err(|_| {
        let suggestion = suggest(name, Opcode::ALL.iter().map(|op| op.label()));
        sp!(word.span => AsmErrorKind::UnknownMnemonic { name: name.to_string(), suggestion })
    })
}

/// Number of operand words a line with this mnemonic should have.
///
/// Everything but `IF` has one word per argument byte.  An `IF` operand is either
/// `IMM value` or `STAT_OF target stat`, so its width depends on the kind words that are
/// actually present.  Anything that isn't `STAT_OF` is assumed to be `IMM` here; a bad kind
/// word is reported later by name.
fn expected_operand_count(opcode: Opcode, operands: &[Sp<Token<'_>>]) -> usize {
    if opcode != Opcode::If {
        return opcode.arg_count();
    }
    let width = |index: usize| match operands.get(index).map(|w| w.value) {
        Some(Token::Ident(name)) if name == CmpOperandKind::StatOf.label() => CMP_OPERAND_SLOT,
        _ => CMP_OPERAND_SLOT - 1,
    };
    let lhs_width = width(1);
    1 + lhs_width + width(1 + lhs_width)
}

fn word_text<'a>(word: &Sp<Token<'a>>) -> &'a str {
    match word.value {
        Token::Ident(text) | Token::LitInt(text) => text,
        Token::Newline | Token::Error => "",
    }
}

/// Closest label to a misspelled name, if any is close enough to be worth mentioning.
pub fn suggest(name: &str, candidates: impl IntoIterator<Item=&'static str>) -> Option<&'static str> {
    let upper = name.to_ascii_uppercase();
    candidates.into_iter()
        .map(|candidate| (strsim::jaro_winkler(&upper, candidate), candidate))
        .filter(|&(score, _)| score >= 0.85)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, candidate)| candidate)
}

/// Cursor over the operand words of one line.
struct Operands<'w, 'a> {
    opcode: Opcode,
    words: &'w [Sp<Token<'a>>],
    index: usize,
}

impl<'w, 'a> Operands<'w, 'a> {
    fn next(&mut self) -> LineResult<&'w Sp<Token<'a>>> {
        match self.words.get(self.index) {
            Some(word) => {
                self.index += 1;
                Ok(word)
            },
            None => {
                let span = self.words.last().map_or(Span::NULL, |w| w.span);
                Err(sp!(span => AsmErrorKind::ArgCount {
                    mnemonic: self.opcode,
                    expected: self.index + 1,
                    found: self.words.len(),
                }))
            },
        }
    }

    /// Look up a word in a table of labels.
    fn named<T: Copy>(&mut self, role: OperandRole, all: &'static [T], label: fn(T) -> &'static str) -> LineResult<T> {
        let word = self.next()?;
        let name = word_text(word);
        if let Some(&value) = all.iter().find(|&&value| label(value) == name) {
            return Ok(value);
        }
        let suggestion = suggest(name, all.iter().map(|&value| label(value)));
        Err(sp!(word.span => AsmErrorKind::UnknownOperand { role, name: name.to_string(), suggestion }))
    }

    /// Parse an integer word and check its range.
    fn literal<T>(&mut self, role: OperandRole, min: u8, max: u8, new: fn(u8) -> Option<T>) -> LineResult<T> {
        let word = self.next()?;
        let text = word_text(word);
        let value = match word.value {
            Token::LitInt(_) => parse_int(text).and_then(new),
            _ => None,
        };
        value.ok_or_else(|| sp!(word.span => AsmErrorKind::BadLiteral { role, text: text.to_string(), min, max }))
    }

    fn target(&mut self) -> LineResult<Target> { self.named(OperandRole::Target, Target::ALL, Target::label) }
    fn stat(&mut self) -> LineResult<Stat> { self.named(OperandRole::Stat, Stat::ALL, Stat::label) }
    fn event(&mut self) -> LineResult<EventKind> { self.named(OperandRole::Event, EventKind::ALL, EventKind::label) }
    fn comparator(&mut self) -> LineResult<Comparator> { self.named(OperandRole::Comparator, Comparator::ALL, Comparator::label) }

    fn amount(&mut self) -> LineResult<Amount> {
        self.literal(OperandRole::Amount, Amount::MIN, Amount::MAX, Amount::new)
    }

    fn cmp_operand(&mut self) -> LineResult<CmpOperand> {
        let kind = self.named(OperandRole::CmpOperandKind, CmpOperandKind::ALL, CmpOperandKind::label)?;
        Ok(match kind {
            CmpOperandKind::Imm => CmpOperand::Imm { value: self.literal(OperandRole::Immediate, 0, Imm::MAX, Imm::new)? },
            CmpOperandKind::StatOf => CmpOperand::StatOf { target: self.target()?, stat: self.stat()? },
        })
    }
}

/// Decimal, or hexadecimal with a `0x` prefix.
pub(crate) fn parse_int(text: &str) -> Option<u8> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}
