//! Bytecode to tokens.
//!
//! Layout: one header byte, then `(opcode, args...)` records until an `END` opcode or the
//! end of input.  See [`crate::isa`] for how each argument byte is interpreted.

use std::io::{self, Cursor};

use byteorder::ReadBytesExt;

use crate::ast::CmpOperand;
use crate::error::DecodeError;
use crate::isa::{Amount, CmpOperandKind, Comparator, EventKind, Imm, Opcode, Stat, Target};
use crate::token::{Token, TokenKind};

/// Default value of the header byte.
pub const DEFAULT_VERSION_BYTE: u8 = 0x01;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Header byte that programs are expected to start with.
    pub version_byte: u8,
    /// Record a [`DecodeError::VersionMismatch`] if the header is not `version_byte`.
    ///
    /// Off by default; the header is normally skipped without looking at it.
    pub strict_version: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig { version_byte: DEFAULT_VERSION_BYTE, strict_version: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decoded {
    /// The header byte, if there was at least one byte of input.
    pub header: Option<u8>,
    /// Always ends in an `END` token unless the input was empty.
    pub tokens: Vec<Token>,
    pub errors: Vec<DecodeError>,
}

impl Decoded {
    pub fn is_ok(&self) -> bool { self.errors.is_empty() }
}

/// Decode bytecode into tokens.
///
/// This never fails outright.  Truncated input stops the scan and records an error; in
/// every case except empty input, the returned tokens end with an `END` token, which is
/// synthesized if the input did not contain one.
///
/// A synthesized `END` sits at the offset where decoding stopped: the offending opcode after
/// an error, or one past the last byte when the input simply ran out.  It never shares an
/// offset with a real token, so offsets always strictly increase.
pub fn decode(bytes: &[u8], config: &DecoderConfig) -> Decoded {
    let mut errors = vec![];

    let header = match bytes.first() {
        Some(&header) => header,
        None => {
            errors.push(DecodeError::MissingBytecode);
            return Decoded { header: None, tokens: vec![], errors };
        },
    };
    if config.strict_version && header != config.version_byte {
        errors.push(DecodeError::VersionMismatch { expected: config.version_byte, found: header });
    }

    let mut reader = ArgReader::new(bytes, 1);
    let mut tokens = vec![];
    // where a synthesized END will go
    let mut end_pc = bytes.len();

    while !reader.is_empty() {
        let pc = reader.pos();
        let raw = bytes[pc];
        reader.skip(1);

        let opcode = match Opcode::from_byte(raw % Opcode::COUNT) {
            Some(opcode) => opcode,
            None => {
                errors.push(DecodeError::UnknownOpcode { byte: raw, pc });
                end_pc = pc;
                break;
            },
        };

        let needed = opcode.arg_count();
        if reader.remaining() < needed {
            errors.push(DecodeError::Truncated { opcode, pc, missing: needed - reader.remaining() });
            end_pc = pc;
            break;
        }

        let kind = match read_args(opcode, &mut reader) {
            Ok(kind) => kind,
            Err(_) => {
                // the check above reserves enough bytes for every opcode
                errors.push(DecodeError::Truncated { opcode, pc, missing: 1 });
                end_pc = pc;
                break;
            },
        };
        tokens.push(Token::new(pc, kind));

        if opcode == Opcode::End {
            break;
        }
    }

    if !tokens.last().map_or(false, Token::is_end) {
        tokens.push(Token::new(end_pc, TokenKind::End));
    }

    Decoded { header: Some(header), tokens, errors }
}

fn read_args(opcode: Opcode, r: &mut ArgReader<'_>) -> io::Result<TokenKind> {
    Ok(match opcode {
        Opcode::Damage => TokenKind::Damage { target: r.target()?, amount: r.amount()? },
        Opcode::Heal => TokenKind::Heal { target: r.target()?, amount: r.amount()? },
        Opcode::BuffStat => TokenKind::BuffStat { target: r.target()?, stat: r.stat()?, amount: r.amount()? },
        Opcode::DebuffStat => TokenKind::DebuffStat { target: r.target()?, stat: r.stat()?, amount: r.amount()? },
        Opcode::Draw => TokenKind::Draw { amount: r.amount()? },
        Opcode::Discard => TokenKind::Discard { amount: r.amount()? },
        Opcode::CreateToken => TokenKind::CreateToken { amount: r.amount()? },
        Opcode::Destroy => TokenKind::Destroy { target: r.target()? },
        Opcode::If => {
            let cmp = Comparator::clamp(r.byte()?);
            let lhs = r.cmp_operand()?;
            let rhs = r.cmp_operand()?;
            TokenKind::If { cmp, lhs, rhs }
        },
        Opcode::Else => TokenKind::Else,
        Opcode::EndIf => TokenKind::EndIf,
        Opcode::When => TokenKind::When { event: EventKind::clamp(r.byte()?) },
        Opcode::EndWhen => TokenKind::EndWhen,
        Opcode::End => TokenKind::End,
    })
}

/// Reads argument bytes one at a time, clamping each into the range of its role.
struct ArgReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ArgReader<'a> {
    fn new(bytes: &'a [u8], start: usize) -> Self {
        let mut cursor = Cursor::new(bytes);
        cursor.set_position(start as u64);
        ArgReader { cursor }
    }

    fn pos(&self) -> usize { self.cursor.position() as usize }
    fn remaining(&self) -> usize { self.cursor.get_ref().len().saturating_sub(self.pos()) }
    fn is_empty(&self) -> bool { self.remaining() == 0 }
    fn skip(&mut self, n: usize) { self.cursor.set_position((self.pos() + n) as u64) }

    fn byte(&mut self) -> io::Result<u8> { self.cursor.read_u8() }
    fn target(&mut self) -> io::Result<Target> { self.byte().map(Target::clamp) }
    fn stat(&mut self) -> io::Result<Stat> { self.byte().map(Stat::clamp) }
    fn amount(&mut self) -> io::Result<Amount> { self.byte().map(Amount::clamp) }

    fn cmp_operand(&mut self) -> io::Result<CmpOperand> {
        Ok(match CmpOperandKind::clamp(self.byte()?) {
            CmpOperandKind::Imm => CmpOperand::Imm { value: Imm::clamp(self.byte()?) },
            CmpOperandKind::StatOf => CmpOperand::StatOf { target: self.target()?, stat: self.stat()? },
        })
    }
}
