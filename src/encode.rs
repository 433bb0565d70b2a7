//! Tokens to bytecode.  The inverse of [`crate::decode`].

use std::io::{self, Write};

use byteorder::WriteBytesExt;

use crate::ast::CmpOperand;
use crate::token::TokenKind;

/// Write one instruction: the opcode byte followed by its argument bytes.
///
/// Conditionals only write the bytes their operand kinds use, which may be fewer than
/// [`crate::isa::Opcode::arg_count`] reserves.
pub fn write_token(w: &mut impl Write, kind: &TokenKind) -> io::Result<()> {
    w.write_u8(kind.opcode().to_byte())?;
    match *kind {
        TokenKind::Damage { target, amount } |
        TokenKind::Heal { target, amount } => {
            w.write_u8(target.to_byte())?;
            w.write_u8(amount.to_byte())?;
        },
        TokenKind::BuffStat { target, stat, amount } |
        TokenKind::DebuffStat { target, stat, amount } => {
            w.write_u8(target.to_byte())?;
            w.write_u8(stat.to_byte())?;
            w.write_u8(amount.to_byte())?;
        },
        TokenKind::Draw { amount } |
        TokenKind::Discard { amount } |
        TokenKind::CreateToken { amount } => w.write_u8(amount.to_byte())?,
        TokenKind::Destroy { target } => w.write_u8(target.to_byte())?,
        TokenKind::If { cmp, lhs, rhs } => {
            w.write_u8(cmp.to_byte())?;
            write_cmp_operand(w, lhs)?;
            write_cmp_operand(w, rhs)?;
        },
        TokenKind::When { event } => w.write_u8(event.to_byte())?,
        TokenKind::Else | TokenKind::EndIf | TokenKind::EndWhen | TokenKind::End => {},
    }
    Ok(())
}

fn write_cmp_operand(w: &mut impl Write, operand: CmpOperand) -> io::Result<()> {
    w.write_u8(operand.kind().to_byte())?;
    match operand {
        CmpOperand::Imm { value } => w.write_u8(value.to_byte()),
        CmpOperand::StatOf { target, stat } => {
            w.write_u8(target.to_byte())?;
            w.write_u8(stat.to_byte())
        },
    }
}
