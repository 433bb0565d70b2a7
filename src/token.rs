//! Flat instruction records produced by [`crate::decode`].

use crate::ast::CmpOperand;
use crate::isa::{Amount, Comparator, EventKind, Opcode, Stat, Target};

/// One decoded instruction, with its operands already clamped into range.
///
/// Block structure is not represented here; it only appears after [`crate::parse`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Token {
    /// Byte offset of the opcode.
    pub pc: usize,
    #[serde(flatten)]
    pub kind: TokenKind,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "op", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Damage { target: Target, amount: Amount },
    Heal { target: Target, amount: Amount },
    BuffStat { target: Target, stat: Stat, amount: Amount },
    DebuffStat { target: Target, stat: Stat, amount: Amount },
    Draw { amount: Amount },
    Discard { amount: Amount },
    CreateToken { amount: Amount },
    Destroy { target: Target },
    If { cmp: Comparator, lhs: CmpOperand, rhs: CmpOperand },
    Else,
    #[serde(rename = "ENDIF")]
    EndIf,
    When { event: EventKind },
    #[serde(rename = "ENDWHEN")]
    EndWhen,
    End,
}

impl TokenKind {
    pub fn opcode(&self) -> Opcode {
        match self {
            TokenKind::Damage { .. } => Opcode::Damage,
            TokenKind::Heal { .. } => Opcode::Heal,
            TokenKind::BuffStat { .. } => Opcode::BuffStat,
            TokenKind::DebuffStat { .. } => Opcode::DebuffStat,
            TokenKind::Draw { .. } => Opcode::Draw,
            TokenKind::Discard { .. } => Opcode::Discard,
            TokenKind::CreateToken { .. } => Opcode::CreateToken,
            TokenKind::Destroy { .. } => Opcode::Destroy,
            TokenKind::If { .. } => Opcode::If,
            TokenKind::Else => Opcode::Else,
            TokenKind::EndIf => Opcode::EndIf,
            TokenKind::When { .. } => Opcode::When,
            TokenKind::EndWhen => Opcode::EndWhen,
            TokenKind::End => Opcode::End,
        }
    }
}

impl Token {
    pub fn new(pc: usize, kind: TokenKind) -> Self { Token { pc, kind } }

    pub fn opcode(&self) -> Opcode { self.kind.opcode() }

    pub fn is_end(&self) -> bool { self.kind == TokenKind::End }
}

impl std::fmt::Display for Token {
    /// One line of a token listing, e.g. `PC   1: 00 DAMAGE       target=OPPONENT amount=3`.
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let op = self.opcode();
        write!(f, "PC {:>3}: {:02x} {:<12}", self.pc, op.to_byte(), op.label())?;
        match &self.kind {
            TokenKind::Damage { target, amount } |
            TokenKind::Heal { target, amount } => write!(f, " target={} amount={}", target, amount),
            TokenKind::BuffStat { target, stat, amount } |
            TokenKind::DebuffStat { target, stat, amount } => write!(f, " target={} stat={} amount={}", target, stat, amount),
            TokenKind::Draw { amount } |
            TokenKind::Discard { amount } |
            TokenKind::CreateToken { amount } => write!(f, " amount={}", amount),
            TokenKind::Destroy { target } => write!(f, " target={}", target),
            TokenKind::If { cmp, lhs, rhs } => write!(f, " cmp={} lhs={} rhs={}", cmp, lhs, rhs),
            TokenKind::When { event } => write!(f, " event={}", event),
            TokenKind::Else | TokenKind::EndIf | TokenKind::EndWhen | TokenKind::End => Ok(()),
        }
    }
}
