//! The instruction set: opcodes, operand enumerations, and their byte encodings.
//!
//! Bytecode is usually derived from hash digests rather than written by hand, so every
//! operand byte is *clamped* into range instead of being rejected.  Only the opcode byte
//! goes through an exact lookup (after its own modulo reduction), and only truncation
//! is ever treated as a decoding failure.

use std::fmt;

code_enum! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum Opcode {
        #[strum(to_string = "DAMAGE")] Damage = 0x00,
        #[strum(to_string = "HEAL")] Heal = 0x01,
        #[strum(to_string = "BUFF_STAT")] BuffStat = 0x02,
        #[strum(to_string = "DEBUFF_STAT")] DebuffStat = 0x03,
        #[strum(to_string = "DRAW")] Draw = 0x04,
        #[strum(to_string = "DISCARD")] Discard = 0x05,
        #[strum(to_string = "CREATE_TOKEN")] CreateToken = 0x06,
        #[strum(to_string = "DESTROY")] Destroy = 0x07,
        /// Start of a conditional block.
        #[strum(to_string = "IF", serialize = "COND_START")] If = 0x08,
        #[strum(to_string = "ELSE", serialize = "COND_ELSE")] Else = 0x09,
        #[strum(to_string = "ENDIF", serialize = "COND_END")] EndIf = 0x0A,
        /// Start of an event trigger block.  Only valid at top level.
        #[strum(to_string = "WHEN", serialize = "TRIGGER_START")] When = 0x0B,
        #[strum(to_string = "ENDWHEN", serialize = "TRIGGER_END")] EndWhen = 0x0C,
        /// Program terminator.
        #[strum(to_string = "END")] End = 0x0D,
    }
}

code_enum! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum Target {
        #[strum(to_string = "SELF")] SelfCard = 0x00,
        #[strum(to_string = "OPPONENT")] Opponent = 0x01,
        #[strum(to_string = "ALLY")] Ally = 0x02,
        #[strum(to_string = "ANY")] Any = 0x03,
        #[strum(to_string = "RANDOM")] Random = 0x04,
        #[strum(to_string = "ALL_ENEMIES")] AllEnemies = 0x05,
        #[strum(to_string = "ALL_ALLIES")] AllAllies = 0x06,
        #[strum(to_string = "ENEMY")] Enemy = 0x07,
    }
}

code_enum! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum Stat {
        #[strum(to_string = "ATTACK")] Attack = 0x00,
        #[strum(to_string = "HEALTH")] Health = 0x01,
    }
}

code_enum! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum Comparator {
        #[strum(to_string = "EQ")] Eq = 0x00,
        #[strum(to_string = "GT")] Gt = 0x01,
        #[strum(to_string = "LT")] Lt = 0x02,
    }
}

code_enum! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum EventKind {
        #[strum(to_string = "ON_CAST")] OnCast = 0x00,
        #[strum(to_string = "ON_ATTACK")] OnAttack = 0x01,
        #[strum(to_string = "ON_DEATH")] OnDeath = 0x02,
        #[strum(to_string = "ON_ENTER")] OnEnter = 0x03,
        #[strum(to_string = "ON_LEAVE")] OnLeave = 0x04,
    }
}

code_enum! {
    /// Tag byte that selects the layout of one side of a comparison.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum CmpOperandKind {
        /// Followed by one immediate byte.
        #[strum(to_string = "IMM")] Imm = 0x00,
        /// Followed by a target byte and a stat byte.
        #[strum(to_string = "STAT_OF")] StatOf = 0x01,
    }
}

impl_clamp!(Target, Stat, Comparator, EventKind, CmpOperandKind);

impl Opcode {
    /// Number of argument bytes that must follow the opcode.
    ///
    /// For [`Opcode::If`] this is an upper bound; each comparison operand reserves three
    /// bytes, but an immediate operand only uses two of them.
    pub fn arg_count(self) -> usize {
        match self {
            Opcode::Damage | Opcode::Heal => 2,
            Opcode::BuffStat | Opcode::DebuffStat => 3,
            Opcode::Draw | Opcode::Discard | Opcode::CreateToken => 1,
            Opcode::Destroy => 1,
            Opcode::When => 1,
            Opcode::If => 1 + CMP_OPERAND_SLOT + CMP_OPERAND_SLOT,
            Opcode::Else | Opcode::EndIf | Opcode::EndWhen | Opcode::End => 0,
        }
    }
}

/// Bytes reserved for one side of a comparison: kind byte plus up to two payload bytes.
pub const CMP_OPERAND_SLOT: usize = 3;

// =============================================================================

/// Quantity operand of an action, in the range `1..=4`.
///
/// Stored in bytecode as `amount - 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Amount(u8);

impl Amount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then(|| Amount(value))
    }

    pub fn clamp(raw: u8) -> Self { Amount(raw % Self::MAX + 1) }
    pub fn to_byte(self) -> u8 { self.0 - 1 }
    pub fn get(self) -> u8 { self.0 }
}

/// Immediate side of a comparison, in the range `0..=15`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct Imm(u8);

impl Imm {
    pub const MAX: u8 = 15;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then(|| Imm(value))
    }

    pub fn clamp(raw: u8) -> Self { Imm(raw % (Self::MAX + 1)) }
    pub fn to_byte(self) -> u8 { self.0 }
    pub fn get(self) -> u8 { self.0 }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { fmt::Display::fmt(&self.0, f) }
}

impl fmt::Display for Imm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { fmt::Display::fmt(&self.0, f) }
}

impl crate::fmt::Format for Amount {
    fn fmt<W: std::io::Write>(&self, out: &mut crate::fmt::Formatter<W>) -> crate::fmt::Result {
        out.fmt(format_args!("{}", self))
    }
}

impl crate::fmt::Format for Imm {
    fn fmt<W: std::io::Write>(&self, out: &mut crate::fmt::Formatter<W>) -> crate::fmt::Result {
        out.fmt(format_args!("{}", self))
    }
}
