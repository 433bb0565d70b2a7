//! The block-structured program tree built by [`crate::parse`].
//!
//! Every node records the byte offset (`pc`) of the instruction it came from.  This is
//! only ever used for diagnostics.

use std::fmt;

use crate::isa::{Amount, Comparator, EventKind, Imm, Stat, Target, CmpOperandKind};

/// One side of a conditional comparison.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CmpOperand {
    Imm { value: Imm },
    StatOf { target: Target, stat: Stat },
}

impl CmpOperand {
    pub fn kind(&self) -> CmpOperandKind {
        match self {
            CmpOperand::Imm { .. } => CmpOperandKind::Imm,
            CmpOperand::StatOf { .. } => CmpOperandKind::StatOf,
        }
    }

    pub fn is_imm(&self) -> bool { self.kind() == CmpOperandKind::Imm }
}

impl fmt::Display for CmpOperand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CmpOperand::Imm { value } => write!(f, "{} {}", CmpOperandKind::Imm, value),
            CmpOperand::StatOf { target, stat } => write!(f, "{} {} {}", CmpOperandKind::StatOf, target, stat),
        }
    }
}

// =============================================================================

/// A statement that may appear inside any block.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Stmt {
    pub pc: usize,
    #[serde(flatten)]
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[derive(strum::EnumDiscriminants)]
#[strum_discriminants(name(StmtTag))]
#[strum_discriminants(derive(enum_map::Enum, Hash, strum::Display))]
pub enum StmtKind {
    Damage { target: Target, amount: Amount },
    Heal { target: Target, amount: Amount },
    BuffStat { target: Target, stat: Stat, amount: Amount },
    DebuffStat { target: Target, stat: Stat, amount: Amount },
    Draw { amount: Amount },
    Discard { amount: Amount },
    CreateToken { amount: Amount },
    Destroy { target: Target },
    /// `IF cmp lhs rhs ... [ELSE ...] ENDIF`
    If(StmtIf),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StmtIf {
    pub cmp: Comparator,
    pub lhs: CmpOperand,
    pub rhs: CmpOperand,
    pub then_branch: Vec<Stmt>,
    /// `None` when there was no `ELSE` at all, as opposed to an empty `ELSE`.
    pub else_branch: Option<Vec<Stmt>>,
}

/// `WHEN event ... ENDWHEN`.  Only ever appears at the top level of a [`Program`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StmtWhen {
    pub pc: usize,
    pub event: EventKind,
    pub body: Vec<Stmt>,
}

/// Serialized without a tag; a trigger block is the one with an `event`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum TopLevelStmt {
    Stmt(Stmt),
    When(StmtWhen),
}

impl TopLevelStmt {
    pub fn as_when(&self) -> Option<&StmtWhen> {
        match self {
            TopLevelStmt::When(when) => Some(when),
            TopLevelStmt::Stmt(_) => None,
        }
    }
}

/// A complete parsed program.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Program {
    pub top_level: Vec<TopLevelStmt>,
    /// Byte offset of the `END` instruction that terminated the program.
    pub end_pc: usize,
}

impl StmtKind {
    pub fn tag(&self) -> StmtTag { StmtTag::from(self) }

    pub fn as_if(&self) -> Option<&StmtIf> {
        match self {
            StmtKind::If(cond) => Some(cond),
            _ => None,
        }
    }
}

// =============================================================================

/// Read-only traversal of a [`Program`].
///
/// Each method defaults to the matching `walk_` function, which recurses into children.
/// Override a method and call the `walk_` function yourself to add behavior around the
/// recursion.
pub trait Visit {
    fn visit_program(&mut self, program: &Program) { walk_program(self, program) }
    fn visit_top_level(&mut self, stmt: &TopLevelStmt) { walk_top_level(self, stmt) }
    fn visit_when(&mut self, when: &StmtWhen) { walk_when(self, when) }
    fn visit_block(&mut self, block: &[Stmt]) { walk_block(self, block) }
    fn visit_stmt(&mut self, stmt: &Stmt) { walk_stmt(self, stmt) }
}

pub fn walk_program<V: Visit + ?Sized>(v: &mut V, program: &Program) {
    for stmt in &program.top_level {
        v.visit_top_level(stmt);
    }
}

pub fn walk_top_level<V: Visit + ?Sized>(v: &mut V, stmt: &TopLevelStmt) {
    match stmt {
        TopLevelStmt::Stmt(stmt) => v.visit_stmt(stmt),
        TopLevelStmt::When(when) => v.visit_when(when),
    }
}

pub fn walk_when<V: Visit + ?Sized>(v: &mut V, when: &StmtWhen) {
    v.visit_block(&when.body);
}

pub fn walk_block<V: Visit + ?Sized>(v: &mut V, block: &[Stmt]) {
    for stmt in block {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visit + ?Sized>(v: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::If(StmtIf { then_branch, else_branch, .. }) => {
            v.visit_block(then_branch);
            if let Some(else_branch) = else_branch {
                v.visit_block(else_branch);
            }
        },
        StmtKind::Damage { .. } |
        StmtKind::Heal { .. } |
        StmtKind::BuffStat { .. } |
        StmtKind::DebuffStat { .. } |
        StmtKind::Draw { .. } |
        StmtKind::Discard { .. } |
        StmtKind::CreateToken { .. } |
        StmtKind::Destroy { .. } => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountStmts(usize);

    impl Visit for CountStmts {
        fn visit_stmt(&mut self, stmt: &Stmt) {
            self.0 += 1;
            walk_stmt(self, stmt);
        }
    }

    fn amount(x: u8) -> Amount { Amount::new(x).unwrap() }

    #[test]
    fn visitor_reaches_nested_statements() {
        let heal = Stmt { pc: 3, kind: StmtKind::Heal { target: Target::SelfCard, amount: amount(1) } };
        let cond = Stmt { pc: 1, kind: StmtKind::If(StmtIf {
            cmp: Comparator::Gt,
            lhs: CmpOperand::Imm { value: Imm::new(5).unwrap() },
            rhs: CmpOperand::StatOf { target: Target::Opponent, stat: Stat::Attack },
            then_branch: vec![heal.clone()],
            else_branch: Some(vec![heal.clone()]),
        })};
        let program = Program {
            top_level: vec![
                TopLevelStmt::When(StmtWhen { pc: 0, event: EventKind::OnCast, body: vec![cond] }),
                TopLevelStmt::Stmt(heal),
            ],
            end_pc: 20,
        };

        let mut counter = CountStmts::default();
        counter.visit_program(&program);
        assert_eq!(counter.0, 4);
    }

    #[test]
    fn cmp_operand_display() {
        assert_eq!(CmpOperand::Imm { value: Imm::new(5).unwrap() }.to_string(), "IMM 5");
        assert_eq!(
            CmpOperand::StatOf { target: Target::AllEnemies, stat: Stat::Health }.to_string(),
            "STAT_OF ALL_ENEMIES HEALTH",
        );
    }

    #[test]
    fn stmt_tags() {
        let kind = StmtKind::Draw { amount: amount(2) };
        assert_eq!(kind.tag(), StmtTag::Draw);
    }
}
