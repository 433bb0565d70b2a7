//! See [`run`].

use enum_map::EnumMap;

use crate::ast::{self, Visit, Program, Stmt, StmtIf, StmtKind, StmtTag, StmtWhen};
use crate::error::{SemanticError, SemanticErrorKind as Kind};
use crate::isa::{Stat, Target};

/// Flags constructs that parse fine but do not make a legal card ability.
///
/// This is purely advisory and never touches the tree.  Errors are reported in program
/// order, and running it twice on the same program gives the same list.
///
/// Limits on repeated actions are global: a `DRAW` inside one `WHEN` block conflicts with a
/// `DRAW` in any other block or branch, no matter how far apart they are.  A repeated
/// untargeted action gets one error, while a targeted one gets an error for every earlier
/// action it clashes with.
pub fn run(program: &Program) -> Vec<SemanticError> {
    let mut visitor = Visitor::default();
    visitor.visit_program(program);
    visitor.errors
}

#[derive(Default)]
struct Visitor {
    /// Every action seen so far in the whole program, grouped by kind.
    seen: EnumMap<StmtTag, Vec<SeenAction>>,
    errors: Vec<SemanticError>,
}

/// The parts of an action that decide whether two of them conflict.
///
/// Actions of the same kind conflict when their keys are equal, so e.g. `DRAW` (which
/// has neither) conflicts with every other `DRAW`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct SeenAction {
    target: Option<Target>,
    stat: Option<Stat>,
}

impl Visitor {
    fn error(&mut self, kind: Kind, pc: usize) {
        self.errors.push(SemanticError { kind, pc });
    }

    fn record_action(&mut self, stmt: &Stmt) {
        let (key, conflict) = match stmt.kind {
            StmtKind::Draw { .. } => (SeenAction { target: None, stat: None }, Kind::MultipleDraw),
            StmtKind::Discard { .. } => (SeenAction { target: None, stat: None }, Kind::MultipleDiscard),
            StmtKind::CreateToken { .. } => (SeenAction { target: None, stat: None }, Kind::MultipleCreateToken),
            StmtKind::Destroy { target } => (SeenAction { target: Some(target), stat: None }, Kind::MultipleDestroy),
            StmtKind::Damage { target, .. } => (SeenAction { target: Some(target), stat: None }, Kind::MultipleDamage),
            StmtKind::Heal { target, .. } => (SeenAction { target: Some(target), stat: None }, Kind::MultipleHeal),
            StmtKind::BuffStat { target, stat, .. } => (SeenAction { target: Some(target), stat: Some(stat) }, Kind::MultipleBuffStat),
            StmtKind::DebuffStat { target, stat, .. } => (SeenAction { target: Some(target), stat: Some(stat) }, Kind::MultipleDebuffStat),
            StmtKind::If(_) => return,
        };

        // untargeted actions are flagged once per repeat, targeted ones once per earlier match
        let seen = &mut self.seen[stmt.kind.tag()];
        let matches = seen.iter().filter(|&&earlier| earlier == key).count();
        seen.push(key);
        let count = match key.target {
            None => matches.min(1),
            Some(_) => matches,
        };
        for _ in 0..count {
            self.error(conflict.clone(), stmt.pc);
        }
    }

    fn check_if(&mut self, pc: usize, cond: &StmtIf) {
        if cond.then_branch.is_empty() {
            self.error(Kind::EmptyThen, pc);
        } else {
            self.visit_block(&cond.then_branch);
        }

        match &cond.else_branch {
            Some(else_branch) if else_branch.is_empty() => self.error(Kind::EmptyElse, pc),
            Some(else_branch) => self.visit_block(else_branch),
            None => {},
        }

        // the outcome would be known before the card is ever played
        if cond.lhs.is_imm() && cond.rhs.is_imm() {
            self.error(Kind::ImmediateComparison, pc);
        }
    }
}

impl Visit for Visitor {
    fn visit_when(&mut self, when: &StmtWhen) {
        if when.body.is_empty() {
            self.error(Kind::EmptyWhen, when.pc);
        }
        ast::walk_when(self, when);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::If(cond) => self.check_if(stmt.pc, cond),
            _ => self.record_action(stmt),
        }
    }
}
